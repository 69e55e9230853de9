//! Per-asset monthly dividend totals.

use super::{AssetId, DividendEvent, MonthKey};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Cumulative dividend amount per month for one asset.
///
/// Months with no payment have no entry. A month whose only events were
/// zero-valued is present with `0.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySeries {
    pub asset: AssetId,
    pub months: BTreeMap<MonthKey, f64>,
}

impl MonthlySeries {
    pub fn new(asset: AssetId) -> Self {
        Self {
            asset,
            months: BTreeMap::new(),
        }
    }

    /// Fold events into monthly buckets; same-month amounts sum.
    pub fn fold<'a, I>(asset: AssetId, events: I) -> Self
    where
        I: IntoIterator<Item = &'a DividendEvent>,
    {
        let mut series = Self::new(asset);
        for event in events {
            series.add(event);
        }
        series
    }

    pub fn add(&mut self, event: &DividendEvent) {
        *self.months.entry(event.month()).or_insert(0.0) += event.amount;
    }

    pub fn get(&self, month: &MonthKey) -> Option<f64> {
        self.months.get(month).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    pub fn len(&self) -> usize {
        self.months.len()
    }

    /// Sum over all months in the series.
    pub fn total(&self) -> f64 {
        self.months.values().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ev(y: i32, m: u32, d: u32, amount: f64) -> DividendEvent {
        DividendEvent::new(
            NaiveDate::from_ymd_opt(y, m, d)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
            amount,
        )
    }

    #[test]
    fn same_month_events_sum() {
        let events = [ev(2024, 3, 1, 0.5), ev(2024, 3, 28, 0.3)];
        let s = MonthlySeries::fold(AssetId::normalize("x"), &events);
        let march = MonthKey::new(2024, 3).unwrap();
        assert!((s.get(&march).unwrap() - 0.8).abs() < 1e-12);
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn distinct_months_stay_separate() {
        let events = [ev(2024, 1, 10, 1.0), ev(2024, 2, 10, 2.0)];
        let s = MonthlySeries::fold(AssetId::normalize("x"), &events);
        assert_eq!(s.len(), 2);
        assert_eq!(s.total(), 3.0);
    }

    #[test]
    fn zero_valued_month_is_present() {
        let events = [ev(2024, 5, 10, 0.0)];
        let s = MonthlySeries::fold(AssetId::normalize("x"), &events);
        assert_eq!(s.get(&MonthKey::new(2024, 5).unwrap()), Some(0.0));
    }

    #[test]
    fn absent_month_has_no_entry() {
        let s = MonthlySeries::fold(AssetId::normalize("x"), &[ev(2024, 5, 10, 1.0)]);
        assert_eq!(s.get(&MonthKey::new(2024, 6).unwrap()), None);
    }
}
