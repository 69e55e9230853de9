//! Parallel fan-out of per-asset lookups over a bounded Rayon pool.

use crate::progress::FetchProgress;
use divmap_core::data::DividendProvider;
use divmap_core::domain::{MonthlySeries, TrailingWindow};
use divmap_core::{fetch_asset, FetchOutcome};
use rayon::prelude::*;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("failed to build worker pool: {0}")]
pub struct PoolError(#[from] rayon::ThreadPoolBuildError);

/// Outcomes of a fan-out, in the order of the input list.
#[derive(Debug, Clone)]
pub struct FanOut {
    pub outcomes: Vec<FetchOutcome>,
}

impl FanOut {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn with_data(&self) -> usize {
        self.outcomes.iter().filter(|o| o.has_data()).count()
    }

    /// Outcomes that produced no series.
    pub fn no_data(&self) -> impl Iterator<Item = &FetchOutcome> {
        self.outcomes.iter().filter(|o| !o.has_data())
    }

    /// Non-empty series, input order preserved.
    pub fn series(&self) -> Vec<MonthlySeries> {
        self.outcomes
            .iter()
            .filter_map(|o| match o {
                FetchOutcome::Series(s) => Some(s.clone()),
                FetchOutcome::NoData { .. } => None,
            })
            .collect()
    }

    pub fn into_series(self) -> Vec<MonthlySeries> {
        self.outcomes
            .into_iter()
            .filter_map(FetchOutcome::into_series)
            .collect()
    }
}

/// Run [`fetch_asset`] for every identifier on `workers` threads.
///
/// Completion order is arbitrary and drives `progress`; the returned
/// outcomes are re-ordered to match `assets`.
pub fn fan_out(
    provider: &dyn DividendProvider,
    assets: &[String],
    window: &TrailingWindow,
    workers: usize,
    progress: &dyn FetchProgress,
) -> Result<FanOut, PoolError> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers.max(1))
        .thread_name(|i| format!("divmap-fetch-{i}"))
        .build()?;

    progress.on_start(assets.len());

    let outcomes: Vec<FetchOutcome> = pool.install(|| {
        assets
            .par_iter()
            .map(|raw| {
                let outcome = fetch_asset(provider, raw, window);
                progress.on_complete(&outcome);
                outcome
            })
            .collect()
    });

    let result = FanOut { outcomes };
    progress.on_finish(result.with_data(), result.total());
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NoProgress;
    use chrono::NaiveDate;
    use divmap_core::data::FixtureProvider;
    use divmap_core::domain::DividendEvent;

    fn window() -> TrailingWindow {
        TrailingWindow::ending_at(
            NaiveDate::from_ymd_opt(2025, 1, 15)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
            365,
        )
    }

    fn event(m: u32) -> DividendEvent {
        DividendEvent::new(
            NaiveDate::from_ymd_opt(2024, m, 10)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
            1.0,
        )
    }

    #[test]
    fn preserves_input_order() {
        let p = FixtureProvider::new()
            .with_history("A", vec![event(3)])
            .with_history("B", vec![event(4)])
            .with_history("C", vec![event(5)]);
        let assets: Vec<String> = ["C", "A", "B"].iter().map(|s| s.to_string()).collect();
        let out = fan_out(&p, &assets, &window(), 3, &NoProgress).unwrap();
        let labels: Vec<&str> = out.outcomes.iter().map(|o| o.asset().as_str()).collect();
        assert_eq!(labels, vec!["C", "A", "B"]);
    }

    #[test]
    fn counts_and_discards_no_data() {
        let p = FixtureProvider::new()
            .with_history("A", vec![event(3)])
            .with_history("EMPTY", vec![]);
        let assets: Vec<String> = ["A", "EMPTY", "MISSING"].iter().map(|s| s.to_string()).collect();
        let out = fan_out(&p, &assets, &window(), 2, &NoProgress).unwrap();
        assert_eq!(out.total(), 3);
        assert_eq!(out.with_data(), 1);
        assert_eq!(out.no_data().count(), 2);
        assert_eq!(out.into_series().len(), 1);
    }

    #[test]
    fn zero_workers_still_runs() {
        let p = FixtureProvider::new().with_history("A", vec![event(3)]);
        let out = fan_out(&p, &["A".to_string()], &window(), 0, &NoProgress).unwrap();
        assert_eq!(out.with_data(), 1);
    }

    #[test]
    fn empty_list_yields_empty_fan_out() {
        let out = fan_out(&FixtureProvider::new(), &[], &window(), 2, &NoProgress).unwrap();
        assert_eq!(out.total(), 0);
    }
}
