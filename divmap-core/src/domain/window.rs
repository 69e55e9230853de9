//! Trailing time window, fixed once per run.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Default trailing window length in days.
pub const DEFAULT_WINDOW_DAYS: u32 = 365;

/// Longest window a run accepts (about a century).
pub const MAX_WINDOW_DAYS: u32 = 36_500;

/// `[run_start - days, ...)`; events at or after `threshold` are kept.
///
/// There is no upper bound: a dividend the provider already lists with a
/// future date is retained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrailingWindow {
    run_start: NaiveDateTime,
    threshold: NaiveDateTime,
}

impl TrailingWindow {
    /// The threshold saturates at the earliest representable time.
    pub fn ending_at(run_start: NaiveDateTime, days: u32) -> Self {
        let threshold = run_start
            .checked_sub_signed(Duration::days(i64::from(days)))
            .unwrap_or(NaiveDateTime::MIN);
        Self {
            run_start,
            threshold,
        }
    }

    /// Window anchored at the local wall clock.
    pub fn trailing_from_now(days: u32) -> Self {
        Self::ending_at(chrono::Local::now().naive_local(), days)
    }

    pub fn run_start(&self) -> NaiveDateTime {
        self.run_start
    }

    pub fn threshold(&self) -> NaiveDateTime {
        self.threshold
    }

    pub fn contains(&self, ts: &NaiveDateTime) -> bool {
        *ts >= self.threshold
    }
}
