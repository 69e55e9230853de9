//! Per-asset dividend lookup: fetch, window, fold.
//!
//! Nothing here returns an error. Every failure for one asset becomes a
//! [`FetchOutcome::NoData`] so that one bad symbol never aborts the run.

use crate::data::DividendProvider;
use crate::domain::{AssetId, DividendEvent, MonthlySeries, TrailingWindow};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, info, warn};

/// Why an asset contributed no row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoDataReason {
    /// The provider knows the asset but it never paid a dividend.
    EmptyHistory,
    /// It paid, but nothing falls inside the trailing window.
    NoneInWindow,
    /// The lookup itself failed.
    ProviderFailed(String),
}

impl fmt::Display for NoDataReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoDataReason::EmptyHistory => f.write_str("no dividend history"),
            NoDataReason::NoneInWindow => f.write_str("no dividends in the trailing window"),
            NoDataReason::ProviderFailed(e) => write!(f, "lookup failed: {e}"),
        }
    }
}

/// Result of processing one asset.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Series(MonthlySeries),
    NoData { asset: AssetId, reason: NoDataReason },
}

impl FetchOutcome {
    pub fn asset(&self) -> &AssetId {
        match self {
            FetchOutcome::Series(s) => &s.asset,
            FetchOutcome::NoData { asset, .. } => asset,
        }
    }

    pub fn has_data(&self) -> bool {
        matches!(self, FetchOutcome::Series(_))
    }

    pub fn into_series(self) -> Option<MonthlySeries> {
        match self {
            FetchOutcome::Series(s) => Some(s),
            FetchOutcome::NoData { .. } => None,
        }
    }
}

/// Fetch and fold the dividends of one asset.
///
/// `raw` is the identifier as it appeared in the input list; it is what the
/// provider is queried with. The returned series is labelled with the
/// normalized form. Provider errors and panics are both contained.
pub fn fetch_asset(provider: &dyn DividendProvider, raw: &str, window: &TrailingWindow) -> FetchOutcome {
    let asset = AssetId::normalize(raw);
    debug!(asset = raw, provider = provider.name(), "processing asset");

    let fetched = panic::catch_unwind(AssertUnwindSafe(|| provider.fetch_dividends(raw)));

    let history = match fetched {
        Ok(Ok(history)) => history,
        Ok(Err(e)) => {
            warn!(asset = raw, error = %e, "failed to fetch dividends");
            return FetchOutcome::NoData {
                asset,
                reason: NoDataReason::ProviderFailed(e.to_string()),
            };
        }
        Err(payload) => {
            let msg = panic_message(payload.as_ref());
            warn!(asset = raw, error = %msg, "provider panicked");
            return FetchOutcome::NoData {
                asset,
                reason: NoDataReason::ProviderFailed(msg),
            };
        }
    };

    let outcome = summarize(asset, &history.events, window);
    if let FetchOutcome::NoData { reason, .. } = &outcome {
        info!(asset = raw, "{reason}");
    }
    outcome
}

/// Window and fold an already-fetched history.
pub fn summarize(asset: AssetId, events: &[DividendEvent], window: &TrailingWindow) -> FetchOutcome {
    if events.is_empty() {
        return FetchOutcome::NoData {
            asset,
            reason: NoDataReason::EmptyHistory,
        };
    }

    let series = MonthlySeries::fold(asset, events.iter().filter(|e| window.contains(&e.timestamp)));
    if series.is_empty() {
        return FetchOutcome::NoData {
            asset: series.asset,
            reason: NoDataReason::NoneInWindow,
        };
    }

    FetchOutcome::Series(series)
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panic: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panic: {s}")
    } else {
        "panic".to_string()
    }
}
