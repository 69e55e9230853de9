//! Dividend provider trait and structured error types.
//!
//! The DividendProvider trait abstracts over data sources (Yahoo Finance,
//! JSON fixtures) so the fan-out can run against a stub in tests.

use crate::domain::DividendEvent;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured error types for provider lookups.
///
/// Every variant is recoverable at the run level: the fetcher turns it into
/// a "no data" outcome for the one asset that failed.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("HTTP {status} for {symbol}")]
    Http { status: u16, symbol: String },

    #[error("provider error: {0}")]
    Other(String),
}

/// Full dividend history for a single symbol.
#[derive(Debug, Clone)]
pub struct DividendHistory {
    pub symbol: String,
    /// Ascending by timestamp.
    pub events: Vec<DividendEvent>,
    pub source: DataSource,
}

impl DividendHistory {
    pub fn new(symbol: impl Into<String>, mut events: Vec<DividendEvent>, source: DataSource) -> Self {
        events.sort_by_key(|e| e.timestamp);
        Self {
            symbol: symbol.into(),
            events,
            source,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Where the history came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataSource {
    YahooFinance,
    Fixture,
}

/// Trait for dividend history sources.
///
/// Implementations are shared by every worker in the pool, so they must be
/// safe to call concurrently.
pub trait DividendProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch the complete dividend history for a symbol, as spelled in the input.
    ///
    /// An asset that exists but never paid is `Ok` with no events.
    fn fetch_dividends(&self, symbol: &str) -> Result<DividendHistory, ProviderError>;
}
