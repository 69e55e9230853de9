//! In-memory provider backed by a JSON fixture file.
//!
//! Used for offline runs and for tests. The file maps a symbol to its events:
//!
//! ```json
//! { "MXRF11.SA": [ { "timestamp": "2024-03-15T10:00:00", "amount": 0.09 } ] }
//! ```

use super::provider::{DataSource, DividendHistory, DividendProvider, ProviderError};
use crate::domain::{normalize_text, DividendEvent};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct FixtureProvider {
    histories: BTreeMap<String, Vec<DividendEvent>>,
}

impl FixtureProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the history for `symbol`.
    pub fn with_history(mut self, symbol: impl Into<String>, events: Vec<DividendEvent>) -> Self {
        self.histories.insert(symbol.into(), events);
        self
    }

    pub fn from_json(content: &str) -> Result<Self, ProviderError> {
        let histories: BTreeMap<String, Vec<DividendEvent>> = serde_json::from_str(content)
            .map_err(|e| ProviderError::ResponseFormatChanged(format!("parse fixture: {e}")))?;
        Ok(Self { histories })
    }

    pub fn from_file(path: &Path) -> Result<Self, ProviderError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ProviderError::Other(format!("read fixture {}: {e}", path.display())))?;
        Self::from_json(&content)
    }

    pub fn symbol_count(&self) -> usize {
        self.histories.len()
    }

    /// Exact key first, then the smallest key with the same normalized form.
    fn lookup(&self, symbol: &str) -> Option<&Vec<DividendEvent>> {
        self.histories.get(symbol).or_else(|| {
            let wanted = normalize_text(symbol);
            self.histories
                .iter()
                .find(|(k, _)| normalize_text(k) == wanted)
                .map(|(_, v)| v)
        })
    }
}

impl DividendProvider for FixtureProvider {
    fn name(&self) -> &str {
        "fixture"
    }

    fn fetch_dividends(&self, symbol: &str) -> Result<DividendHistory, ProviderError> {
        let events = self
            .lookup(symbol)
            .ok_or_else(|| ProviderError::SymbolNotFound {
                symbol: symbol.to_string(),
            })?;
        Ok(DividendHistory::new(symbol, events.clone(), DataSource::Fixture))
    }
}
