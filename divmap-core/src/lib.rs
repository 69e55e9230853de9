//! divmap core: domain types and the per-asset pipeline pieces.
//!
//! This crate contains everything that does not involve scheduling:
//! - Domain types (asset identifiers, dividend events, month keys, monthly series)
//! - Asset list loading
//! - The `DividendProvider` seam with Yahoo Finance and JSON fixture sources
//! - Per-asset fetch, trailing-window filter and monthly fold
//! - Aggregation into the result table and its JSON/console rendering

pub mod aggregate;
pub mod asset_list;
pub mod data;
pub mod domain;
pub mod fetcher;
pub mod output;

pub use aggregate::{ResultRow, ResultTable, DEFAULT_ID_COLUMN};
pub use asset_list::{load_asset_list, parse_asset_list, AssetListError, DEFAULT_ASSET_LIST};
pub use fetcher::{fetch_asset, summarize, FetchOutcome, NoDataReason};
pub use output::{write_json, MissingCells, OutputError, OutputOptions, DEFAULT_OUTPUT};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: everything handed across the worker pool is Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::AssetId>();
        require_sync::<domain::AssetId>();
        require_send::<domain::DividendEvent>();
        require_sync::<domain::DividendEvent>();
        require_send::<domain::MonthlySeries>();
        require_sync::<domain::MonthlySeries>();
        require_send::<domain::TrailingWindow>();
        require_sync::<domain::TrailingWindow>();
        require_send::<FetchOutcome>();
        require_sync::<FetchOutcome>();
        require_send::<data::ProviderError>();
        require_sync::<data::ProviderError>();
        require_send::<data::YahooDividendProvider>();
        require_sync::<data::YahooDividendProvider>();
        require_send::<data::FixtureProvider>();
        require_sync::<data::FixtureProvider>();
    }

    /// The provider trait object itself must be shareable between workers.
    #[test]
    fn provider_trait_object_is_shareable() {
        fn require_sync<T: Sync + ?Sized>() {}
        require_sync::<dyn data::DividendProvider>();
    }
}
