//! Dividend data sources.

pub mod fixture;
pub mod provider;
pub mod yahoo;

pub use fixture::FixtureProvider;
pub use provider::{DataSource, DividendHistory, DividendProvider, ProviderError};
pub use yahoo::YahooDividendProvider;
