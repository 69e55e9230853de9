//! divmap runner: fan-out, progress, configuration and the end-to-end run.
//!
//! This crate builds on `divmap-core` to provide:
//! - A bounded Rayon worker pool that runs one lookup per asset
//! - Progress callbacks (indicatif bar, plain stdout, silent)
//! - TOML run configuration
//! - The `run` pipeline: load list → fan out → aggregate → write JSON

pub mod config;
pub mod executor;
pub mod pipeline;
pub mod progress;

pub use config::{ConfigError, RunConfig};
pub use executor::{fan_out, FanOut, PoolError};
pub use pipeline::{process_assets, run, run_with, OutputStatus, RunError, RunSummary};
pub use progress::{BarProgress, FetchProgress, NoProgress, StdoutProgress};
