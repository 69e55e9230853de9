//! End-to-end run: load list, fan out, aggregate, write.
//!
//! Only a missing or unreadable asset list (or an invalid config) is fatal.
//! Per-asset failures surface as absent rows; a failed write is reported in
//! the summary and logged, never returned as an error.

use crate::config::{ConfigError, RunConfig};
use crate::executor::{fan_out, FanOut, PoolError};
use crate::progress::FetchProgress;
use divmap_core::data::DividendProvider;
use divmap_core::domain::TrailingWindow;
use divmap_core::{load_asset_list, write_json, AssetListError, ResultTable};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    AssetList(#[from] AssetListError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Pool(#[from] PoolError),
}

/// What happened to the JSON artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputStatus {
    Written(PathBuf),
    /// Nothing to write: no asset had dividends in the window.
    NoData,
    Failed(String),
}

#[derive(Debug)]
pub struct RunSummary {
    pub window: TrailingWindow,
    pub fan_out: FanOut,
    pub table: Option<ResultTable>,
    pub output: OutputStatus,
}

impl RunSummary {
    pub fn requested(&self) -> usize {
        self.fan_out.total()
    }

    pub fn with_data(&self) -> usize {
        self.fan_out.with_data()
    }

    pub fn without_data(&self) -> usize {
        self.requested() - self.with_data()
    }
}

/// Load the configured asset list and process it.
pub fn run(
    config: &RunConfig,
    provider: &dyn DividendProvider,
    progress: &dyn FetchProgress,
    window: TrailingWindow,
) -> Result<RunSummary, RunError> {
    run_with(config, provider, progress, window, |_| {})
}

/// [`run`], calling `on_loaded` with the asset list before any fetch starts.
pub fn run_with<F>(
    config: &RunConfig,
    provider: &dyn DividendProvider,
    progress: &dyn FetchProgress,
    window: TrailingWindow,
    on_loaded: F,
) -> Result<RunSummary, RunError>
where
    F: FnOnce(&[String]),
{
    config.validate()?;
    let assets = load_asset_list(&config.input)?;
    info!(count = assets.len(), path = %config.input.display(), "asset list loaded");
    on_loaded(&assets);
    execute(config, &assets, provider, progress, window)
}

/// Fan out over an already-loaded list, aggregate, and write the artifact.
pub fn process_assets(
    config: &RunConfig,
    assets: &[String],
    provider: &dyn DividendProvider,
    progress: &dyn FetchProgress,
    window: TrailingWindow,
) -> Result<RunSummary, RunError> {
    config.validate()?;
    execute(config, assets, provider, progress, window)
}

/// Expects a validated config.
fn execute(
    config: &RunConfig,
    assets: &[String],
    provider: &dyn DividendProvider,
    progress: &dyn FetchProgress,
    window: TrailingWindow,
) -> Result<RunSummary, RunError> {
    let workers = config.worker_count();
    info!(
        assets = assets.len(),
        workers,
        provider = provider.name(),
        threshold = %window.threshold(),
        "fetching dividends"
    );

    let fetched = fan_out(provider, assets, &window, workers, progress)?;
    let table = ResultTable::aggregate(&fetched.series(), &config.id_column);

    let output = match &table {
        None => {
            info!("no dividend data found for the listed assets");
            OutputStatus::NoData
        }
        Some(table) => match write_json(table, &config.output, &config.output_options()) {
            Ok(()) => {
                info!(path = %config.output.display(), rows = table.row_count(), "result saved");
                OutputStatus::Written(config.output.clone())
            }
            Err(e) => {
                error!(error = %e, "failed to save result");
                OutputStatus::Failed(e.to_string())
            }
        },
    };

    Ok(RunSummary {
        window,
        fan_out: fetched,
        table,
        output,
    })
}
