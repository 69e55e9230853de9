//! divmap CLI: trailing-12-month dividend map.
//!
//! Commands:
//! - `run`: fetch dividends for every asset in the list, print the monthly
//!   table and write it as JSON
//! - `config`: print the effective configuration as TOML

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use divmap_core::data::{DividendProvider, FixtureProvider, YahooDividendProvider};
use divmap_core::domain::TrailingWindow;
use divmap_core::{load_asset_list, MissingCells};
use divmap_runner::{
    run_with, BarProgress, FetchProgress, NoProgress, OutputStatus, RunConfig, RunSummary,
    StdoutProgress,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "divmap",
    about = "divmap: monthly dividend totals over the trailing 12 months"
)]
struct Cli {
    /// Enable debug logging (overrides RUST_LOG).
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch dividends for the asset list and write the monthly map.
    Run {
        #[command(flatten)]
        overrides: ConfigOverrides,

        /// Read dividend histories from a JSON fixture instead of Yahoo Finance.
        #[arg(long)]
        fixture: Option<PathBuf>,

        /// Progress display.
        #[arg(long, value_enum, default_value_t = ProgressMode::Bar)]
        progress: ProgressMode,

        /// Load and print the asset list, then stop.
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },
    /// Print the effective configuration as TOML.
    Config {
        #[command(flatten)]
        overrides: ConfigOverrides,
    },
}

#[derive(Args, Default)]
struct ConfigOverrides {
    /// TOML config file. Flags below take precedence over it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Asset list, one identifier per line. Defaults to ./lista.txt.
    #[arg(long)]
    input: Option<PathBuf>,

    /// Output JSON file. Defaults to ./mapa_dividendos_12meses.json.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Trailing window length in days. Defaults to 365.
    #[arg(long)]
    window_days: Option<u32>,

    /// Worker threads (0 = one per core).
    #[arg(long)]
    workers: Option<usize>,

    /// Per-request HTTP timeout in seconds.
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// How months without a payment appear in the JSON: omit or null.
    #[arg(long)]
    missing_cells: Option<MissingCells>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ProgressMode {
    Bar,
    Plain,
    Off,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Run {
            overrides,
            fixture,
            progress,
            dry_run,
        } => run_cmd(&overrides, fixture, progress, dry_run),
        Commands::Config { overrides } => {
            let config = resolve_config(&overrides)?;
            config.validate()?;
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Defaults, then the config file, then individual flags. Not validated.
fn resolve_config(overrides: &ConfigOverrides) -> Result<RunConfig> {
    let mut config = match &overrides.config {
        Some(path) => RunConfig::from_file(path)?,
        None => RunConfig::default(),
    };

    if let Some(input) = &overrides.input {
        config.input = input.clone();
    }
    if let Some(output) = &overrides.output {
        config.output = output.clone();
    }
    if let Some(days) = overrides.window_days {
        config.window_days = days;
    }
    if let Some(workers) = overrides.workers {
        config.workers = workers;
    }
    if let Some(secs) = overrides.timeout_secs {
        config.timeout_secs = secs;
    }
    if let Some(mode) = overrides.missing_cells {
        config.missing_cells = mode;
    }

    Ok(config)
}

fn run_cmd(
    overrides: &ConfigOverrides,
    fixture: Option<PathBuf>,
    progress_mode: ProgressMode,
    dry_run: bool,
) -> Result<()> {
    let config = resolve_config(overrides)?;

    if dry_run {
        config.validate()?;
        let assets = load_asset_list(&config.input)?;
        print_asset_list(&assets);
        return Ok(());
    }

    let provider: Box<dyn DividendProvider> = match &fixture {
        Some(path) => Box::new(
            FixtureProvider::from_file(path)
                .with_context(|| format!("loading fixture {}", path.display()))?,
        ),
        None => Box::new(YahooDividendProvider::new(config.timeout())?),
    };

    let progress: Box<dyn FetchProgress> = match progress_mode {
        ProgressMode::Bar => Box::new(BarProgress::new(&config.progress_label)),
        ProgressMode::Plain => Box::new(StdoutProgress::new()),
        ProgressMode::Off => Box::new(NoProgress),
    };

    let window = TrailingWindow::trailing_from_now(config.window_days);
    let summary = run_with(
        &config,
        provider.as_ref(),
        progress.as_ref(),
        window,
        print_asset_list,
    )?;

    print_summary(&summary);
    Ok(())
}

fn print_asset_list(assets: &[String]) {
    println!("Asset list loaded: {assets:?}");
}

fn print_summary(summary: &RunSummary) {
    if let Some(table) = &summary.table {
        println!("Mapa de Dividendos dos Últimos 12 Meses (YYYY-MM) - Ordenado:");
        print!("{}", table.render());
    }

    match &summary.output {
        OutputStatus::Written(path) => println!("File '{}' saved successfully.", path.display()),
        OutputStatus::NoData => println!("No dividend data found for the listed assets."),
        OutputStatus::Failed(e) => eprintln!("Error saving file: {e}"),
    }

    println!(
        "{} assets requested: {} with dividends, {} without",
        summary.requested(),
        summary.with_data(),
        summary.without_data()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overrides(args: &[&str]) -> ConfigOverrides {
        let mut argv = vec!["divmap", "config"];
        argv.extend_from_slice(args);
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Config { overrides } => overrides,
            Commands::Run { .. } => unreachable!(),
        }
    }

    #[test]
    fn no_flags_gives_defaults() {
        let config = resolve_config(&ConfigOverrides::default()).unwrap();
        assert_eq!(config, RunConfig::default());
    }

    #[test]
    fn flags_override_defaults() {
        let config = resolve_config(&overrides(&[
            "--input",
            "fiis.txt",
            "--window-days",
            "180",
            "--missing-cells",
            "null",
        ]))
        .unwrap();
        assert_eq!(config.input, PathBuf::from("fiis.txt"));
        assert_eq!(config.window_days, 180);
        assert_eq!(config.missing_cells, MissingCells::Null);
    }

    #[test]
    fn flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("divmap.toml");
        std::fs::write(&path, "window_days = 90\nworkers = 2\n").unwrap();
        let config = resolve_config(&overrides(&[
            "--config",
            path.to_str().unwrap(),
            "--workers",
            "8",
        ]))
        .unwrap();
        assert_eq!(config.window_days, 90);
        assert_eq!(config.workers, 8);
    }

    #[test]
    fn invalid_override_is_rejected() {
        let config = resolve_config(&overrides(&["--window-days", "0"])).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn oversized_window_is_rejected() {
        let config = resolve_config(&overrides(&["--window-days", "4000000000"])).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn run_reports_invalid_config_without_fetching() {
        let dir = tempfile::tempdir().unwrap();
        let list = dir.path().join("lista.txt");
        std::fs::write(&list, "MXRF11.SA\n").unwrap();
        let fixture = dir.path().join("fixture.json");
        std::fs::write(&fixture, "{}").unwrap();
        let args = overrides(&["--input", list.to_str().unwrap(), "--window-days", "0"]);
        assert!(run_cmd(&args, Some(fixture), ProgressMode::Off, false).is_err());
    }

    #[test]
    fn unknown_missing_cells_mode_fails_to_parse() {
        assert!(Cli::try_parse_from(["divmap", "config", "--missing-cells", "zero"]).is_err());
    }

    #[test]
    fn run_accepts_progress_modes() {
        let cli = Cli::try_parse_from(["divmap", "run", "--progress", "plain", "--dry-run"]).unwrap();
        match cli.command {
            Commands::Run {
                progress, dry_run, ..
            } => {
                assert!(progress == ProgressMode::Plain);
                assert!(dry_run);
            }
            Commands::Config { .. } => unreachable!(),
        }
    }
}
