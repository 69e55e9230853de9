//! Run configuration, loadable from a TOML file.
//!
//! Every key is optional; absent keys take the defaults below. The CLI layers
//! its flags on top of whatever the file provides.

use divmap_core::domain::{MonthKey, DEFAULT_WINDOW_DAYS, MAX_WINDOW_DAYS};
use divmap_core::output::DEFAULT_DECIMAL_PLACES;
use divmap_core::{MissingCells, OutputOptions, DEFAULT_ASSET_LIST, DEFAULT_ID_COLUMN, DEFAULT_OUTPUT};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Largest accepted `decimal_places`; beyond this f64 rounding is meaningless.
pub const MAX_DECIMAL_PLACES: u32 = 15;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Newline-delimited asset list.
    pub input: PathBuf,
    /// JSON artifact path.
    pub output: PathBuf,
    /// Trailing window length in days.
    pub window_days: u32,
    /// Worker threads; 0 means one per available core.
    pub workers: usize,
    /// Per-request HTTP timeout.
    pub timeout_secs: u64,
    pub decimal_places: u32,
    pub missing_cells: MissingCells,
    /// Name of the identifier column in the output.
    pub id_column: String,
    /// Label shown next to the progress bar.
    pub progress_label: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_ASSET_LIST),
            output: PathBuf::from(DEFAULT_OUTPUT),
            window_days: DEFAULT_WINDOW_DAYS,
            workers: 0,
            timeout_secs: 30,
            decimal_places: DEFAULT_DECIMAL_PLACES,
            missing_cells: MissingCells::Omit,
            id_column: DEFAULT_ID_COLUMN.to_string(),
            progress_label: "Processando FIIs".to_string(),
        }
    }
}

impl RunConfig {
    /// Load a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Serialize the config to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_days == 0 {
            return Err(ConfigError::Invalid("window_days must be greater than 0".into()));
        }
        if self.window_days > MAX_WINDOW_DAYS {
            return Err(ConfigError::Invalid(format!(
                "window_days must be at most {MAX_WINDOW_DAYS}, got {}",
                self.window_days
            )));
        }
        if self.decimal_places > MAX_DECIMAL_PLACES {
            return Err(ConfigError::Invalid(format!(
                "decimal_places must be at most {MAX_DECIMAL_PLACES}, got {}",
                self.decimal_places
            )));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeout_secs must be greater than 0".into()));
        }
        if self.id_column.trim().is_empty() {
            return Err(ConfigError::Invalid("id_column must not be empty".into()));
        }
        if MonthKey::is_month_key(&self.id_column) {
            return Err(ConfigError::Invalid(format!(
                "id_column '{}' collides with a month column",
                self.id_column
            )));
        }
        Ok(())
    }

    /// Effective pool size.
    pub fn worker_count(&self) -> usize {
        if self.workers > 0 {
            self.workers
        } else {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn output_options(&self) -> OutputOptions {
        OutputOptions {
            missing_cells: self.missing_cells,
            decimal_places: self.decimal_places,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_classic_layout() {
        let c = RunConfig::default();
        assert_eq!(c.input, PathBuf::from("lista.txt"));
        assert_eq!(c.output, PathBuf::from("mapa_dividendos_12meses.json"));
        assert_eq!(c.window_days, 365);
        assert_eq!(c.id_column, "ativo");
        assert_eq!(c.missing_cells, MissingCells::Omit);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn empty_toml_is_all_defaults() {
        assert_eq!(RunConfig::from_toml("").unwrap(), RunConfig::default());
    }

    #[test]
    fn partial_toml_overrides_only_given_keys() {
        let c = RunConfig::from_toml("window_days = 180\nmissing_cells = \"null\"\n").unwrap();
        assert_eq!(c.window_days, 180);
        assert_eq!(c.missing_cells, MissingCells::Null);
        assert_eq!(c.input, PathBuf::from("lista.txt"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(matches!(
            RunConfig::from_toml("windw_days = 10\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn toml_roundtrip() {
        let c = RunConfig {
            workers: 4,
            ..RunConfig::default()
        };
        let parsed = RunConfig::from_toml(&c.to_toml().unwrap()).unwrap();
        assert_eq!(parsed, c);
    }

    #[test]
    fn zero_window_is_invalid() {
        let c = RunConfig {
            window_days: 0,
            ..RunConfig::default()
        };
        assert!(matches!(c.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn window_is_capped() {
        let at_cap = RunConfig {
            window_days: MAX_WINDOW_DAYS,
            ..RunConfig::default()
        };
        assert!(at_cap.validate().is_ok());

        let huge = RunConfig {
            window_days: u32::MAX,
            ..RunConfig::default()
        };
        assert!(matches!(huge.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn month_like_id_column_is_invalid() {
        let c = RunConfig {
            id_column: "2024-01".into(),
            ..RunConfig::default()
        };
        assert!(c.validate().is_err());
    }

    #[test]
    fn too_many_decimal_places_is_invalid() {
        let c = RunConfig {
            decimal_places: 16,
            ..RunConfig::default()
        };
        assert!(c.validate().is_err());
    }

    #[test]
    fn worker_count_falls_back_to_host() {
        assert!(RunConfig::default().worker_count() >= 1);
        let c = RunConfig {
            workers: 3,
            ..RunConfig::default()
        };
        assert_eq!(c.worker_count(), 3);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            RunConfig::from_file(&dir.path().join("divmap.toml")),
            Err(ConfigError::Io { .. })
        ));
    }
}
