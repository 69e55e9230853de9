//! JSON serialization of the result table.
//!
//! The artifact is an array of row objects. Each object starts with the
//! identifier column followed by month columns in ascending order. Text is
//! written as UTF-8, never `\u`-escaped.

use crate::aggregate::ResultTable;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Default output file name.
pub const DEFAULT_OUTPUT: &str = "mapa_dividendos_12meses.json";

/// Default rounding of amounts in the artifact.
pub const DEFAULT_DECIMAL_PLACES: u32 = 10;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to serialize result table: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// How a month with no payment for an asset appears in a row object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingCells {
    /// Key left out of the row object.
    #[default]
    Omit,
    /// Key present with `null`.
    Null,
}

impl FromStr for MissingCells {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "omit" => Ok(MissingCells::Omit),
            "null" => Ok(MissingCells::Null),
            other => Err(format!("unknown missing-cells mode '{other}' (expected omit or null)")),
        }
    }
}

impl fmt::Display for MissingCells {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingCells::Omit => f.write_str("omit"),
            MissingCells::Null => f.write_str("null"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputOptions {
    pub missing_cells: MissingCells,
    pub decimal_places: u32,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            missing_cells: MissingCells::Omit,
            decimal_places: DEFAULT_DECIMAL_PLACES,
        }
    }
}

/// Build the row objects in column order.
pub fn to_records(table: &ResultTable, opts: &OutputOptions) -> Vec<Value> {
    table
        .rows()
        .iter()
        .map(|row| {
            let mut obj = Map::new();
            obj.insert(table.id_column().to_string(), Value::String(row.asset.to_string()));
            for month in table.months() {
                match row.get(month) {
                    Some(v) => {
                        obj.insert(month.to_string(), number(round_to(v, opts.decimal_places)));
                    }
                    None if opts.missing_cells == MissingCells::Null => {
                        obj.insert(month.to_string(), Value::Null);
                    }
                    None => {}
                }
            }
            Value::Object(obj)
        })
        .collect()
}

/// Compact JSON text of the table.
pub fn render_json(table: &ResultTable, opts: &OutputOptions) -> Result<String, OutputError> {
    Ok(serde_json::to_string(&to_records(table, opts))?)
}

/// Serialize and write the table to `path`.
pub fn write_json(table: &ResultTable, path: &Path, opts: &OutputOptions) -> Result<(), OutputError> {
    let json = render_json(table, opts)?;
    std::fs::write(path, json).map_err(|source| OutputError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn round_to(v: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    let rounded = (v * factor).round() / factor;
    if rounded.is_finite() {
        rounded
    } else {
        v
    }
}

fn number(v: f64) -> Value {
    Number::from_f64(v).map_or(Value::Null, Value::Number)
}
