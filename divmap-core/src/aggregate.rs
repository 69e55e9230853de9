//! Merge per-asset monthly series into the result table.
//!
//! The table is a sparse mapping from (asset, month) to amount. There is one
//! row per non-empty series in input order, so an identifier listed twice
//! yields two rows. Month columns are the union of every series' keys,
//! ascending.

use crate::domain::{AssetId, MonthKey, MonthlySeries};
use std::collections::{BTreeMap, BTreeSet};

/// Default name of the identifier column.
pub const DEFAULT_ID_COLUMN: &str = "ativo";

/// One asset's row.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    pub asset: AssetId,
    pub cells: BTreeMap<MonthKey, f64>,
}

impl ResultRow {
    pub fn get(&self, month: &MonthKey) -> Option<f64> {
        self.cells.get(month).copied()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultTable {
    id_column: String,
    months: Vec<MonthKey>,
    rows: Vec<ResultRow>,
}

impl ResultTable {
    /// Outer-join the series on their month keys.
    ///
    /// Returns `None` for an empty input or when every series is empty, so
    /// callers never see a table without rows. Row labels are re-normalized.
    pub fn aggregate(series: &[MonthlySeries], id_column: &str) -> Option<Self> {
        let mut rows: Vec<ResultRow> = Vec::new();
        let mut months: BTreeSet<MonthKey> = BTreeSet::new();

        for s in series.iter().filter(|s| !s.is_empty()) {
            months.extend(s.months.keys().copied());
            rows.push(ResultRow {
                asset: AssetId::normalize(s.asset.as_str()),
                cells: s.months.clone(),
            });
        }

        if rows.is_empty() {
            return None;
        }

        Some(Self {
            id_column: id_column.to_string(),
            months: months.into_iter().collect(),
            rows,
        })
    }

    pub fn id_column(&self) -> &str {
        &self.id_column
    }

    /// Month columns, ascending.
    pub fn months(&self) -> &[MonthKey] {
        &self.months
    }

    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    /// Full header: identifier column first, then months.
    pub fn columns(&self) -> Vec<String> {
        std::iter::once(self.id_column.clone())
            .chain(self.months.iter().map(MonthKey::to_string))
            .collect()
    }

    /// Cell of the first row labelled `asset`.
    pub fn get(&self, asset: &AssetId, month: &MonthKey) -> Option<f64> {
        self.rows
            .iter()
            .find(|r| &r.asset == asset)
            .and_then(|r| r.get(month))
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Fixed-width text rendering for the console; missing cells show as `NaN`.
    pub fn render(&self) -> String {
        let header = self.columns();
        let body: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| {
                std::iter::once(row.asset.to_string())
                    .chain(self.months.iter().map(|m| match row.get(m) {
                        Some(v) => format_amount(v),
                        None => "NaN".to_string(),
                    }))
                    .collect()
            })
            .collect();

        let widths: Vec<usize> = (0..header.len())
            .map(|c| {
                body.iter()
                    .map(|r| r[c].chars().count())
                    .chain(std::iter::once(header[c].chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut out = String::new();
        let mut push_line = |cells: &[String]| {
            let line: Vec<String> = cells
                .iter()
                .enumerate()
                .map(|(c, cell)| {
                    if c == 0 {
                        format!("{cell:<width$}", width = widths[c])
                    } else {
                        format!("{cell:>width$}", width = widths[c])
                    }
                })
                .collect();
            out.push_str(line.join("  ").trim_end());
            out.push('\n');
        };

        push_line(&header);
        for row in &body {
            push_line(row);
        }
        out
    }
}

/// Up to six decimals, trailing zeros trimmed.
fn format_amount(v: f64) -> String {
    let s = format!("{v:.6}");
    let s = s.trim_end_matches('0');
    s.strip_suffix('.').unwrap_or(s).to_string()
}
