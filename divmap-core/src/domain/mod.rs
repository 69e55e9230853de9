//! Domain types: asset identifiers, dividend events, monthly series, trailing window.

pub mod asset;
pub mod dividend;
pub mod series;
pub mod window;

pub use asset::{normalize_text, AssetId};
pub use dividend::{DividendEvent, MonthKey, MonthKeyError};
pub use series::MonthlySeries;
pub use window::{TrailingWindow, DEFAULT_WINDOW_DAYS, MAX_WINDOW_DAYS};
