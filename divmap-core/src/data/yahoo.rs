//! Yahoo Finance dividend provider.
//!
//! Fetches the full dividend history from Yahoo's v8 chart API with
//! `events=div`. One request per symbol, no retries: a failure is reported
//! to the caller, which treats it as "no data" for that asset.
//!
//! Yahoo Finance has no official API and is subject to unannounced format changes.

use super::provider::{DataSource, DividendHistory, DividendProvider, ProviderError};
use crate::domain::DividendEvent;
use chrono::NaiveDateTime;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

const CHART_BASE_URL: &str = "https://query2.finance.yahoo.com/v8/finance/chart/";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Yahoo Finance v8 chart API response.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    meta: Option<ChartMeta>,
    events: Option<ChartEvents>,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    gmtoffset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct ChartEvents {
    dividends: Option<HashMap<String, DividendEntry>>,
}

#[derive(Debug, Deserialize)]
struct DividendEntry {
    amount: f64,
    date: i64,
}

/// Yahoo Finance dividend provider.
pub struct YahooDividendProvider {
    client: reqwest::blocking::Client,
}

impl YahooDividendProvider {
    pub fn new(timeout: Duration) -> Result<Self, ProviderError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ProviderError::Other(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// Build the chart API URL requesting the complete dividend history.
    ///
    /// The symbol is pushed as a single path segment, so `/`, `?` and `#`
    /// are percent-encoded rather than reshaping the request.
    fn chart_url(symbol: &str) -> Result<reqwest::Url, ProviderError> {
        let mut url = reqwest::Url::parse(CHART_BASE_URL)
            .map_err(|e| ProviderError::Other(format!("invalid chart URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| ProviderError::Other("chart URL cannot take path segments".into()))?
            .pop_if_empty()
            .push(symbol);
        url.query_pairs_mut()
            .append_pair("range", "max")
            .append_pair("interval", "1d")
            .append_pair("events", "div");
        Ok(url)
    }

    /// Parse the chart API response into dividend events.
    ///
    /// Epoch timestamps are shifted by the exchange's `gmtoffset` and kept as
    /// naive local times. Negative or non-finite amounts are dropped.
    fn parse_response(symbol: &str, resp: ChartResponse) -> Result<Vec<DividendEvent>, ProviderError> {
        let result = resp.chart.result.ok_or_else(|| {
            if let Some(err) = resp.chart.error {
                if err.code == "Not Found" {
                    ProviderError::SymbolNotFound {
                        symbol: symbol.to_string(),
                    }
                } else {
                    ProviderError::ResponseFormatChanged(format!("{}: {}", err.code, err.description))
                }
            } else {
                ProviderError::ResponseFormatChanged("empty result with no error".into())
            }
        })?;

        let data = result
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::ResponseFormatChanged("result array is empty".into()))?;

        let offset = data.meta.and_then(|m| m.gmtoffset).unwrap_or(0);

        let Some(dividends) = data.events.and_then(|e| e.dividends) else {
            return Ok(Vec::new());
        };

        let mut events = Vec::with_capacity(dividends.len());
        for entry in dividends.into_values() {
            if !entry.amount.is_finite() || entry.amount < 0.0 {
                continue;
            }
            let timestamp = local_naive(entry.date, offset).ok_or_else(|| {
                ProviderError::ResponseFormatChanged(format!("invalid timestamp: {}", entry.date))
            })?;
            events.push(DividendEvent::new(timestamp, entry.amount));
        }

        Ok(events)
    }
}

/// UTC epoch seconds shifted into exchange-local wall time, offset dropped.
fn local_naive(epoch: i64, gmtoffset: i64) -> Option<NaiveDateTime> {
    chrono::DateTime::from_timestamp(epoch.checked_add(gmtoffset)?, 0).map(|dt| dt.naive_utc())
}

impl DividendProvider for YahooDividendProvider {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn fetch_dividends(&self, symbol: &str) -> Result<DividendHistory, ProviderError> {
        let url = Self::chart_url(symbol)?;

        let resp = self.client.get(url).send().map_err(|e| {
            if e.is_timeout() {
                ProviderError::NetworkUnreachable(format!("timed out: {e}"))
            } else {
                ProviderError::NetworkUnreachable(e.to_string())
            }
        })?;

        let status = resp.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ProviderError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = resp
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(60);
            return Err(ProviderError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        if !status.is_success() {
            return Err(ProviderError::Http {
                status: status.as_u16(),
                symbol: symbol.to_string(),
            });
        }

        let chart: ChartResponse = resp.json().map_err(|e| {
            ProviderError::ResponseFormatChanged(format!("failed to parse response for {symbol}: {e}"))
        })?;

        let events = Self::parse_response(symbol, chart)?;
        Ok(DividendHistory::new(symbol, events, DataSource::YahooFinance))
    }
}
