//! Alpha Vantage daily time series payloads.
//!
//! Decodes a `TIME_SERIES_DAILY` response the caller already fetched. Values
//! arrive as strings keyed by date; every field is parsed strictly and a bad
//! record rejects the whole payload.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::debug;

use super::SourceError;
use crate::types::{RawBar, Series};

/// Time series daily response.
#[derive(Debug, Clone, Deserialize)]
pub struct TimeSeriesDailyResponse {
    #[serde(rename = "Meta Data")]
    pub meta_data: Option<TimeSeriesMetaData>,
    #[serde(rename = "Time Series (Daily)")]
    pub time_series: Option<HashMap<String, TimeSeriesDataPoint>>,
    #[serde(rename = "Error Message")]
    pub error_message: Option<String>,
    /// Rate-limit notice.
    #[serde(rename = "Note")]
    pub note: Option<String>,
    #[serde(rename = "Information")]
    pub information: Option<String>,
}

/// Time series meta data.
#[derive(Debug, Clone, Deserialize)]
pub struct TimeSeriesMetaData {
    #[serde(rename = "2. Symbol")]
    pub symbol: Option<String>,
    #[serde(rename = "3. Last Refreshed")]
    pub last_refreshed: Option<String>,
}

/// Individual time series data point.
#[derive(Debug, Clone, Deserialize)]
pub struct TimeSeriesDataPoint {
    #[serde(rename = "1. open")]
    pub open: String,
    #[serde(rename = "2. high")]
    pub high: String,
    #[serde(rename = "3. low")]
    pub low: String,
    #[serde(rename = "4. close")]
    pub close: String,
    #[serde(rename = "5. volume")]
    pub volume: String,
}

fn parse_field(date: &str, field: &str, value: &str) -> Result<f64, SourceError> {
    value.trim().parse().map_err(|_| {
        SourceError::Malformed(format!("{}: {} is not a number: {:?}", date, field, value))
    })
}

impl TimeSeriesDataPoint {
    fn to_raw(&self, date: &str) -> Result<RawBar, SourceError> {
        let parsed = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| SourceError::Malformed(format!("invalid date {:?}", date)))?;

        Ok(RawBar {
            date: parsed,
            open: parse_field(date, "open", &self.open)?,
            high: parse_field(date, "high", &self.high)?,
            low: parse_field(date, "low", &self.low)?,
            close: parse_field(date, "close", &self.close)?,
            volume: Some(parse_field(date, "volume", &self.volume)?),
        })
    }
}

/// Decode a daily time series response into a series.
///
/// When `symbol` is empty the symbol from the meta data is used.
pub fn decode_daily(symbol: &str, payload: &str) -> Result<Series, SourceError> {
    let data: TimeSeriesDailyResponse = serde_json::from_str(payload)?;

    if let Some(message) = data.error_message.or(data.note).or(data.information) {
        return Err(SourceError::Vendor(message));
    }

    let time_series = data
        .time_series
        .ok_or_else(|| SourceError::Malformed("No time series data available".to_string()))?;

    let raw = time_series
        .iter()
        .map(|(date, point)| point.to_raw(date))
        .collect::<Result<Vec<_>, _>>()?;

    let symbol = match symbol.trim() {
        "" => data
            .meta_data
            .and_then(|m| m.symbol)
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| {
                SourceError::Malformed("No symbol given and none in Meta Data".to_string())
            })?,
        s => s.to_string(),
    };

    debug!("Decoded {} Alpha Vantage bars for {}", raw.len(), symbol);
    Ok(Series::from_raw(symbol, raw)?)
}
