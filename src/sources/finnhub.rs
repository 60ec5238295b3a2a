//! Finnhub stock candle payloads.
//!
//! Decodes a `/stock/candle` response the caller already fetched. Finnhub
//! sends parallel arrays plus a status flag.

use chrono::DateTime;
use serde::Deserialize;
use tracing::debug;

use super::SourceError;
use crate::types::{RawBar, Series};

/// Finnhub candle response.
#[derive(Debug, Clone, Deserialize)]
pub struct FinnhubCandles {
    /// Close prices
    #[serde(rename = "c", default)]
    pub close: Vec<f64>,
    /// High prices
    #[serde(rename = "h", default)]
    pub high: Vec<f64>,
    /// Low prices
    #[serde(rename = "l", default)]
    pub low: Vec<f64>,
    /// Open prices
    #[serde(rename = "o", default)]
    pub open: Vec<f64>,
    /// Status, `ok` or `no_data`
    #[serde(rename = "s")]
    pub status: String,
    /// Unix timestamps (seconds)
    #[serde(rename = "t", default)]
    pub timestamp: Vec<i64>,
    /// Volumes
    #[serde(rename = "v", default)]
    pub volume: Vec<f64>,
    /// Error text on rejected requests
    #[serde(default)]
    pub error: Option<String>,
}

/// Decode a candle response into a daily series.
pub fn decode_candles(symbol: &str, payload: &str) -> Result<Series, SourceError> {
    let data: FinnhubCandles = serde_json::from_str(payload)?;

    if let Some(error) = data.error {
        return Err(SourceError::Vendor(error));
    }
    if data.status != "ok" {
        return Err(SourceError::Vendor(format!(
            "Finnhub returned status {:?} for {}",
            data.status, symbol
        )));
    }

    let n = data.timestamp.len();
    if [data.open.len(), data.high.len(), data.low.len(), data.close.len()]
        .iter()
        .any(|&len| len != n)
    {
        return Err(SourceError::Malformed(
            "Candle arrays have different lengths".to_string(),
        ));
    }

    let raw = (0..n)
        .map(|i| {
            let date = DateTime::from_timestamp(data.timestamp[i], 0)
                .ok_or_else(|| {
                    SourceError::Malformed(format!("invalid timestamp {}", data.timestamp[i]))
                })?
                .date_naive();
            Ok(RawBar {
                date,
                open: data.open[i],
                high: data.high[i],
                low: data.low[i],
                close: data.close[i],
                volume: data.volume.get(i).copied(),
            })
        })
        .collect::<Result<Vec<_>, SourceError>>()?;

    debug!("Decoded {} Finnhub candles for {}", raw.len(), symbol);
    Ok(Series::from_raw(symbol.trim(), raw)?)
}
