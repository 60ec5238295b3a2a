//! Yahoo Finance chart payloads.
//!
//! Decodes a `v8/finance/chart` response the caller already fetched.

use chrono::DateTime;
use serde::Deserialize;
use tracing::debug;

use super::SourceError;
use crate::types::{RawBar, Series};

/// Yahoo Finance chart response.
#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: YahooChart,
}

#[derive(Debug, Deserialize)]
struct YahooChart {
    result: Option<Vec<YahooResult>>,
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct YahooError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct YahooResult {
    meta: YahooMeta,
    timestamp: Option<Vec<i64>>,
    indicators: YahooIndicators,
}

#[derive(Debug, Deserialize)]
struct YahooMeta {
    symbol: String,
}

#[derive(Debug, Deserialize)]
struct YahooIndicators {
    quote: Vec<YahooQuote>,
}

#[derive(Debug, Deserialize)]
struct YahooQuote {
    open: Option<Vec<Option<f64>>>,
    high: Option<Vec<Option<f64>>>,
    low: Option<Vec<Option<f64>>>,
    close: Option<Vec<Option<f64>>>,
    volume: Option<Vec<Option<u64>>>,
}

fn at<T: Copy>(values: &[Option<T>], i: usize) -> Option<T> {
    values.get(i).copied().flatten()
}

/// Normalize symbol for Yahoo Finance.
/// Yahoo uses hyphens instead of dots for share classes (e.g., BRK-B not BRK.B)
pub fn normalize_yahoo_symbol(symbol: &str) -> String {
    symbol.to_uppercase().replace('.', "-")
}

/// Decode a chart response into a daily series.
///
/// Rows with a null price are skipped (Yahoo emits them for halted sessions).
/// When several rows fall on the same day the last one wins, which covers the
/// live row Yahoo appends for the current session.
pub fn decode_chart(symbol: &str, payload: &str) -> Result<Series, SourceError> {
    let data: YahooChartResponse = serde_json::from_str(payload)?;

    if let Some(error) = data.chart.error {
        return Err(SourceError::Vendor(format!(
            "{} - {}",
            error.code, error.description
        )));
    }

    let result = data
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| SourceError::Malformed("No results in response".to_string()))?;

    let timestamps = result.timestamp.unwrap_or_default();
    let quote = result
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or_else(|| SourceError::Malformed("No quote data in response".to_string()))?;

    let opens = quote.open.unwrap_or_default();
    let highs = quote.high.unwrap_or_default();
    let lows = quote.low.unwrap_or_default();
    let closes = quote.close.unwrap_or_default();
    let volumes = quote.volume.unwrap_or_default();

    let mut raw: Vec<RawBar> = Vec::with_capacity(timestamps.len());
    for (i, &timestamp) in timestamps.iter().enumerate() {
        let (Some(open), Some(high), Some(low), Some(close)) =
            (at(&opens, i), at(&highs, i), at(&lows, i), at(&closes, i))
        else {
            continue;
        };

        let date = DateTime::from_timestamp(timestamp, 0)
            .ok_or_else(|| SourceError::Malformed(format!("invalid timestamp {}", timestamp)))?
            .date_naive();

        let bar = RawBar {
            date,
            open,
            high,
            low,
            close,
            volume: at(&volumes, i).map(|v| v as f64),
        };

        match raw.last_mut() {
            Some(last) if last.date == date => *last = bar,
            _ => raw.push(bar),
        }
    }

    let symbol = match symbol.trim() {
        "" => result.meta.symbol,
        s => s.to_string(),
    };

    debug!("Decoded {} Yahoo bars for {}", raw.len(), symbol);
    Ok(Series::from_raw(symbol, raw)?)
}
