//! Vendor payload decoders.
//!
//! The service does no network I/O. Callers fetch data from a vendor and post
//! the raw JSON; each decoder turns it into a validated [`Series`].

pub mod alphavantage;
pub mod finnhub;
pub mod yahoo;

use thiserror::Error;

use crate::error::SeriesError;
use crate::types::Series;

pub use alphavantage::decode_daily;
pub use finnhub::decode_candles;
pub use yahoo::{decode_chart, normalize_yahoo_symbol};

/// Errors raised while decoding a vendor payload.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The vendor reported an error or rate limit instead of data.
    #[error("Vendor error: {0}")]
    Vendor(String),

    #[error("Malformed payload: {0}")]
    Malformed(String),

    #[error(transparent)]
    Series(#[from] SeriesError),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Supported market data vendors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    AlphaVantage,
    Yahoo,
    Finnhub,
}

impl Provider {
    pub const ALL: [Provider; 3] = [Provider::AlphaVantage, Provider::Yahoo, Provider::Finnhub];

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "alphavantage" | "alpha_vantage" | "alpha-vantage" => Some(Self::AlphaVantage),
            "yahoo" | "yahoo_finance" => Some(Self::Yahoo),
            "finnhub" => Some(Self::Finnhub),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AlphaVantage => "alphavantage",
            Self::Yahoo => "yahoo",
            Self::Finnhub => "finnhub",
        }
    }

    /// Decode a raw payload from this vendor.
    ///
    /// A payload that decodes to no bars is rejected.
    pub fn decode(&self, symbol: &str, payload: &str) -> Result<Series, SourceError> {
        let series = match self {
            Self::AlphaVantage => decode_daily(symbol, payload)?,
            Self::Yahoo => decode_chart(&normalize_yahoo_symbol(symbol), payload)?,
            Self::Finnhub => decode_candles(symbol, payload)?,
        };
        if series.is_empty() {
            return Err(SeriesError::Empty.into());
        }
        Ok(series)
    }
}
