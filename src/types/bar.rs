use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::SeriesError;

/// One daily OHLCV observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<u64>,
}

/// Unvalidated bar as received from a caller or decoded from a vendor payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: Option<f64>,
}

impl Bar {
    /// Check the bar's prices and volume.
    ///
    /// `index` is the bar's position in its series and only feeds the error.
    pub fn validate(&self, index: usize) -> Result<(), SeriesError> {
        let prices = [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
        ];

        for (field, value) in prices {
            if !value.is_finite() {
                return Err(SeriesError::invalid_bar(
                    index,
                    format!("{} is not a finite number", field),
                ));
            }
            if value <= 0.0 {
                return Err(SeriesError::invalid_bar(
                    index,
                    format!("{} must be positive, got {}", field, value),
                ));
            }
        }

        if self.high < self.low {
            return Err(SeriesError::invalid_bar(
                index,
                format!("high {} is below low {}", self.high, self.low),
            ));
        }

        Ok(())
    }

    /// Validate a raw bar and convert it.
    ///
    /// Fractional volumes are truncated; a negative or non-finite volume is rejected.
    pub fn try_from_raw(index: usize, raw: RawBar) -> Result<Self, SeriesError> {
        let volume = match raw.volume {
            None => None,
            Some(v) if !v.is_finite() => {
                return Err(SeriesError::invalid_bar(index, "volume is not a finite number"));
            }
            Some(v) if v < 0.0 => {
                return Err(SeriesError::invalid_bar(
                    index,
                    format!("volume must be non-negative, got {}", v),
                ));
            }
            Some(v) => Some(v.trunc() as u64),
        };

        let bar = Bar {
            date: raw.date,
            open: raw.open,
            high: raw.high,
            low: raw.low,
            close: raw.close,
            volume,
        };
        bar.validate(index)?;
        Ok(bar)
    }

    /// Whether the bar closed above its open.
    pub fn is_up_candle(&self) -> bool {
        self.close > self.open
    }
}

/// Ordered daily bars for one symbol.
///
/// Dates are strictly increasing; construction is the only place this is checked,
/// so the bars are not exposed mutably.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    symbol: String,
    bars: Vec<Bar>,
}

impl Series {
    /// Build a series from bars already in ascending date order.
    pub fn new(symbol: impl Into<String>, bars: Vec<Bar>) -> Result<Self, SeriesError> {
        for (index, bar) in bars.iter().enumerate() {
            bar.validate(index)?;
            if index > 0 {
                let prev = bars[index - 1].date;
                if bar.date == prev {
                    return Err(SeriesError::DuplicateDate { date: bar.date });
                }
                if bar.date < prev {
                    return Err(SeriesError::UnorderedDates { index });
                }
            }
        }

        Ok(Self {
            symbol: symbol.into().to_uppercase(),
            bars,
        })
    }

    /// Validate raw bars in any order and build a series sorted by date.
    ///
    /// Vendors frequently deliver newest-first, so the input is sorted before
    /// ordering is checked. Duplicate dates are still rejected.
    pub fn from_raw(symbol: impl Into<String>, raw: Vec<RawBar>) -> Result<Self, SeriesError> {
        let mut bars = raw
            .into_iter()
            .enumerate()
            .map(|(index, raw)| Bar::try_from_raw(index, raw))
            .collect::<Result<Vec<_>, _>>()?;
        bars.sort_by_key(|b| b.date);
        Self::new(symbol, bars)
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// Closing prices in date order.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }
}
