//! MACD (Moving Average Convergence Divergence) indicator.

use super::ema::ema_series;
use crate::services::signals::{make_indicator_output, Indicator};
use crate::types::{Bar, IndicatorCategory, IndicatorOutput};

/// MACD, signal and histogram lines aligned with the input bars.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdLines {
    pub macd: Vec<Option<f64>>,
    pub signal: Vec<Option<f64>>,
    pub histogram: Vec<Option<f64>>,
}

/// MACD indicator.
///
/// Shows the relationship between two EMAs:
/// - MACD Line = EMA(12) - EMA(26)
/// - Signal Line = EMA(9) of MACD Line
/// - Histogram = MACD Line - Signal Line
pub struct Macd {
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
}

impl Default for Macd {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
        }
    }
}

impl Macd {
    /// Compute all three lines over closing prices.
    pub fn lines(&self, closes: &[f64]) -> MacdLines {
        let fast = ema_series(closes, self.fast_period);
        let slow = ema_series(closes, self.slow_period);

        let macd: Vec<Option<f64>> = fast
            .iter()
            .zip(&slow)
            .map(|(f, s)| Some((*f)? - (*s)?))
            .collect();

        // Signal EMA runs over the defined stretch of the MACD line only
        let mut signal = vec![None; closes.len()];
        if let Some(first) = macd.iter().position(Option::is_some) {
            let defined: Vec<f64> = macd[first..].iter().flatten().copied().collect();
            for (offset, value) in ema_series(&defined, self.signal_period).into_iter().enumerate() {
                signal[first + offset] = value;
            }
        }

        let histogram = macd
            .iter()
            .zip(&signal)
            .map(|(m, s)| Some((*m)? - (*s)?))
            .collect();

        MacdLines {
            macd,
            signal,
            histogram,
        }
    }
}

impl Indicator for Macd {
    fn id(&self) -> &str {
        "macd"
    }

    fn name(&self) -> &str {
        "MACD"
    }

    fn category(&self) -> IndicatorCategory {
        IndicatorCategory::Trend
    }

    fn min_periods(&self) -> usize {
        self.fast_period.max(self.slow_period) + self.signal_period - 1
    }

    fn calculate(&self, bars: &[Bar]) -> Option<IndicatorOutput> {
        if bars.len() < self.min_periods() {
            return None;
        }
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let lines = self.lines(&closes);
        make_indicator_output(self.id(), self.name(), self.category(), lines.histogram)
    }
}
