//! Relative Strength Index (RSI) indicator.

use crate::services::signals::{make_indicator_output, Indicator};
use crate::types::{Bar, IndicatorCategory, IndicatorOutput};

/// Loss used in place of zero so a loss-free window still yields a finite RSI.
const ZERO_LOSS_FLOOR: f64 = 0.001;

/// RSI (Relative Strength Index) indicator.
///
/// Compares the average gain to the average loss over a trailing window of
/// close-to-close changes. Values range from 0-100:
/// - Below 30: Oversold
/// - Above 70: Overbought
pub struct Rsi {
    period: usize,
}

impl Default for Rsi {
    fn default() -> Self {
        Self { period: 14 }
    }
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    /// RSI at every position, absent until `period` changes exist.
    pub fn series(closes: &[f64], period: usize) -> Vec<Option<f64>> {
        let mut out = vec![None; closes.len()];
        if period == 0 {
            return out;
        }

        // The first bar has no previous close to change from
        let mut gains = vec![0.0; closes.len()];
        let mut losses = vec![0.0; closes.len()];
        for i in 1..closes.len() {
            let change = closes[i] - closes[i - 1];
            if change > 0.0 {
                gains[i] = change;
            } else {
                losses[i] = -change;
            }
        }

        for i in period..closes.len() {
            let window = i + 1 - period..=i;
            let avg_gain = gains[window.clone()].iter().sum::<f64>() / period as f64;
            let avg_loss = losses[window].iter().sum::<f64>() / period as f64;

            let divisor = if avg_loss == 0.0 { ZERO_LOSS_FLOOR } else { avg_loss };
            let rs = avg_gain / divisor;
            out[i] = Some(100.0 - (100.0 / (1.0 + rs)));
        }

        out
    }
}

impl Indicator for Rsi {
    fn id(&self) -> &str {
        "rsi"
    }

    fn name(&self) -> &str {
        "RSI (14)"
    }

    fn category(&self) -> IndicatorCategory {
        IndicatorCategory::Momentum
    }

    fn min_periods(&self) -> usize {
        self.period + 1
    }

    fn calculate(&self, bars: &[Bar]) -> Option<IndicatorOutput> {
        if bars.len() < self.min_periods() {
            return None;
        }
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        make_indicator_output(
            self.id(),
            self.name(),
            self.category(),
            Self::series(&closes, self.period),
        )
    }
}
