//! Exponential Moving Average (EMA) indicator.

use crate::services::signals::{make_indicator_output, Indicator};
use crate::types::{Bar, IndicatorCategory, IndicatorOutput};

/// EMA of `values` at every position.
///
/// Absent for the first `period - 1` positions, seeded with the simple
/// average at `period - 1`, then smoothed with `2 / (period + 1)`.
pub fn ema_series(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }

    let multiplier = 2.0 / (period as f64 + 1.0);

    // First EMA is SMA
    let mut ema = values[..period].iter().sum::<f64>() / period as f64;
    out[period - 1] = Some(ema);

    for (i, value) in values.iter().enumerate().skip(period) {
        ema = (value - ema) * multiplier + ema;
        out[i] = Some(ema);
    }

    out
}

/// EMA (Exponential Moving Average) indicator.
///
/// Like SMA but gives more weight to recent prices.
pub struct Ema {
    period: usize,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        Self { period }
    }
}

impl Indicator for Ema {
    fn id(&self) -> &str {
        match self.period {
            12 => "ema12",
            26 => "ema26",
            _ => "ema",
        }
    }

    fn name(&self) -> &str {
        match self.period {
            12 => "EMA (12)",
            26 => "EMA (26)",
            _ => "EMA",
        }
    }

    fn category(&self) -> IndicatorCategory {
        IndicatorCategory::Trend
    }

    fn min_periods(&self) -> usize {
        self.period.max(1)
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
            ema_series(&closes, self.period),
        )
    }
}
