//! Trading signal scoring.
//!
//! Two independent strategies score an annotated series:
//! - [`scorer`]: fixed-table composite in [-5, 15]
//! - [`weighted`]: period-weighted 0-10 display score
//!
//! [`indicators`] adds EMA, MACD and RSI series for display.

pub mod indicators;
pub mod scorer;
pub mod weighted;

use crate::types::{round2, Bar, IndicatorCategory, IndicatorOutput};

/// Trait for implementing technical indicators.
pub trait Indicator: Send + Sync {
    /// Unique identifier for this indicator.
    fn id(&self) -> &str;

    /// Human-readable name.
    fn name(&self) -> &str;

    /// Category this indicator belongs to.
    fn category(&self) -> IndicatorCategory;

    /// Minimum number of bars required for a first value.
    fn min_periods(&self) -> usize;

    /// Calculate the indicator over the bars.
    /// Returns None if there are fewer than `min_periods` bars.
    fn calculate(&self, bars: &[Bar]) -> Option<IndicatorOutput>;
}

/// Helper to create an IndicatorOutput from a per-bar series.
///
/// Values are rounded to two decimals; `value` is the latest defined entry.
pub fn make_indicator_output(
    id: &str,
    name: &str,
    category: IndicatorCategory,
    series: Vec<Option<f64>>,
) -> Option<IndicatorOutput> {
    let value = series.iter().rev().find_map(|v| *v)?;
    Some(IndicatorOutput {
        id: id.to_string(),
        name: name.to_string(),
        category,
        value: round2(value),
        series: series.into_iter().map(|v| v.map(round2)).collect(),
    })
}
