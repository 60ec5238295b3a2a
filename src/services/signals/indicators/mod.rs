//! Technical indicator implementations.

pub mod ema;
pub mod macd;
pub mod rsi;

pub use ema::Ema;
pub use macd::{Macd, MacdLines};
pub use rsi::Rsi;

use super::Indicator;

/// Get all available indicators.
pub fn all_indicators() -> Vec<Box<dyn Indicator>> {
    vec![
        // Trend indicators
        Box::new(Ema::new(12)),
        Box::new(Ema::new(26)),
        Box::new(Macd::default()),
        // Momentum indicators
        Box::new(Rsi::default()),
    ]
}
