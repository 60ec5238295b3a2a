//! Fixed-table signal scorer.
//!
//! Adds three sub-scores computed from the latest bars:
//! - Moving-average alignment: -5 to +5
//! - MA5/MA20 crossover in the last three bars: -5, 0 or +5
//! - Volume and candle confirmation: -5 to +5
//!
//! The sum is clamped to [-5, 15] and mapped to a [`Recommendation`].

use crate::types::{AnnotatedBar, AnnotatedSeries, Bar, Recommendation, ScoreBreakdown, SignalScore};
use tracing::debug;

/// Bars required before anything is scored.
pub const MIN_BARS: usize = 5;
/// Bars scanned for a crossover.
pub const CROSS_LOOKBACK: usize = 3;
/// Bars averaged for the volume baseline.
pub const VOLUME_LOOKBACK: usize = 5;

pub const MIN_SCORE: i8 = -5;
pub const MAX_SCORE: i8 = 15;

/// Treat a missing or zero average as unavailable.
fn usable(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0)
}

/// Score the ordering of MA5, MA20, MA60 and MA120.
///
/// Bullish chains are checked before bearish ones, longest first.
pub fn alignment_score(
    ma5: Option<f64>,
    ma20: Option<f64>,
    ma60: Option<f64>,
    ma120: Option<f64>,
) -> i8 {
    let (Some(ma5), Some(ma20), Some(ma60), Some(ma120)) =
        (usable(ma5), usable(ma20), usable(ma60), usable(ma120))
    else {
        return 0;
    };

    if ma5 > ma20 && ma20 > ma60 && ma60 > ma120 {
        5
    } else if ma20 > ma60 && ma60 > ma120 {
        3
    } else if ma60 > ma120 {
        1
    } else if ma5 < ma20 && ma20 < ma60 && ma60 < ma120 {
        -5
    } else if ma20 < ma60 && ma60 < ma120 {
        -3
    } else if ma60 < ma120 {
        -1
    } else {
        0
    }
}

/// Scan `(ma5, ma20)` pairs in date order for the first golden or dead cross.
///
/// Pairs with an unavailable average are skipped.
pub fn cross_score(pairs: &[(Option<f64>, Option<f64>)]) -> i8 {
    if pairs.len() < 2 {
        return 0;
    }

    for window in pairs.windows(2) {
        let (prev, curr) = (window[0], window[1]);
        let (Some(prev5), Some(prev20), Some(curr5), Some(curr20)) = (
            usable(prev.0),
            usable(prev.1),
            usable(curr.0),
            usable(curr.1),
        ) else {
            continue;
        };

        if prev5 <= prev20 && curr5 > curr20 {
            return 5;
        }
        if prev5 >= prev20 && curr5 < curr20 {
            return -5;
        }
    }

    0
}

/// Mean volume of the trailing bars. Unknown volume counts as zero.
pub fn average_volume(bars: &[Bar], lookback: usize) -> f64 {
    if lookback == 0 {
        return 0.0;
    }
    let start = bars.len().saturating_sub(lookback);
    let total: f64 = bars[start..]
        .iter()
        .map(|b| b.volume.unwrap_or(0) as f64)
        .sum();
    total / lookback as f64
}

/// Score today's volume against its baseline, qualified by candle color.
pub fn volume_score(latest: &Bar, avg_volume5: f64) -> i8 {
    let volume = match latest.volume {
        Some(v) if v > 0 => v as f64,
        _ => return 0,
    };
    if latest.open == 0.0 || latest.close == 0.0 || avg_volume5 == 0.0 || !avg_volume5.is_finite() {
        return 0;
    }

    let is_up = latest.is_up_candle();
    let ratio = volume / avg_volume5;

    if !is_up && ratio <= 0.7 {
        -5
    } else if is_up && ratio <= 0.7 {
        -3
    } else if is_up && ratio >= 1.5 {
        5
    } else if is_up && ratio >= 1.2 {
        3
    } else {
        0
    }
}

fn alignment_reason(points: i8) -> &'static str {
    match points {
        5 => "Perfect bullish alignment (MA5 > MA20 > MA60 > MA120)",
        3 => "Bullish alignment (MA20 > MA60 > MA120)",
        1 => "MA60 above MA120",
        -5 => "Perfect bearish alignment (MA5 < MA20 < MA60 < MA120)",
        -3 => "Bearish alignment (MA20 < MA60 < MA120)",
        -1 => "MA60 below MA120",
        _ => "No clear moving-average alignment",
    }
}

fn cross_reason(points: i8) -> &'static str {
    match points {
        5 => "Golden cross: MA5 crossed above MA20 in the last 3 days",
        -5 => "Dead cross: MA5 crossed below MA20 in the last 3 days",
        _ => "No MA5/MA20 crossover in the last 3 days",
    }
}

fn volume_reason(points: i8) -> &'static str {
    match points {
        5 => "Up candle on volume at least 1.5x the 5-day average",
        3 => "Up candle on volume at least 1.2x the 5-day average",
        -3 => "Up candle on volume at most 0.7x the 5-day average",
        -5 => "Down candle on volume at most 0.7x the 5-day average",
        _ => "No volume confirmation",
    }
}

/// Neutral result for series too short to score.
pub fn insufficient(bars: usize) -> SignalScore {
    SignalScore {
        total: 0,
        recommendation: Recommendation::Hold,
        breakdown: ScoreBreakdown::default(),
        rationale: vec![format!(
            "Insufficient data: {} bars, at least {} required",
            bars, MIN_BARS
        )],
        insufficient_data: true,
    }
}

/// Compute the composite score of an annotated series.
pub fn score(series: &AnnotatedSeries) -> SignalScore {
    score_bars(&series.bars)
}

/// Compute the composite score from annotated bars in date order.
pub fn score_bars(bars: &[AnnotatedBar]) -> SignalScore {
    let Some(latest) = bars.last().filter(|_| bars.len() >= MIN_BARS) else {
        return insufficient(bars.len());
    };

    let alignment = alignment_score(latest.ma5, latest.ma20, latest.ma60, latest.ma120);

    let pairs: Vec<(Option<f64>, Option<f64>)> = bars[bars.len() - CROSS_LOOKBACK..]
        .iter()
        .map(|b| (b.ma5, b.ma20))
        .collect();
    let cross = cross_score(&pairs);

    let recent: Vec<Bar> = bars[bars.len() - VOLUME_LOOKBACK..]
        .iter()
        .map(|b| b.bar.clone())
        .collect();
    let avg_volume5 = average_volume(&recent, VOLUME_LOOKBACK);
    let volume = volume_score(&latest.bar, avg_volume5);

    let breakdown = ScoreBreakdown {
        alignment,
        cross,
        volume,
    };
    let total = breakdown.sum().clamp(MIN_SCORE, MAX_SCORE);
    let recommendation = Recommendation::from_score(total);

    debug!(
        "Fixed-table score {} ({} + {} + {}) -> {}",
        total,
        alignment,
        cross,
        volume,
        recommendation.label()
    );

    SignalScore {
        total,
        recommendation,
        breakdown,
        rationale: vec![
            format!("Alignment {:+}: {}", alignment, alignment_reason(alignment)),
            format!("Cross {:+}: {}", cross, cross_reason(cross)),
            format!("Volume {:+}: {}", volume, volume_reason(volume)),
        ],
        insufficient_data: false,
    }
}
