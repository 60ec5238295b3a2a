//! Period-weighted display scorer.
//!
//! Blends three sub-scores with weights taken from the requested [`ChartPeriod`]:
//! - MA position: how many of seven price/average orderings are bullish (0-7)
//! - Momentum: recent average close vs. the window before it (+1 / -1)
//! - Trend strength: share of up-days in a trailing window (0-1)
//!
//! The weighted sum is doubled into a 0-10 display score.

use crate::types::{AnnotatedBar, AnnotatedSeries, ChartPeriod, TrendBand, WeightedAnalysis, WeightedScore};
use tracing::debug;

/// Trend strength reported when fewer than two bars are available.
pub const NEUTRAL_TREND: f64 = 0.5;

/// Count bullish price/average orderings on the latest bar.
///
/// A comparison against an absent average does not count.
pub fn ma_position(latest: &AnnotatedBar) -> (u8, Vec<String>) {
    let price = latest.bar.close;
    let above = |ma: Option<f64>| ma.is_some_and(|m| price > m);
    let stacked = |upper: Option<f64>, lower: Option<f64>| match (upper, lower) {
        (Some(u), Some(l)) => u > l,
        _ => false,
    };

    let conditions = [
        (above(latest.ma5), "Current price is above 5-day moving average"),
        (above(latest.ma20), "Current price is above 20-day moving average"),
        (above(latest.ma60), "Current price is above 60-day moving average"),
        (above(latest.ma120), "Current price is above 120-day moving average"),
        (
            stacked(latest.ma5, latest.ma20),
            "5-day moving average is above 20-day moving average",
        ),
        (
            stacked(latest.ma20, latest.ma60),
            "20-day moving average is above 60-day moving average",
        ),
        (
            stacked(latest.ma60, latest.ma120),
            "60-day moving average is above 120-day moving average",
        ),
    ];

    let analysis: Vec<String> = conditions
        .iter()
        .filter(|(met, _)| *met)
        .map(|(_, text)| text.to_string())
        .collect();

    (analysis.len() as u8, analysis)
}

/// Compare the mean close of the last `recent` bars to the `previous` bars before them.
pub fn momentum(closes: &[f64], recent: usize, previous: usize) -> (i8, String) {
    if recent == 0 || previous == 0 || closes.len() < recent + previous {
        return (
            0,
            "Insufficient data to perform momentum analysis".to_string(),
        );
    }

    let split = closes.len() - recent;
    let recent_avg = closes[split..].iter().sum::<f64>() / recent as f64;
    let previous_avg = closes[split - previous..split].iter().sum::<f64>() / previous as f64;

    if recent_avg > previous_avg {
        (
            1,
            format!(
                "Recent {} data points average is higher than previous {} data points (Bullish momentum)",
                recent, previous
            ),
        )
    } else {
        (
            -1,
            format!(
                "Recent {} data points average is lower than previous {} data points (Bearish momentum)",
                recent, previous
            ),
        )
    }
}

fn describe_trend(strength: f64) -> &'static str {
    match strength {
        s if s >= 0.7 => "Strong bullish trend",
        s if s >= 0.6 => "Bullish trend",
        s if s >= 0.4 => "Sideways trend",
        s if s >= 0.3 => "Bearish trend",
        _ => "Strong bearish trend",
    }
}

/// Share of up-days among the last `window` closes.
pub fn trend_strength(closes: &[f64], window: usize) -> (f64, String) {
    let start = closes.len().saturating_sub(window);
    let recent = &closes[start..];
    if recent.len() < 2 {
        return (
            NEUTRAL_TREND,
            "Insufficient data to perform trend analysis".to_string(),
        );
    }

    let up_days = recent.windows(2).filter(|w| w[1] > w[0]).count();
    let strength = up_days as f64 / (recent.len() - 1) as f64;

    (
        strength,
        format!(
            "Recent {} data points, {} up ({})",
            recent.len(),
            up_days,
            describe_trend(strength)
        ),
    )
}

/// Score an annotated series for a display period.
///
/// Returns `None` for an empty series.
pub fn score(series: &AnnotatedSeries, period: ChartPeriod) -> Option<WeightedScore> {
    let latest = series.last()?;
    let closes: Vec<f64> = series.bars.iter().map(|b| b.bar.close).collect();
    let weights = period.weights();

    let (ma_score, ma_analysis) = ma_position(latest);
    let (recent, previous) = period.momentum_window();
    let (momentum_score, momentum_analysis) = momentum(&closes, recent, previous);
    let (trend, trend_analysis) = trend_strength(&closes, period.trend_window());

    let raw = (f64::from(ma_score) * weights.ma
        + f64::from(momentum_score) * weights.momentum
        + trend * weights.trend)
        * 2.0;
    let clamped = raw.clamp(0.0, 10.0);
    // Band thresholds apply to the unrounded score; rounding is for display only
    let band = TrendBand::from_score(clamped);
    let score = (clamped * 10.0).round() / 10.0;

    debug!(
        "Weighted {} score for {}: {:.1} ({})",
        period.as_str(),
        series.symbol,
        score,
        band.label()
    );

    Some(WeightedScore {
        period,
        weights,
        score,
        band,
        description: band.description().to_string(),
        ma_score,
        momentum_score,
        trend_strength: trend,
        analysis: WeightedAnalysis {
            ma: ma_analysis,
            momentum: momentum_analysis,
            trend: trend_analysis,
        },
    })
}
