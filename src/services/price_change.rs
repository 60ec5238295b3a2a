//! Price changes against past closes.

use chrono::{Days, NaiveDate};

use crate::types::{Bar, PriceChange, PriceChanges};

/// Close on `target`, else the nearest earlier close, else the oldest close.
fn close_on_or_before(bars: &[Bar], target: NaiveDate) -> Option<f64> {
    // Bars are sorted, so the last bar not after the target is the closest match
    let idx = bars.partition_point(|b| b.date <= target);
    if idx > 0 {
        Some(bars[idx - 1].close)
    } else {
        bars.first().map(|b| b.close)
    }
}

/// Change from `past` to `current`. A zero past price has no defined change.
pub fn price_change(current: f64, past: f64) -> Option<PriceChange> {
    if past == 0.0 || !past.is_finite() {
        return None;
    }
    let change = current - past;
    Some(PriceChange {
        change,
        percent_change: change / past * 100.0,
    })
}

/// Change of the latest close against `days` calendar days earlier.
pub fn change_over_days(bars: &[Bar], days: u64) -> Option<PriceChange> {
    let latest = bars.last()?;
    let target = latest.date.checked_sub_days(Days::new(days))?;
    let past = close_on_or_before(bars, target)?;
    price_change(latest.close, past)
}

/// Week (7 days), month (30 days) and year (365 days) changes.
pub fn price_changes(bars: &[Bar]) -> PriceChanges {
    PriceChanges {
        week: change_over_days(bars, 7),
        month: change_over_days(bars, 30),
        year: change_over_days(bars, 365),
    }
}
