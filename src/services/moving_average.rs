//! Simple moving averages over closing prices.

use crate::types::{AnnotatedBar, AnnotatedSeries, MaPolicy, Series};
use tracing::debug;

/// Windows annotated onto every bar.
pub const MA_WINDOWS: [usize; 5] = [5, 10, 20, 60, 120];

/// Moving average of `closes` at every position.
///
/// Uses a running sum: each step adds the newest close and subtracts the one
/// leaving the window. Positions before a full window follow `policy`.
/// A zero window has no defined average anywhere.
pub fn moving_average(closes: &[f64], window: usize, policy: MaPolicy) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; closes.len()];
    }

    let mut values = Vec::with_capacity(closes.len());
    let mut sum = 0.0;

    for (i, close) in closes.iter().enumerate() {
        sum += close;
        if i >= window {
            sum -= closes[i - window];
        }

        let count = (i + 1).min(window);
        let value = if count == window {
            Some(sum / window as f64)
        } else {
            match policy {
                MaPolicy::Strict => None,
                MaPolicy::Expanding => Some(sum / count as f64),
            }
        };
        values.push(value);
    }

    values
}

/// Annotate every bar with MA5/10/20/60/120.
pub fn annotate(series: &Series, policy: MaPolicy) -> AnnotatedSeries {
    let closes = series.closes();
    let [ma5, ma10, ma20, ma60, ma120] =
        MA_WINDOWS.map(|window| moving_average(&closes, window, policy));

    debug!(
        "Annotated {} bars for {} with {:?} policy",
        closes.len(),
        series.symbol(),
        policy
    );

    let bars = series
        .bars()
        .iter()
        .enumerate()
        .map(|(i, bar)| AnnotatedBar {
            bar: bar.clone(),
            ma5: ma5[i],
            ma10: ma10[i],
            ma20: ma20[i],
            ma60: ma60[i],
            ma120: ma120[i],
        })
        .collect();

    AnnotatedSeries {
        symbol: series.symbol().to_string(),
        policy,
        bars,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Bar;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn series_from_closes(closes: &[f64]) -> Series {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Bar {
                date: start + chrono::Days::new(i as u64),
                open: close,
                high: close,
                low: close,
                close,
                volume: Some(1_000),
            })
            .collect();
        Series::new("TEST", bars).unwrap()
    }

    #[test]
    fn test_strict_ma5_on_five_bars() {
        let ma = moving_average(&[10.0, 11.0, 12.0, 13.0, 14.0], 5, MaPolicy::Strict);
        assert_eq!(ma, vec![None, None, None, None, Some(12.0)]);
    }

    #[test]
    fn test_expanding_fills_warm_up() {
        let ma = moving_average(&[10.0, 11.0, 12.0, 13.0, 14.0, 15.0], 5, MaPolicy::Expanding);
        assert_eq!(
            ma,
            vec![Some(10.0), Some(10.5), Some(11.0), Some(11.5), Some(12.0), Some(13.0)]
        );
    }

    #[test]
    fn test_window_longer_than_series() {
        let closes = [10.0, 11.0, 12.0];
        assert_eq!(moving_average(&closes, 120, MaPolicy::Strict), vec![None; 3]);
        assert_eq!(
            moving_average(&closes, 120, MaPolicy::Expanding).last().copied().flatten(),
            Some(11.0)
        );
    }

    #[test]
    fn test_zero_window_is_absent() {
        assert_eq!(moving_average(&[1.0, 2.0], 0, MaPolicy::Expanding), vec![None, None]);
    }

    #[test]
    fn test_annotate_all_windows() {
        let closes: Vec<f64> = (1..=130).map(|c| c as f64).collect();
        let annotated = annotate(&series_from_closes(&closes), MaPolicy::Strict);
        assert_eq!(annotated.len(), 130);

        let first = &annotated.bars[0];
        assert_eq!(first.ma5, None);

        let last = annotated.last().unwrap();
        assert_eq!(last.ma5, Some(128.0));
        assert_eq!(last.ma10, Some(125.5));
        assert_eq!(last.ma20, Some(120.5));
        assert_eq!(last.ma60, Some(100.5));
        assert_eq!(last.ma120, Some(70.5));
        assert_eq!(annotated.bars[118].ma120, None);
        assert!(annotated.bars[119].ma120.is_some());
    }

    proptest! {
        #[test]
        fn prop_sliding_matches_direct_mean(
            closes in prop::collection::vec(1.0f64..1000.0, 1..200),
            window in 1usize..130,
        ) {
            let strict = moving_average(&closes, window, MaPolicy::Strict);
            let expanding = moving_average(&closes, window, MaPolicy::Expanding);

            for i in 0..closes.len() {
                if i + 1 >= window {
                    let direct = closes[i + 1 - window..=i].iter().sum::<f64>() / window as f64;
                    let value = strict[i].unwrap();
                    prop_assert!((value - direct).abs() < 1e-6 * direct.max(1.0));
                    prop_assert_eq!(expanding[i], strict[i]);
                } else {
                    prop_assert!(strict[i].is_none());
                    let direct = closes[..=i].iter().sum::<f64>() / (i + 1) as f64;
                    prop_assert!((expanding[i].unwrap() - direct).abs() < 1e-6 * direct.max(1.0));
                }
            }
        }
    }
}
