//! Integration tests for the analysis services

use chrono::{Days, NaiveDate};
use trendscope::services::signals::{scorer, weighted};
use trendscope::services::{annotate, moving_average, AnalysisOptions, AnalysisService};
use trendscope::types::*;
use trendscope::AppError;

/// Daily series starting 2024-01-01 with flat candles and fixed volume.
fn series_from_closes(closes: &[f64]) -> Series {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| Bar {
            date: start + Days::new(i as u64),
            open: close,
            high: close,
            low: close,
            close,
            volume: Some(1000),
        })
        .collect();
    Series::new("test", bars).unwrap()
}

fn annotated_bar(close: f64, ma5: Option<f64>, ma20: Option<f64>) -> AnnotatedBar {
    AnnotatedBar {
        bar: Bar {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            volume: Some(1000),
        },
        ma5,
        ma10: None,
        ma20,
        ma60: None,
        ma120: None,
    }
}

#[test]
fn test_strict_ma5_on_five_closes() {
    let closes = [10.0, 11.0, 12.0, 13.0, 14.0];
    let ma5 = moving_average(&closes, 5, MaPolicy::Strict);
    assert_eq!(ma5[..4], [None, None, None, None]);
    assert_eq!(ma5[4], Some(12.0));
}

#[test]
fn test_expanding_matches_strict_once_warm() {
    let closes: Vec<f64> = (0..30).map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0).collect();
    let strict = moving_average(&closes, 20, MaPolicy::Strict);
    let expanding = moving_average(&closes, 20, MaPolicy::Expanding);

    assert!(expanding.iter().all(Option::is_some));
    for i in 19..closes.len() {
        let (s, e) = (strict[i].unwrap(), expanding[i].unwrap());
        assert!((s - e).abs() < 1e-9);
    }
    assert_eq!(expanding[0], Some(closes[0]));
}

#[test]
fn test_annotate_fills_every_window() {
    let closes: Vec<f64> = (1..=130).map(|c| c as f64).collect();
    let annotated = annotate(&series_from_closes(&closes), MaPolicy::Strict);
    let last = annotated.last().unwrap();
    assert_eq!(last.ma5, Some(128.0));
    assert_eq!(last.ma10, Some(125.5));
    assert_eq!(last.ma20, Some(120.5));
    assert_eq!(last.ma60, Some(100.5));
    assert_eq!(last.ma120, Some(70.5));
    assert_eq!(annotated.bars[118].ma120, None);
}

#[test]
fn test_short_series_scores_zero_hold() {
    for n in 0..5 {
        let closes: Vec<f64> = (0..n).map(|c| 10.0 + c as f64).collect();
        let annotated = annotate(&series_from_closes(&closes), MaPolicy::Expanding);
        let result = scorer::score(&annotated);
        assert_eq!(result.total, 0);
        assert_eq!(result.recommendation, Recommendation::Hold);
        assert!(result.insufficient_data);
    }
}

#[test]
fn test_alignment_is_symmetric() {
    assert_eq!(scorer::alignment_score(Some(12.0), Some(11.0), Some(10.0), Some(9.0)), 5);
    assert_eq!(scorer::alignment_score(Some(9.0), Some(10.0), Some(11.0), Some(12.0)), -5);
}

#[test]
fn test_golden_cross_on_first_pair() {
    // Cross between day 1 and day 2; day 3 is irrelevant
    let pairs = [
        (Some(10.0), Some(11.0)),
        (Some(12.0), Some(11.0)),
        (Some(9.0), Some(11.0)),
    ];
    assert_eq!(scorer::cross_score(&pairs), 5);
}

#[test]
fn test_volume_surge_on_up_candle() {
    let bar = Bar {
        date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        open: 10.0,
        high: 12.0,
        low: 10.0,
        close: 12.0,
        volume: Some(2000),
    };
    assert_eq!(scorer::volume_score(&bar, 1000.0), 5);
}

#[test]
fn test_maximum_composite_is_strong_buy() {
    // Golden cross on the last day, full bullish alignment, surging up candle
    let mut bars: Vec<AnnotatedBar> = (0..4).map(|_| annotated_bar(10.0, Some(10.0), Some(11.0))).collect();
    let mut last = annotated_bar(12.0, Some(12.0), Some(11.0));
    last.bar.open = 10.0;
    last.bar.volume = Some(5000);
    last.ma60 = Some(10.0);
    last.ma120 = Some(9.0);
    bars.push(last);

    let result = scorer::score_bars(&bars);
    assert_eq!(result.breakdown.alignment, 5);
    assert_eq!(result.breakdown.cross, 5);
    assert_eq!(result.breakdown.volume, 5);
    assert_eq!(result.total, 15);
    assert_eq!(result.recommendation, Recommendation::StrongBuy);
    assert_eq!(result.rationale.len(), 3);
}

#[test]
fn test_weighted_score_in_display_range() {
    let closes: Vec<f64> = (0..200).map(|i| 50.0 + (i as f64 * 0.3).cos() * 10.0).collect();
    let annotated = annotate(&series_from_closes(&closes), MaPolicy::Strict);
    for period in ChartPeriod::ALL {
        let result = weighted::score(&annotated, period).unwrap();
        assert!((0.0..=10.0).contains(&result.score), "{:?}: {}", period, result.score);
        assert!(result.ma_score <= 7);
    }
}

#[test]
fn test_weighted_band_just_below_threshold() {
    let mut closes = vec![110.0, 111.0, 110.0, 111.0, 110.0, 111.0, 110.0, 111.0, 110.0, 111.0];
    closes.extend([100.0, 101.0, 100.0, 101.0, 100.0, 101.0, 100.0, 101.0, 100.0, 100.0]);
    let mut annotated = annotate(&series_from_closes(&closes), MaPolicy::Strict);
    let last = annotated.bars.last_mut().unwrap();
    last.ma5 = Some(99.0);
    last.ma20 = Some(98.0);
    last.ma60 = Some(97.0);
    last.ma120 = None;

    let result = weighted::score(&annotated, ChartPeriod::ThreeMonths).unwrap();
    // Raw score 3.979 displays as 4.0 but stays in the Sell band
    assert_eq!(result.score, 4.0);
    assert_eq!(result.band, TrendBand::Sell);
}

#[test]
fn test_analyze_trims_to_period_and_aligns_indicators() {
    let closes: Vec<f64> = (0..200).map(|i| 100.0 + i as f64 * 0.5).collect();
    let series = series_from_closes(&closes);
    let service = AnalysisService::new(1000);

    let options = AnalysisOptions {
        period: ChartPeriod::OneMonth,
        ..Default::default()
    };
    let report = service.analyze(&series, &options).unwrap();

    assert_eq!(report.symbol, "TEST");
    assert_eq!(report.last_price, Some(closes[199]));
    // Latest bar is 2024-07-18; one month back is 2024-06-18
    assert_eq!(report.series.len(), 31);
    assert!(report.series.bars[0].ma120.is_some());
    for indicator in &report.indicators {
        assert_eq!(indicator.series.len(), report.series.len(), "{}", indicator.id);
    }

    let score = report.score.unwrap();
    assert!(!score.insufficient_data);
    assert_eq!(score.breakdown.alignment, 5);
    assert!(report.weighted.is_some());
    assert!(report.changes.week.unwrap().change > 0.0);
}

#[test]
fn test_analyze_respects_scoring_mode() {
    let closes: Vec<f64> = (0..40).map(|i| 20.0 + i as f64).collect();
    let series = series_from_closes(&closes);
    let service = AnalysisService::new(1000);

    let fixed = service
        .analyze(&series, &AnalysisOptions { mode: ScoringMode::Fixed, ..Default::default() })
        .unwrap();
    assert!(fixed.score.is_some());
    assert!(fixed.weighted.is_none());

    let weighted = service
        .analyze(&series, &AnalysisOptions { mode: ScoringMode::Weighted, ..Default::default() })
        .unwrap();
    assert!(weighted.score.is_none());
    assert!(weighted.weighted.is_some());
}

#[test]
fn test_analyze_rejects_oversized_series() {
    let closes: Vec<f64> = (0..11).map(|i| 20.0 + i as f64).collect();
    let service = AnalysisService::new(10);
    let err = service
        .analyze(&series_from_closes(&closes), &AnalysisOptions::default())
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
    assert!(service.moving_averages(&series_from_closes(&closes), MaPolicy::Strict).is_err());
}
