//! Analysis service: annotates a series and runs the requested scorers.

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::{AppError, Result};
use crate::services::moving_average::annotate;
use crate::services::price_change::price_changes;
use crate::services::signals::indicators::all_indicators;
use crate::services::signals::{scorer, weighted, Indicator};
use crate::types::{AnalysisReport, AnnotatedSeries, ChartPeriod, MaPolicy, ScoringMode, Series};

/// Request-scoped analysis parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AnalysisOptions {
    pub period: ChartPeriod,
    pub policy: MaPolicy,
    pub mode: ScoringMode,
}

/// Stateless analysis over caller-supplied series.
pub struct AnalysisService {
    indicators: Vec<Box<dyn Indicator>>,
    /// Largest series accepted.
    max_bars: usize,
}

impl AnalysisService {
    /// Create a new analysis service.
    pub fn new(max_bars: usize) -> Arc<Self> {
        Arc::new(Self {
            indicators: all_indicators(),
            max_bars,
        })
    }

    pub fn max_bars(&self) -> usize {
        self.max_bars
    }

    fn check_size(&self, series: &Series) -> Result<()> {
        if series.len() > self.max_bars {
            return Err(AppError::BadRequest(format!(
                "Series has {} bars, at most {} accepted",
                series.len(),
                self.max_bars
            )));
        }
        Ok(())
    }

    /// Annotate a series with moving averages.
    pub fn moving_averages(&self, series: &Series, policy: MaPolicy) -> Result<AnnotatedSeries> {
        self.check_size(series)?;
        Ok(annotate(series, policy))
    }

    /// Run a full analysis.
    ///
    /// Averages and scores use the whole series so long windows warm up on
    /// history; only the returned bars are trimmed to the display period.
    pub fn analyze(&self, series: &Series, options: &AnalysisOptions) -> Result<AnalysisReport> {
        self.check_size(series)?;

        debug!(
            "Analyzing {} ({} bars, period {}, {:?}, {:?})",
            series.symbol(),
            series.len(),
            options.period.as_str(),
            options.policy,
            options.mode
        );

        let mut annotated = annotate(series, options.policy);

        let score = options
            .mode
            .includes_fixed()
            .then(|| scorer::score(&annotated));
        let weighted = if options.mode.includes_weighted() {
            weighted::score(&annotated, options.period)
        } else {
            None
        };

        let mut indicators: Vec<_> = self
            .indicators
            .iter()
            .filter(|indicator| series.len() >= indicator.min_periods())
            .filter_map(|indicator| indicator.calculate(series.bars()))
            .collect();

        let changes = price_changes(series.bars());

        annotated.trim_to_period(options.period);

        // Keep indicator series aligned with the bars that are returned
        let shown = annotated.len();
        for output in &mut indicators {
            let hidden = output.series.len().saturating_sub(shown);
            output.series.drain(..hidden);
        }

        if let Some(ref s) = score {
            info!(
                "{}: score {} ({})",
                series.symbol(),
                s.total,
                s.recommendation.label()
            );
        }

        Ok(AnalysisReport {
            symbol: series.symbol().to_string(),
            period: options.period,
            policy: options.policy,
            mode: options.mode,
            last_price: series.last().map(|b| b.close),
            series: annotated,
            score,
            weighted,
            indicators,
            changes,
            timestamp: chrono::Utc::now().timestamp_millis(),
        })
    }
}
