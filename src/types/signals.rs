use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{AnnotatedSeries, ChartPeriod, MaPolicy};

/// Which scoring strategies a request runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ScoringMode {
    /// Fixed-table composite in [-5, 15].
    Fixed,
    /// Period-weighted 0-10 display score.
    Weighted,
    #[default]
    Both,
}

impl ScoringMode {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "fixed" | "table" => Some(Self::Fixed),
            "weighted" | "period" => Some(Self::Weighted),
            "both" | "all" => Some(Self::Both),
            _ => None,
        }
    }

    pub fn includes_fixed(&self) -> bool {
        matches!(self, Self::Fixed | Self::Both)
    }

    pub fn includes_weighted(&self) -> bool {
        matches!(self, Self::Weighted | Self::Both)
    }
}

/// Recommendation derived from the fixed-table composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    StrongBuy,
    Buy,
    Hold,
    Avoid,
    Sell,
}

impl Recommendation {
    /// Create a recommendation from a composite score (-5 to 15).
    pub fn from_score(score: i8) -> Self {
        match score {
            s if s >= 13 => Recommendation::StrongBuy,
            s if s >= 9 => Recommendation::Buy,
            s if s >= 5 => Recommendation::Hold,
            s if s >= 0 => Recommendation::Avoid,
            _ => Recommendation::Sell,
        }
    }

    /// Get display label for this recommendation.
    pub fn label(&self) -> &'static str {
        match self {
            Recommendation::StrongBuy => "Strong Buy",
            Recommendation::Buy => "Buy",
            Recommendation::Hold => "Hold/Neutral",
            Recommendation::Avoid => "Avoid",
            Recommendation::Sell => "Sell",
        }
    }
}

/// Contribution of each fixed-table sub-score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub alignment: i8,
    pub cross: i8,
    pub volume: i8,
}

impl ScoreBreakdown {
    pub fn sum(&self) -> i8 {
        self.alignment + self.cross + self.volume
    }
}

/// Result of the fixed-table scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalScore {
    /// Composite score clamped to [-5, 15].
    pub total: i8,
    pub recommendation: Recommendation,
    pub breakdown: ScoreBreakdown,
    /// One line per sub-score, or a single insufficient-data line.
    pub rationale: Vec<String>,
    pub insufficient_data: bool,
}

/// Five-band recommendation of the period-weighted scorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendBand {
    StrongBuy,
    Buy,
    Neutral,
    Sell,
    StrongSell,
}

impl TrendBand {
    /// Create a band from a display score (0 to 10).
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 8.0 => TrendBand::StrongBuy,
            s if s >= 6.0 => TrendBand::Buy,
            s if s >= 4.0 => TrendBand::Neutral,
            s if s >= 2.0 => TrendBand::Sell,
            _ => TrendBand::StrongSell,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TrendBand::StrongBuy => "Strong buy",
            TrendBand::Buy => "Buy",
            TrendBand::Neutral => "Neutral",
            TrendBand::Sell => "Sell",
            TrendBand::StrongSell => "Strong sell",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            TrendBand::StrongBuy => {
                "Strong bullish trend and positive technical indicators confirmed"
            }
            TrendBand::Buy => "Bullish trend confirmed, positive technical indicators",
            TrendBand::Neutral => "No clear trend visible, monitoring needed",
            TrendBand::Sell => "Bearish trend confirmed, negative technical indicators",
            TrendBand::StrongSell => {
                "Strong bearish trend and negative technical indicators confirmed"
            }
        }
    }
}

/// Sub-score weights of the period-weighted scorer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodWeights {
    pub ma: f64,
    pub momentum: f64,
    pub trend: f64,
}

/// Human-readable reasoning behind a weighted score.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WeightedAnalysis {
    pub ma: Vec<String>,
    pub momentum: String,
    pub trend: String,
}

/// Result of the period-weighted scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightedScore {
    pub period: ChartPeriod,
    pub weights: PeriodWeights,
    /// Display score in [0, 10], one decimal.
    pub score: f64,
    pub band: TrendBand,
    pub description: String,
    /// Count of satisfied moving-average conditions (0-7).
    pub ma_score: u8,
    /// +1 bullish, -1 bearish, 0 when there is not enough history.
    pub momentum_score: i8,
    /// Fraction of up-days in the trend window.
    pub trend_strength: f64,
    pub analysis: WeightedAnalysis,
}

/// Indicator family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorCategory {
    Trend,
    Momentum,
}

/// Output of one indicator over a series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorOutput {
    pub id: String,
    pub name: String,
    pub category: IndicatorCategory,
    /// Latest defined value.
    pub value: f64,
    /// Per-bar values aligned with the bars they were reported with.
    pub series: Vec<Option<f64>>,
}

/// Price move between the latest close and a past close.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceChange {
    pub change: f64,
    pub percent_change: f64,
}

/// Week, month and year price changes.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PriceChanges {
    pub week: Option<PriceChange>,
    pub month: Option<PriceChange>,
    pub year: Option<PriceChange>,
}

/// Everything computed for one analysis request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub symbol: String,
    pub period: ChartPeriod,
    pub policy: MaPolicy,
    pub mode: ScoringMode,
    /// Latest close.
    pub last_price: Option<f64>,
    /// Annotated bars inside the period's display window.
    pub series: AnnotatedSeries,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<SignalScore>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weighted: Option<WeightedScore>,
    pub indicators: Vec<IndicatorOutput>,
    pub changes: PriceChanges,
    /// Unix timestamp (milliseconds) when calculated.
    pub timestamp: i64,
}

/// Per-period configuration exposed to period selectors.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodInfo {
    pub period: ChartPeriod,
    pub weights: PeriodWeights,
    pub momentum_window: (usize, usize),
    pub trend_window: usize,
    pub vendor_range: &'static str,
    pub vendor_interval: &'static str,
    /// First date to fetch so MA120 is warm when the display window starts.
    pub history_start: Option<NaiveDate>,
}

impl PeriodInfo {
    /// Describe `period` for a fetch made on `today`.
    pub fn new(period: ChartPeriod, today: NaiveDate) -> Self {
        let (vendor_range, vendor_interval) = period.vendor_range();
        Self {
            period,
            weights: period.weights(),
            momentum_window: period.momentum_window(),
            trend_window: period.trend_window(),
            vendor_range,
            vendor_interval,
            history_start: period.history_start(today),
        }
    }
}
