use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize, Serializer};

use super::{Bar, PeriodWeights};

/// Round to currency precision.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn serialize_price<S: Serializer>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(v) => serializer.serialize_some(&round2(*v)),
        None => serializer.serialize_none(),
    }
}

/// Requested chart period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ChartPeriod {
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "1w")]
    OneWeek,
    #[default]
    #[serde(rename = "1m")]
    OneMonth,
    #[serde(rename = "3m")]
    ThreeMonths,
    #[serde(rename = "6m")]
    SixMonths,
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "5y")]
    FiveYears,
    #[serde(rename = "all")]
    All,
}

impl ChartPeriod {
    pub const ALL: [ChartPeriod; 8] = [
        ChartPeriod::OneDay,
        ChartPeriod::OneWeek,
        ChartPeriod::OneMonth,
        ChartPeriod::ThreeMonths,
        ChartPeriod::SixMonths,
        ChartPeriod::OneYear,
        ChartPeriod::FiveYears,
        ChartPeriod::All,
    ];

    /// Get the period from a string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "1d" => Some(ChartPeriod::OneDay),
            "1w" => Some(ChartPeriod::OneWeek),
            "1m" => Some(ChartPeriod::OneMonth),
            "3m" => Some(ChartPeriod::ThreeMonths),
            "6m" => Some(ChartPeriod::SixMonths),
            "1y" => Some(ChartPeriod::OneYear),
            "5y" => Some(ChartPeriod::FiveYears),
            "all" => Some(ChartPeriod::All),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartPeriod::OneDay => "1d",
            ChartPeriod::OneWeek => "1w",
            ChartPeriod::OneMonth => "1m",
            ChartPeriod::ThreeMonths => "3m",
            ChartPeriod::SixMonths => "6m",
            ChartPeriod::OneYear => "1y",
            ChartPeriod::FiveYears => "5y",
            ChartPeriod::All => "all",
        }
    }

    /// First date shown for this period, counted back from the latest bar.
    /// `None` means the whole series is shown.
    pub fn display_start(&self, latest: NaiveDate) -> Option<NaiveDate> {
        match self {
            ChartPeriod::OneDay => latest.checked_sub_days(chrono::Days::new(1)),
            ChartPeriod::OneWeek => latest.checked_sub_days(chrono::Days::new(7)),
            ChartPeriod::OneMonth => latest.checked_sub_months(Months::new(1)),
            ChartPeriod::ThreeMonths => latest.checked_sub_months(Months::new(3)),
            ChartPeriod::SixMonths => latest.checked_sub_months(Months::new(6)),
            ChartPeriod::OneYear => latest.checked_sub_months(Months::new(12)),
            ChartPeriod::FiveYears => latest.checked_sub_months(Months::new(60)),
            ChartPeriod::All => None,
        }
    }

    /// First date a fetcher should request so MA120 is warm at `display_start`.
    pub fn history_start(&self, today: NaiveDate) -> Option<NaiveDate> {
        match self {
            ChartPeriod::OneDay => today.checked_sub_days(chrono::Days::new(1 + 180)),
            ChartPeriod::OneWeek => today.checked_sub_days(chrono::Days::new(7 + 180)),
            ChartPeriod::OneMonth => today.checked_sub_months(Months::new(1 + 6)),
            ChartPeriod::ThreeMonths => today.checked_sub_months(Months::new(3 + 6)),
            ChartPeriod::SixMonths => today.checked_sub_months(Months::new(6 + 6)),
            ChartPeriod::OneYear => today.checked_sub_months(Months::new(24)),
            ChartPeriod::FiveYears => today.checked_sub_months(Months::new(84)),
            ChartPeriod::All => NaiveDate::from_ymd_opt(1990, 1, 1),
        }
    }

    /// Vendor chart range and bar interval for this period.
    pub fn vendor_range(&self) -> (&'static str, &'static str) {
        match self {
            ChartPeriod::OneDay => ("1d", "1d"),
            ChartPeriod::OneWeek => ("5d", "1d"),
            ChartPeriod::OneMonth => ("1mo", "1d"),
            ChartPeriod::ThreeMonths => ("3mo", "1d"),
            ChartPeriod::SixMonths => ("6mo", "1d"),
            ChartPeriod::OneYear => ("1y", "1d"),
            ChartPeriod::FiveYears => ("5y", "1wk"),
            ChartPeriod::All => ("max", "1wk"),
        }
    }

    /// Sub-score weights used by the period-weighted scorer.
    pub fn weights(&self) -> PeriodWeights {
        let (ma, momentum, trend) = match self {
            // Short horizons lean on momentum
            ChartPeriod::OneDay => (0.3, 0.5, 0.2),
            ChartPeriod::OneWeek => (0.4, 0.4, 0.2),
            ChartPeriod::OneMonth => (0.5, 0.3, 0.2),
            ChartPeriod::ThreeMonths | ChartPeriod::SixMonths => (0.4, 0.2, 0.4),
            // Long horizons lean on trend
            ChartPeriod::OneYear | ChartPeriod::All => (0.3, 0.2, 0.5),
            ChartPeriod::FiveYears => (0.4, 0.3, 0.3),
        };
        PeriodWeights { ma, momentum, trend }
    }

    /// Number of (recent, previous) bars compared for momentum.
    pub fn momentum_window(&self) -> (usize, usize) {
        match self {
            ChartPeriod::OneDay | ChartPeriod::OneWeek => (3, 3),
            ChartPeriod::OneMonth => (5, 5),
            ChartPeriod::ThreeMonths | ChartPeriod::SixMonths => (10, 10),
            ChartPeriod::OneYear | ChartPeriod::All => (20, 20),
            ChartPeriod::FiveYears => (5, 5),
        }
    }

    /// Number of trailing bars used for trend strength.
    pub fn trend_window(&self) -> usize {
        match self {
            ChartPeriod::OneDay | ChartPeriod::OneWeek => 5,
            ChartPeriod::OneMonth => 10,
            ChartPeriod::ThreeMonths | ChartPeriod::SixMonths => 20,
            ChartPeriod::OneYear | ChartPeriod::All => 30,
            ChartPeriod::FiveYears => 10,
        }
    }
}

/// How a moving average is filled before a full window of history exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MaPolicy {
    /// Absent until `window` bars exist.
    #[default]
    Strict,
    /// Mean of all available bars until `window` bars exist.
    Expanding,
}

impl MaPolicy {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "strict" => Some(Self::Strict),
            "expanding" => Some(Self::Expanding),
            _ => None,
        }
    }
}

/// A bar with its moving averages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotatedBar {
    #[serde(flatten)]
    pub bar: Bar,
    #[serde(serialize_with = "serialize_price")]
    pub ma5: Option<f64>,
    #[serde(serialize_with = "serialize_price")]
    pub ma10: Option<f64>,
    #[serde(serialize_with = "serialize_price")]
    pub ma20: Option<f64>,
    #[serde(serialize_with = "serialize_price")]
    pub ma60: Option<f64>,
    #[serde(serialize_with = "serialize_price")]
    pub ma120: Option<f64>,
}

/// Bars of one symbol annotated with moving averages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotatedSeries {
    pub symbol: String,
    pub policy: MaPolicy,
    pub bars: Vec<AnnotatedBar>,
}

impl AnnotatedSeries {
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn last(&self) -> Option<&AnnotatedBar> {
        self.bars.last()
    }

    /// Drop bars that fall before the period's display window.
    ///
    /// Averages were computed over the full history, so the kept bars retain them.
    pub fn trim_to_period(&mut self, period: ChartPeriod) {
        let Some(latest) = self.bars.last().map(|b| b.bar.date) else {
            return;
        };
        if let Some(start) = period.display_start(latest) {
            self.bars.retain(|b| b.bar.date >= start);
        }
    }
}
