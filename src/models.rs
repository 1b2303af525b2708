// src/models.rs
use chrono::NaiveDate;
use serde::Serialize;

use crate::error::{EvalError, Result};

/// One row of a raw daily feed (incident cases or incident deaths).
#[derive(Debug, Clone, PartialEq)]
pub struct FeedRow {
    pub location_name: String,
    pub date: NaiveDate,
    pub value: i64,
}

/// Cases and deaths for one location on one day, after joining both feeds.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyRecord {
    pub location_name: String,
    pub date: NaiveDate,
    pub new_cases: i64,
    pub new_deaths: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeekEntry {
    /// ISO week of the Saturday closing the week. Informational only.
    pub epi_week: u32,
    pub new_cases: i64,
    pub new_deaths: i64,
}

/// Weekly ground truth ordered by week-ending date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WeeklyTruthSeries {
    pub weeks: Vec<WeekEntry>,
}

impl WeeklyTruthSeries {
    pub fn new(weeks: Vec<WeekEntry>) -> Self {
        WeeklyTruthSeries { weeks }
    }

    pub fn len(&self) -> usize {
        self.weeks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weeks.is_empty()
    }

    pub fn new_cases(&self) -> Vec<i64> {
        self.weeks.iter().map(|w| w.new_cases).collect()
    }

    pub fn window(&self, selector: WindowSelector) -> &[WeekEntry] {
        selector.apply(&self.weeks)
    }
}

/// Which part of the weekly series an evaluation covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", content = "weeks", rename_all = "snake_case")]
pub enum WindowSelector {
    All,
    FirstWeeks(usize),
    LastWeeks(usize),
}

impl WindowSelector {
    /// Builds a selector from the two optional request knobs.
    pub fn from_options(first_n_weeks: Option<usize>, last_n_weeks: Option<usize>) -> Result<Self> {
        match (first_n_weeks, last_n_weeks) {
            (Some(_), Some(_)) => Err(EvalError::InvalidWindow(
                "first_n_weeks and last_n_weeks cannot be combined".to_string(),
            )),
            (Some(0), None) | (None, Some(0)) => Err(EvalError::InvalidWindow(
                "window size must be a positive number of weeks".to_string(),
            )),
            (Some(n), None) => Ok(WindowSelector::FirstWeeks(n)),
            (None, Some(n)) => Ok(WindowSelector::LastWeeks(n)),
            (None, None) => Ok(WindowSelector::All),
        }
    }

    /// Sizes larger than the input select all of it.
    pub fn apply<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        match *self {
            WindowSelector::All => items,
            WindowSelector::FirstWeeks(n) => &items[..n.min(items.len())],
            WindowSelector::LastWeeks(n) => &items[items.len().saturating_sub(n)..],
        }
    }
}

/// Ratio of a forecast's RMSE to a baseline's RMSE.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RelativeScore {
    Defined(f64),
    /// The baseline RMSE was exactly zero.
    Undefined,
}

impl RelativeScore {
    pub fn value(&self, baseline: &str) -> Result<f64> {
        match *self {
            RelativeScore::Defined(v) => Ok(v),
            RelativeScore::Undefined => Err(EvalError::DivisionByZero(baseline.to_string())),
        }
    }

    pub fn is_defined(&self) -> bool {
        matches!(self, RelativeScore::Defined(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsResult {
    pub true_cases: Vec<i64>,
    pub predicted_cases: Vec<i64>,
    pub baseline_1week: Vec<f64>,
    pub baseline_4week: Vec<f64>,
    pub rmse: f64,
    pub rmse_1week: f64,
    pub rmse_4week: f64,
    pub relative_rmse_1week: RelativeScore,
    pub relative_rmse_4week: RelativeScore,
}

impl MetricsResult {
    /// Copy with scalar metrics rounded to 3 decimals for display.
    pub fn rounded(&self) -> Self {
        let round_score = |score: RelativeScore| match score {
            RelativeScore::Defined(v) => RelativeScore::Defined(round3(v)),
            RelativeScore::Undefined => RelativeScore::Undefined,
        };

        MetricsResult {
            rmse: round3(self.rmse),
            rmse_1week: round3(self.rmse_1week),
            rmse_4week: round3(self.rmse_4week),
            relative_rmse_1week: round_score(self.relative_rmse_1week),
            relative_rmse_4week: round_score(self.relative_rmse_4week),
            ..self.clone()
        }
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[derive(Debug, Clone, Serialize)]
pub struct RecentMetrics {
    pub weeks: usize,
    #[serde(flatten)]
    pub metrics: MetricsResult,
}

#[derive(Debug, Clone, Serialize)]
pub struct WindowMetrics {
    pub selector: WindowSelector,
    #[serde(flatten)]
    pub metrics: MetricsResult,
}

/// Everything returned for one uploaded forecast.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationReport {
    pub full: MetricsResult,
    pub recent: RecentMetrics,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window: Option<WindowMetrics>,
}
