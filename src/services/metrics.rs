// src/services/metrics.rs
use log::{debug, warn};

use crate::error::{EvalError, Result};
use crate::models::{MetricsResult, RelativeScore, WeekEntry, WeeklyTruthSeries, WindowSelector};
use crate::services::baseline::TrailingMeanBaseline;

pub fn root_mean_squared_error(predicted: &[f64], actual: &[f64]) -> Result<f64> {
    if predicted.len() != actual.len() {
        return Err(EvalError::Alignment {
            expected: actual.len(),
            actual: predicted.len(),
        });
    }
    if actual.is_empty() {
        return Err(EvalError::EmptyWindow);
    }

    let squared_sum: f64 = predicted
        .iter()
        .zip(actual)
        .map(|(p, a)| (p - a).powi(2))
        .sum();
    Ok((squared_sum / actual.len() as f64).sqrt())
}

/// `rmse / baseline_rmse`, undefined when the baseline is error-free.
pub fn relative_rmse(rmse: f64, baseline_rmse: f64) -> RelativeScore {
    if baseline_rmse == 0.0 {
        RelativeScore::Undefined
    } else {
        RelativeScore::Defined(rmse / baseline_rmse)
    }
}

/// Scores `predictions` against `truth` and both naive baselines.
pub fn evaluate(predictions: &[i64], truth: &[WeekEntry]) -> Result<MetricsResult> {
    if predictions.len() != truth.len() {
        return Err(EvalError::Alignment {
            expected: truth.len(),
            actual: predictions.len(),
        });
    }

    let true_cases: Vec<i64> = truth.iter().map(|w| w.new_cases).collect();
    let actual: Vec<f64> = true_cases.iter().map(|&v| v as f64).collect();
    let predicted: Vec<f64> = predictions.iter().map(|&v| v as f64).collect();

    let baseline_1week = TrailingMeanBaseline::ONE_WEEK.forecast(&actual);
    let baseline_4week = TrailingMeanBaseline::FOUR_WEEKS.forecast(&actual);

    let rmse = root_mean_squared_error(&predicted, &actual)?;
    let rmse_1week = root_mean_squared_error(&baseline_1week, &actual)?;
    let rmse_4week = root_mean_squared_error(&baseline_4week, &actual)?;

    let relative_rmse_1week = relative_rmse(rmse, rmse_1week);
    let relative_rmse_4week = relative_rmse(rmse, rmse_4week);
    if !relative_rmse_1week.is_defined() || !relative_rmse_4week.is_defined() {
        warn!("Baseline RMSE is zero over {} weeks, relative score undefined", truth.len());
    }
    debug!(
        "Scored {} weeks: rmse={} rmse_1week={} rmse_4week={}",
        truth.len(),
        rmse,
        rmse_1week,
        rmse_4week
    );

    Ok(MetricsResult {
        true_cases,
        predicted_cases: predictions.to_vec(),
        baseline_1week,
        baseline_4week,
        rmse,
        rmse_1week,
        rmse_4week,
        relative_rmse_1week,
        relative_rmse_4week,
    })
}

/// Scores predictions that are already aligned with `selector`'s part of the series.
pub fn evaluate_window(
    predictions: &[i64],
    series: &WeeklyTruthSeries,
    selector: WindowSelector,
) -> Result<MetricsResult> {
    evaluate(predictions, series.window(selector))
}
