// src/services/report.rs
use log::info;

use crate::error::{EvalError, Result};
use crate::models::{EvaluationReport, RecentMetrics, WeeklyTruthSeries, WindowMetrics, WindowSelector};
use crate::services::metrics::evaluate;

/// Scores a submission covering the whole series.
///
/// Produces the full-history score, the score over the most recent
/// `recent_weeks`, and, unless `selector` is `All`, the score over the selected
/// window. Scalars in the report are rounded for display.
pub fn evaluate_submission(
    predictions: &[i64],
    series: &WeeklyTruthSeries,
    recent_weeks: usize,
    selector: WindowSelector,
) -> Result<EvaluationReport> {
    if series.is_empty() {
        return Err(EvalError::EmptyWindow);
    }

    let full = evaluate(predictions, &series.weeks)?;

    let recent = WindowSelector::from_options(None, Some(recent_weeks))?;
    let recent_metrics = evaluate(recent.apply(predictions), series.window(recent))?;

    let window = match selector {
        WindowSelector::All => None,
        selected => Some(WindowMetrics {
            selector: selected,
            metrics: evaluate(selected.apply(predictions), series.window(selected))?.rounded(),
        }),
    };

    info!(
        "Evaluated {} predictions: rmse={:.3}, recent {} weeks rmse={:.3}",
        predictions.len(),
        full.rmse,
        recent_weeks,
        recent_metrics.rmse
    );

    Ok(EvaluationReport {
        full: full.rounded(),
        recent: RecentMetrics {
            weeks: recent_metrics.true_cases.len(),
            metrics: recent_metrics.rounded(),
        },
        window,
    })
}
