use approx::assert_abs_diff_eq;
use forecast_eval::error::EvalError;
use forecast_eval::models::{RelativeScore, WeekEntry, WeeklyTruthSeries, WindowSelector};
use forecast_eval::services::baseline::TrailingMeanBaseline;
use forecast_eval::services::metrics::{evaluate, evaluate_window, relative_rmse, root_mean_squared_error};
use forecast_eval::services::report::evaluate_submission;
use rstest::rstest;

fn series(cases: &[i64]) -> WeeklyTruthSeries {
    WeeklyTruthSeries::new(
        cases
            .iter()
            .enumerate()
            .map(|(i, &new_cases)| WeekEntry {
                epi_week: i as u32 + 1,
                new_cases,
                new_deaths: 0,
            })
            .collect(),
    )
}

#[rstest]
#[case(vec![], 1)]
#[case(vec![3.0], 4)]
#[case(vec![10.0, 20.0, 10.0, 40.0, 10.0], 1)]
#[case(vec![10.0, 20.0, 10.0, 40.0, 10.0], 4)]
#[case(vec![1.0, 2.0], 7)]
fn baseline_keeps_length_and_starts_at_zero(#[case] values: Vec<f64>, #[case] window: usize) {
    let forecast = TrailingMeanBaseline::new(window).unwrap().forecast(&values);
    assert_eq!(forecast.len(), values.len());
    if let Some(first) = forecast.first() {
        assert_eq!(*first, 0.0);
    }
}

#[test]
fn one_week_baseline_is_a_lag() {
    let values = vec![3.0, 8.0, 1.0, 12.0];
    let forecast = TrailingMeanBaseline::ONE_WEEK.forecast(&values);
    for i in 1..values.len() {
        assert_eq!(forecast[i], values[i - 1]);
    }
}

#[test]
fn baselines_divide_by_nominal_window() {
    let values = vec![10.0, 20.0, 10.0, 40.0, 10.0];
    assert_eq!(
        TrailingMeanBaseline::ONE_WEEK.forecast(&values),
        vec![0.0, 10.0, 20.0, 10.0, 40.0]
    );
    assert_eq!(
        TrailingMeanBaseline::FOUR_WEEKS.forecast(&values),
        vec![0.0, 2.5, 7.5, 10.0, 20.0]
    );
}

#[test]
fn zero_baseline_window_is_rejected() {
    assert!(matches!(TrailingMeanBaseline::new(0), Err(EvalError::InvalidWindow(_))));
}

#[test]
fn rmse_is_symmetric_and_zero_on_identity() {
    let a = vec![1.0, 5.0, 9.0];
    let b = vec![2.0, 3.0, 13.0];
    assert_abs_diff_eq!(
        root_mean_squared_error(&a, &b).unwrap(),
        root_mean_squared_error(&b, &a).unwrap()
    );
    assert_abs_diff_eq!(root_mean_squared_error(&a, &b).unwrap(), 7.0_f64.sqrt(), epsilon = 1e-12);
    assert_eq!(root_mean_squared_error(&a, &a).unwrap(), 0.0);
}

#[test]
fn rmse_rejects_mismatched_lengths() {
    match root_mean_squared_error(&[1.0, 2.0], &[1.0]) {
        Err(EvalError::Alignment { expected, actual }) => {
            assert_eq!(expected, 1);
            assert_eq!(actual, 2);
        }
        other => panic!("expected alignment error, got {:?}", other),
    }
}

#[test]
fn perfect_forecast_scores_zero() {
    let truth = series(&[10, 20, 10, 40, 10]);
    let result = evaluate(&[10, 20, 10, 40, 10], &truth.weeks).unwrap();

    assert_eq!(result.true_cases, vec![10, 20, 10, 40, 10]);
    assert_eq!(result.baseline_1week, vec![0.0, 10.0, 20.0, 10.0, 40.0]);
    assert_eq!(result.baseline_4week, vec![0.0, 2.5, 7.5, 10.0, 20.0]);
    assert_eq!(result.rmse, 0.0);
    assert_abs_diff_eq!(result.rmse_1week, 420.0_f64.sqrt(), epsilon = 1e-12);
    assert_abs_diff_eq!(result.rmse_4week, 282.5_f64.sqrt(), epsilon = 1e-12);
    assert_eq!(result.relative_rmse_1week, RelativeScore::Defined(0.0));
    assert_eq!(result.relative_rmse_4week, RelativeScore::Defined(0.0));
}

#[test]
fn relative_scores_compare_against_baselines() {
    let truth = series(&[10, 20, 10, 40, 10]);
    let result = evaluate(&[12, 18, 13, 35, 14], &truth.weeks).unwrap();

    let rmse = (58.0_f64 / 5.0).sqrt();
    assert_abs_diff_eq!(result.rmse, rmse, epsilon = 1e-12);
    match result.relative_rmse_1week {
        RelativeScore::Defined(v) => assert_abs_diff_eq!(v, rmse / 420.0_f64.sqrt(), epsilon = 1e-12),
        RelativeScore::Undefined => panic!("baseline RMSE is not zero"),
    }
}

#[test]
fn zero_baseline_error_makes_relative_score_undefined() {
    let truth = series(&[0]);
    let result = evaluate(&[5], &truth.weeks).unwrap();

    assert_eq!(result.rmse, 5.0);
    assert_eq!(result.rmse_1week, 0.0);
    assert_eq!(result.relative_rmse_1week, RelativeScore::Undefined);
    assert_eq!(result.relative_rmse_4week, RelativeScore::Undefined);
    assert!(matches!(
        result.relative_rmse_1week.value("1-week"),
        Err(EvalError::DivisionByZero(_))
    ));
    assert_eq!(serde_json::to_value(result.relative_rmse_1week).unwrap(), serde_json::Value::Null);
}

#[test]
fn relative_rmse_guards_zero_denominator() {
    assert_eq!(relative_rmse(0.0, 0.0), RelativeScore::Undefined);
    assert_eq!(relative_rmse(3.0, 2.0), RelativeScore::Defined(1.5));
}

#[rstest]
#[case(vec![1, 2, 3, 4])]
#[case(vec![1, 2, 3, 4, 5, 6])]
#[case(vec![])]
fn misaligned_predictions_are_rejected(#[case] predictions: Vec<i64>) {
    let truth = series(&[10, 20, 10, 40, 10]);
    match evaluate(&predictions, &truth.weeks) {
        Err(EvalError::Alignment { expected, actual }) => {
            assert_eq!(expected, 5);
            assert_eq!(actual, predictions.len());
        }
        other => panic!("expected alignment error, got {:?}", other),
    }
}

#[test]
fn empty_window_cannot_be_scored() {
    assert!(matches!(evaluate(&[], &[]), Err(EvalError::EmptyWindow)));
}

#[rstest]
#[case(WindowSelector::All, vec![10, 20, 10, 40, 10])]
#[case(WindowSelector::FirstWeeks(2), vec![10, 20])]
#[case(WindowSelector::LastWeeks(2), vec![40, 10])]
#[case(WindowSelector::LastWeeks(9), vec![10, 20, 10, 40, 10])]
#[case(WindowSelector::FirstWeeks(9), vec![10, 20, 10, 40, 10])]
fn selectors_pick_a_window(#[case] selector: WindowSelector, #[case] expected: Vec<i64>) {
    let truth = series(&[10, 20, 10, 40, 10]);
    let window: Vec<i64> = truth.window(selector).iter().map(|w| w.new_cases).collect();
    assert_eq!(window, expected);
}

#[test]
fn suffix_window_restarts_baselines() {
    let truth = series(&[10, 20, 10, 40, 10]);
    let result = evaluate_window(&[10, 40, 10], &truth, WindowSelector::LastWeeks(3)).unwrap();
    assert_eq!(result.baseline_1week, vec![0.0, 10.0, 40.0]);
    assert_eq!(result.baseline_4week, vec![0.0, 2.5, 12.5]);
}

#[rstest]
#[case(Some(3), Some(2))]
#[case(Some(0), None)]
#[case(None, Some(0))]
fn invalid_selectors_are_rejected(#[case] first: Option<usize>, #[case] last: Option<usize>) {
    let result = WindowSelector::from_options(first, last);
    match result {
        Err(e @ EvalError::InvalidWindow(_)) => assert!(e.is_client_error()),
        other => panic!("expected invalid window, got {:?}", other),
    }
}

#[test]
fn submission_report_rounds_and_covers_recent_weeks() {
    let truth = series(&[10, 20, 10, 40, 10]);
    let report = evaluate_submission(&[10, 20, 10, 40, 10], &truth, 3, WindowSelector::FirstWeeks(2)).unwrap();

    assert_eq!(report.full.rmse_1week, 20.494);
    assert_eq!(report.full.rmse_4week, 16.808);
    assert_eq!(report.recent.weeks, 3);
    assert_eq!(report.recent.metrics.true_cases, vec![10, 40, 10]);
    assert_eq!(report.recent.metrics.rmse_1week, 25.166);

    let window = report.window.unwrap();
    assert_eq!(window.selector, WindowSelector::FirstWeeks(2));
    assert_eq!(window.metrics.predicted_cases, vec![10, 20]);
}

#[test]
fn submission_must_cover_the_whole_series() {
    let truth = series(&[10, 20, 10, 40, 10]);
    let result = evaluate_submission(&[10, 40, 10], &truth, 3, WindowSelector::All);
    assert!(matches!(result, Err(EvalError::Alignment { expected: 5, actual: 3 })));
}
