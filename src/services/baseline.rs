// src/services/baseline.rs
use crate::error::{EvalError, Result};

/// Naive forecaster: the sum of the `window` previous values divided by `window`.
///
/// The divisor stays `window` even when fewer previous values exist, so the
/// first forecasts are biased low and index 0 is always zero. Relative scores
/// are calibrated against exactly this behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrailingMeanBaseline {
    window: usize,
}

impl TrailingMeanBaseline {
    pub const ONE_WEEK: TrailingMeanBaseline = TrailingMeanBaseline { window: 1 };
    pub const FOUR_WEEKS: TrailingMeanBaseline = TrailingMeanBaseline { window: 4 };

    pub fn new(window: usize) -> Result<Self> {
        if window == 0 {
            return Err(EvalError::InvalidWindow(
                "baseline window must be positive".to_string(),
            ));
        }
        Ok(TrailingMeanBaseline { window })
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// One forecast per input value, each using only earlier values.
    pub fn forecast(&self, series: &[f64]) -> Vec<f64> {
        (0..series.len())
            .map(|i| {
                let start = i.saturating_sub(self.window);
                series[start..i].iter().fold(0.0, |acc, v| acc + v) / self.window as f64
            })
            .collect()
    }
}
