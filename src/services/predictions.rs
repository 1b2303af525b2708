// src/services/predictions.rs
use crate::error::{EvalError, Result};

/// Parses an uploaded forecast: one integer per line, in week order.
pub fn parse_predictions(text: &str) -> Result<Vec<i64>> {
    text.lines()
        .enumerate()
        .map(|(idx, line)| {
            let trimmed = line.trim();
            trimmed.parse::<i64>().map_err(|_| EvalError::Parse {
                line: idx + 1,
                content: trimmed.to_string(),
            })
        })
        .collect()
}
