// src/error.rs
//! Error types shared by the truth pipeline and the metrics engine.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EvalError {
    /// A raw feed is missing the requested location or carries an unusable value.
    #[error("Data integrity error: {0}")]
    DataIntegrity(String),

    /// Prediction and truth series have different lengths.
    #[error("Predictions required for {expected} weeks, got {actual} predictions")]
    Alignment { expected: usize, actual: usize },

    /// A prediction line is not an integer.
    #[error("File contains non-numeric elements (line {line}: '{content}')")]
    Parse { line: usize, content: String },

    /// A relative score was requested against a baseline with zero error.
    #[error("Relative score undefined: {0} baseline RMSE is zero")]
    DivisionByZero(String),

    #[error("Could not find pre-processed ground-truth data at '{0}'")]
    MissingReferenceData(String),

    #[error("Ground-truth data is corrupt: {0}")]
    CorruptReferenceData(String),

    /// Unusable window selector or baseline window.
    #[error("Invalid window: {0}")]
    InvalidWindow(String),

    #[error("Cannot score an empty truth window")]
    EmptyWindow,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to fetch truth feed: {0}")]
    Fetch(#[from] reqwest::Error),
}

impl EvalError {
    /// True when the caller has to fix their input, false for server-side faults.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            EvalError::Alignment { .. } | EvalError::Parse { .. } | EvalError::InvalidWindow(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, EvalError>;
