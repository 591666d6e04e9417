//! Error taxonomy for the prediction pipeline

use thiserror::Error;

pub type CoreResult<T> = Result<T, PredictionError>;

#[derive(Debug, Error)]
pub enum PredictionError {
    /// Classifier or threshold artifact missing or corrupt. Fatal at startup.
    #[error("model unavailable: {0}")]
    ModelUnavailable(String),

    /// A request field could not be coerced to a number.
    #[error("invalid input for '{field}': {reason}")]
    InvalidInput { field: String, reason: String },

    /// The classifier failed while scoring.
    #[error("inference failed: {0}")]
    Inference(String),
}

impl PredictionError {
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        PredictionError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
