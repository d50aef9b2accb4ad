//! Learn error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LearnError {
    /// Hyperparameter not understood by the classifier
    #[error("unknown model parameter '{0}'")]
    UnknownParam(String),

    /// Hyperparameter present but unusable
    #[error("invalid model parameter '{name}': {message}")]
    InvalidParam { name: String, message: String },

    #[error("cannot fit on an empty training set")]
    EmptyTrainingSet,

    /// Sample width differs from what the model was fit on
    #[error("expected {expected} features, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Parallel inputs of different length
    #[error("length mismatch: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },
}

impl LearnError {
    pub fn invalid_param(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParam {
            name: name.into(),
            message: message.into(),
        }
    }
}

/// Result alias
pub type Result<T> = std::result::Result<T, LearnError>;
