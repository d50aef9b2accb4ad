//! Stage error types

use std::path::PathBuf;

use contracts::PipelineError;
use learn::LearnError;
use thiserror::Error;

/// Stage-internal failure, wrapped by `Stage::initiate`
#[derive(Debug, Error)]
pub enum StageError {
    #[error("io error at '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed or unreadable CSV
    #[error("csv error in '{}': {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("'{}' has no '{column}' column", path.display())]
    MissingColumn { path: PathBuf, column: String },

    /// A cell that should hold a number or a class label does not
    #[error("invalid value '{value}' in '{}' row {row}", path.display())]
    InvalidValue {
        path: PathBuf,
        row: usize,
        value: String,
    },

    /// No usable rows left
    #[error("no usable rows in '{}'", path.display())]
    EmptyDataset { path: PathBuf },

    /// bincode (de)serialization of a model or vectorizer
    #[error("cannot (de)serialize '{}': {source}", path.display())]
    Serialization {
        path: PathBuf,
        #[source]
        source: bincode::Error,
    },

    #[error("cannot write JSON '{}': {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Numeric delegate failure
    #[error(transparent)]
    Learn(#[from] LearnError),

    /// Storage or tracker collaborator failure
    #[error(transparent)]
    Collaborator(#[from] PipelineError),
}

impl StageError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            source,
        }
    }
}

/// Result alias
pub type Result<T> = std::result::Result<T, StageError>;
