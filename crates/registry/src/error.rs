//! Registry error types

use std::path::PathBuf;

use contracts::PipelineError;
use thiserror::Error;

/// Tracking store specific error
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Store file or artifact copy failed
    #[error("tracking store io error at '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Store file could not be (de)serialized
    #[error("tracking store is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("unknown run '{0}'")]
    UnknownRun(String),

    /// Logging into a run that was already ended
    #[error("run '{0}' is already ended")]
    RunEnded(String),

    #[error("model '{name}' has no version {version}")]
    UnknownVersion { name: String, version: u64 },

    /// No version holds the alias
    #[error("no version of model '{name}' holds alias '{alias}'")]
    AliasNotFound { name: String, alias: String },
}

impl RegistryError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<RegistryError> for PipelineError {
    fn from(e: RegistryError) -> Self {
        match e {
            RegistryError::AliasNotFound { name, alias } => PipelineError::lookup_miss(name, alias),
            other => PipelineError::registry(other.to_string()),
        }
    }
}

/// Result alias
pub type Result<T> = std::result::Result<T, RegistryError>;
