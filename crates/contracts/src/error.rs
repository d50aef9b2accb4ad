//! Layered error definitions
//!
//! Categorized by phase: config resolution / stage execution / registry / storage

use thiserror::Error;

use crate::StageName;

/// Boxed cause carried by wrapped errors.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Unified error type
#[derive(Debug, Error)]
pub enum PipelineError {
    // ===== Pre-run =====
    /// Parameter file could not be read, parsed or validated
    #[error("config resolution error: {message}")]
    ConfigResolution {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    // ===== Run =====
    /// A stage failed; aborts the Run
    #[error("stage '{stage}' failed: {source}")]
    StageExecution {
        stage: StageName,
        #[source]
        source: BoxError,
    },

    // ===== Collaborators =====
    /// Alias lookup found no version; expected before the first promotion
    #[error("no version of model '{model_name}' holds alias '{alias}'")]
    RegistryLookupMiss { model_name: String, alias: String },

    /// Tracker or registry call failed
    #[error("registry error: {message}")]
    Registry { message: String },

    /// Object storage transfer failed
    #[error("storage transfer error for '{container}/{blob_path}': {message}")]
    StorageTransfer {
        container: String,
        blob_path: String,
        message: String,
    },

    // ===== General =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    /// Create config resolution error
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigResolution {
            message: message.into(),
            source: None,
        }
    }

    /// Create config resolution error with its underlying cause
    pub fn config_with_source(
        message: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        Self::ConfigResolution {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Wrap a stage-internal failure
    pub fn stage(stage: StageName, source: impl Into<BoxError>) -> Self {
        Self::StageExecution {
            stage,
            source: source.into(),
        }
    }

    /// Create registry lookup miss
    pub fn lookup_miss(model_name: impl Into<String>, alias: impl Into<String>) -> Self {
        Self::RegistryLookupMiss {
            model_name: model_name.into(),
            alias: alias.into(),
        }
    }

    /// Create registry error
    pub fn registry(message: impl Into<String>) -> Self {
        Self::Registry {
            message: message.into(),
        }
    }

    /// Create storage transfer error
    pub fn storage(
        container: impl Into<String>,
        blob_path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::StorageTransfer {
            container: container.into(),
            blob_path: blob_path.into(),
            message: message.into(),
        }
    }

    /// Whether this error is the recoverable alias miss
    pub fn is_lookup_miss(&self) -> bool {
        matches!(self, Self::RegistryLookupMiss { .. })
    }

    /// Stage that failed, if this is a stage execution error
    pub fn failed_stage(&self) -> Option<StageName> {
        match self {
            Self::StageExecution { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}
