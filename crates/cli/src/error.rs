//! Error types for CLI operations.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Parameter file not found
    #[error("Parameter file not found: {}", .path.display())]
    ParamsNotFound { path: PathBuf },

    /// Run directory not found
    #[error("Run directory not found: {}", .path.display())]
    RunNotFound { path: PathBuf },

    /// Parameter file failed validation
    #[error("Parameter validation failed: {message}")]
    Validation { message: String },
}

impl CliError {
    pub fn params_not_found(path: &Path) -> Self {
        Self::ParamsNotFound {
            path: path.to_path_buf(),
        }
    }

    pub fn run_not_found(path: &Path) -> Self {
        Self::RunNotFound {
            path: path.to_path_buf(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}
