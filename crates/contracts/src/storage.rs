//! ObjectStore trait - remote blob storage collaborator
//!
//! Failures are opaque to the pipeline: implementations report them as
//! [`PipelineError::StorageTransfer`] and stages wrap them.

use std::path::Path;

use bytes::Bytes;

use crate::PipelineError;

/// Blob storage organised in named containers
pub trait ObjectStore: Send + Sync {
    /// Store name (used for logging)
    fn name(&self) -> &str;

    /// Fetch one blob in full
    ///
    /// # Errors
    /// Returns [`PipelineError::StorageTransfer`] when the blob cannot be read
    fn download(&self, container: &str, blob_path: &str) -> Result<Bytes, PipelineError>;

    /// Upload a local file, optionally removing it afterwards
    ///
    /// # Errors
    /// Returns [`PipelineError::StorageTransfer`] when the blob cannot be written
    fn upload(
        &self,
        container: &str,
        blob_path: &str,
        local_path: &Path,
        remove_local: bool,
    ) -> Result<(), PipelineError>;
}
