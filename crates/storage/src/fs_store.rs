//! FsObjectStore - containers as directories on local disk

use std::fs;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use contracts::{ObjectStore, PipelineError};
use tracing::{debug, error, instrument};

/// Directory-backed object store
///
/// Blob `<container>/<blob_path>` lives at `<root>/<container>/<blob_path>`.
#[derive(Debug, Clone)]
pub struct FsObjectStore {
    name: String,
    root: PathBuf,
}

impl FsObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            name: "fs".to_string(),
            root: root.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Local path backing a blob
    pub fn blob_path(&self, container: &str, blob_path: &str) -> PathBuf {
        self.root.join(container).join(blob_path)
    }

    fn transfer_error(container: &str, blob_path: &str, e: std::io::Error) -> PipelineError {
        error!(container, blob_path, error = %e, "Blob transfer failed");
        PipelineError::storage(container, blob_path, e.to_string())
    }
}

impl ObjectStore for FsObjectStore {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(name = "fs_store_download", skip(self), fields(root = %self.root.display()))]
    fn download(&self, container: &str, blob_path: &str) -> Result<Bytes, PipelineError> {
        let path = self.blob_path(container, blob_path);
        let data =
            fs::read(&path).map_err(|e| Self::transfer_error(container, blob_path, e))?;
        debug!(bytes = data.len(), "Blob downloaded");
        Ok(Bytes::from(data))
    }

    #[instrument(
        name = "fs_store_upload",
        skip(self, local_path),
        fields(local = %local_path.display())
    )]
    fn upload(
        &self,
        container: &str,
        blob_path: &str,
        local_path: &Path,
        remove_local: bool,
    ) -> Result<(), PipelineError> {
        let dest = self.blob_path(container, blob_path);
        let copy = || -> std::io::Result<u64> {
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            let written = fs::copy(local_path, &dest)?;
            if remove_local {
                fs::remove_file(local_path)?;
            }
            Ok(written)
        };
        let written = copy().map_err(|e| Self::transfer_error(container, blob_path, e))?;
        debug!(bytes = written, remove_local, "Blob uploaded");
        Ok(())
    }
}
