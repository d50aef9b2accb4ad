//! In-memory object store
//!
//! Used by unit and end-to-end tests; supports injecting transfer failures.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use bytes::Bytes;
use contracts::{ObjectStore, PipelineError};
use tracing::instrument;

/// Failure injection settings
#[derive(Debug, Default, Clone)]
pub struct MockConfig {
    /// Blob paths whose download fails
    pub fail_downloads: Vec<String>,
    /// Blob paths whose upload fails
    pub fail_uploads: Vec<String>,
}

type BlobKey = (String, String);

/// In-memory object store
#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    config: MockConfig,
    blobs: Mutex<HashMap<BlobKey, Bytes>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::with_config(MockConfig::default())
    }

    pub fn with_config(config: MockConfig) -> Self {
        Self {
            config,
            blobs: Mutex::new(HashMap::new()),
        }
    }

    /// Seed a blob
    pub fn insert(&self, container: &str, blob_path: &str, data: impl Into<Bytes>) {
        self.blobs()
            .insert((container.to_string(), blob_path.to_string()), data.into());
    }

    /// Current content of a blob
    pub fn get(&self, container: &str, blob_path: &str) -> Option<Bytes> {
        self.blobs()
            .get(&(container.to_string(), blob_path.to_string()))
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.blobs().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn blobs(&self) -> MutexGuard<'_, HashMap<BlobKey, Bytes>> {
        self.blobs.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ObjectStore for MemoryObjectStore {
    fn name(&self) -> &str {
        "memory"
    }

    #[instrument(name = "memory_store_download", skip(self))]
    fn download(&self, container: &str, blob_path: &str) -> Result<Bytes, PipelineError> {
        if self.config.fail_downloads.iter().any(|p| p == blob_path) {
            return Err(PipelineError::storage(container, blob_path, "mock failure"));
        }
        self.get(container, blob_path)
            .ok_or_else(|| PipelineError::storage(container, blob_path, "blob not found"))
    }

    #[instrument(name = "memory_store_upload", skip(self, local_path))]
    fn upload(
        &self,
        container: &str,
        blob_path: &str,
        local_path: &Path,
        remove_local: bool,
    ) -> Result<(), PipelineError> {
        if self.config.fail_uploads.iter().any(|p| p == blob_path) {
            return Err(PipelineError::storage(container, blob_path, "mock failure"));
        }
        let data = std::fs::read(local_path)
            .map_err(|e| PipelineError::storage(container, blob_path, e.to_string()))?;
        self.insert(container, blob_path, data);
        if remove_local {
            std::fs::remove_file(local_path)
                .map_err(|e| PipelineError::storage(container, blob_path, e.to_string()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_blob_downloads() {
        let store = MemoryObjectStore::new();
        store.insert("c", "data/data.csv", "review,sentiment\n");
        let data = store.download("c", "data/data.csv").unwrap();
        assert_eq!(&data[..], b"review,sentiment\n");
    }

    #[test]
    fn test_missing_blob_is_transfer_error() {
        let store = MemoryObjectStore::new();
        assert!(matches!(
            store.download("c", "x"),
            Err(PipelineError::StorageTransfer { .. })
        ));
    }

    #[test]
    fn test_injected_download_failure() {
        let store = MemoryObjectStore::with_config(MockConfig {
            fail_downloads: vec!["data/data.csv".into()],
            ..Default::default()
        });
        store.insert("c", "data/data.csv", "x");
        assert!(store.download("c", "data/data.csv").is_err());
    }

    #[test]
    fn test_upload_keeps_local_copy() {
        let dir = tempfile::tempdir().unwrap();
        let local = dir.path().join("model.bin");
        std::fs::write(&local, b"m").unwrap();

        let store = MemoryObjectStore::new();
        store.upload("c", "models/model.bin", &local, false).unwrap();
        assert!(local.exists());
        assert_eq!(store.get("c", "models/model.bin").unwrap(), Bytes::from_static(b"m"));
        assert_eq!(store.len(), 1);
    }
}
