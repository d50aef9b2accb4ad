//! Ingestion - fetch the raw dataset from object storage

use std::fs;

use contracts::{
    ensure_parent_dir, IngestionArtifact, IngestionConfig, ObjectStore, Stage, StageName,
};
use tracing::info;

use crate::error::{Result, StageError};

pub struct IngestionStage<'a> {
    config: IngestionConfig,
    store: &'a dyn ObjectStore,
}

impl<'a> IngestionStage<'a> {
    pub fn new(store: &'a dyn ObjectStore) -> Self {
        Self::with_config(store, IngestionConfig::default())
    }

    pub fn with_config(store: &'a dyn ObjectStore, config: IngestionConfig) -> Self {
        Self { config, store }
    }
}

impl Stage for IngestionStage<'_> {
    type Artifact = IngestionArtifact;
    type Error = StageError;

    fn name(&self) -> StageName {
        StageName::Ingestion
    }

    fn execute(&self) -> Result<IngestionArtifact> {
        let cfg = &self.config;
        info!(
            store = self.store.name(),
            container = %cfg.container,
            blob = %cfg.blob_data_path,
            "Downloading raw dataset"
        );
        let data = self.store.download(&cfg.container, &cfg.blob_data_path)?;

        let path = &cfg.raw_data_file_path;
        ensure_parent_dir(path).map_err(|e| StageError::io(path, e))?;
        fs::write(path, &data).map_err(|e| StageError::io(path, e))?;
        info!(path = %path.display(), bytes = data.len(), "Raw dataset saved");

        Ok(IngestionArtifact {
            raw_data_file_path: path.clone(),
        })
    }
}
