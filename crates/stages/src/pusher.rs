//! Pusher - upload the trained model to object storage

use contracts::{ObjectStore, PusherArtifact, PusherConfig, Stage, StageName, TrainerArtifact};
use tracing::info;

use crate::error::{Result, StageError};

pub struct PusherStage<'a> {
    trainer: TrainerArtifact,
    config: PusherConfig,
    store: &'a dyn ObjectStore,
}

impl<'a> PusherStage<'a> {
    pub fn new(trainer: TrainerArtifact, store: &'a dyn ObjectStore) -> Self {
        Self::with_config(trainer, store, PusherConfig::default())
    }

    pub fn with_config(
        trainer: TrainerArtifact,
        store: &'a dyn ObjectStore,
        config: PusherConfig,
    ) -> Self {
        Self {
            trainer,
            config,
            store,
        }
    }
}

impl Stage for PusherStage<'_> {
    type Artifact = PusherArtifact;
    type Error = StageError;

    fn name(&self) -> StageName {
        StageName::Pusher
    }

    fn execute(&self) -> Result<PusherArtifact> {
        let cfg = &self.config;
        // the local model stays in the Run directory
        self.store.upload(
            &cfg.container,
            &cfg.model_blob_file_path,
            &self.trainer.model_object_file_path,
            false,
        )?;
        info!(
            store = self.store.name(),
            container = %cfg.container,
            blob = %cfg.model_blob_file_path,
            "Model pushed"
        );

        Ok(PusherArtifact {
            model_blob_file_path: cfg.model_blob_file_path.clone(),
            container: cfg.container.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::constants::{DEFAULT_CONTAINER, DEFAULT_MODEL_BLOB_PATH};
    use storage::{MemoryObjectStore, MockConfig};

    #[test]
    fn test_push_keeps_local_model() {
        let dir = tempfile::tempdir().unwrap();
        let model = dir.path().join("model.bin");
        std::fs::write(&model, b"weights").unwrap();
        let store = MemoryObjectStore::new();

        let artifact = PusherStage::new(
            TrainerArtifact {
                model_object_file_path: model.clone(),
            },
            &store,
        )
        .initiate()
        .unwrap();

        assert!(model.exists());
        assert_eq!(artifact.container, DEFAULT_CONTAINER);
        assert_eq!(artifact.model_blob_file_path, DEFAULT_MODEL_BLOB_PATH);
        assert_eq!(
            &store.get(DEFAULT_CONTAINER, DEFAULT_MODEL_BLOB_PATH).unwrap()[..],
            b"weights"
        );
    }

    #[test]
    fn test_upload_failure_is_wrapped() {
        let dir = tempfile::tempdir().unwrap();
        let model = dir.path().join("model.bin");
        std::fs::write(&model, b"weights").unwrap();
        let store = MemoryObjectStore::with_config(MockConfig {
            fail_uploads: vec![DEFAULT_MODEL_BLOB_PATH.into()],
            ..Default::default()
        });

        let err = PusherStage::new(
            TrainerArtifact {
                model_object_file_path: model,
            },
            &store,
        )
        .initiate()
        .unwrap_err();

        assert_eq!(err.failed_stage(), Some(StageName::Pusher));
    }
}
