//! Training - fit the classifier on the featured training split

use contracts::{FeatureEngineeringArtifact, Stage, StageName, TrainerArtifact, TrainerConfig};
use learn::{LogisticParams, LogisticRegression};
use tracing::info;

use crate::error::{Result, StageError};
use crate::io::{read_feature_matrix, save_bincode};

pub struct TrainingStage {
    feature_engineering: FeatureEngineeringArtifact,
    config: TrainerConfig,
}

impl TrainingStage {
    pub fn new(feature_engineering: FeatureEngineeringArtifact) -> Self {
        Self::with_config(feature_engineering, TrainerConfig::default())
    }

    pub fn with_config(
        feature_engineering: FeatureEngineeringArtifact,
        config: TrainerConfig,
    ) -> Self {
        Self {
            feature_engineering,
            config,
        }
    }
}

impl Stage for TrainingStage {
    type Artifact = TrainerArtifact;
    type Error = StageError;

    fn name(&self) -> StageName {
        StageName::Training
    }

    fn execute(&self) -> Result<TrainerArtifact> {
        // hyperparameters come from the resolved config only
        let params = LogisticParams::from_model_params(&self.config.model_params)?;
        info!(
            c = params.c,
            penalty = ?params.penalty,
            solver = %params.solver,
            max_iter = params.max_iter,
            "Training parameters resolved"
        );

        let path = &self.feature_engineering.featured_train_data_file_path;
        let (x, y) = read_feature_matrix(path)?;
        if x.is_empty() {
            return Err(StageError::EmptyDataset { path: path.clone() });
        }

        let model = LogisticRegression::fit(&x, &y, params)?;
        save_bincode(&self.config.model_object_file_path, &model)?;
        info!(path = %self.config.model_object_file_path.display(), "Model saved");

        Ok(TrainerArtifact {
            model_object_file_path: self.config.model_object_file_path.clone(),
        })
    }
}
