//! Per-stage configuration
//!
//! Each config is resolved once per Run from the artifact layout and the
//! parameter file. Every path is a function of the Run root and the owning
//! stage's directory, so no two stages write to the same file.

use std::path::PathBuf;

use serde::Serialize;

use crate::constants::{
    EXPERIMENT_INFO_FILE, METRICS_FILE, MODEL_FILE, RAW_DATA_FILE, SPLIT_SEED, TEST_FILE,
    TRAIN_FILE, VECTORIZER_FILE,
};
use crate::{ArtifactLayout, ModelParams, PipelineParams, Run, StageName};

fn stage_file(layout: &ArtifactLayout, stage: StageName, file: &str) -> PathBuf {
    // every stage but the pusher owns a directory
    stage
        .artifact_dir()
        .map(|dir| layout.path_for(dir, file))
        .unwrap_or_else(|| layout.root().join(file))
}

/// Ingestion: which blob to fetch and where to store it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngestionConfig {
    pub raw_data_file_path: PathBuf,
    pub container: String,
    pub blob_data_path: String,
}

impl IngestionConfig {
    pub fn resolve(layout: &ArtifactLayout, params: &PipelineParams) -> Self {
        Self {
            raw_data_file_path: stage_file(layout, StageName::Ingestion, RAW_DATA_FILE),
            container: params.storage.container.clone(),
            blob_data_path: params.storage.data_blob_path.clone(),
        }
    }
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self::resolve(&ArtifactLayout::default(), &PipelineParams::default())
    }
}

/// Transformation: label vocabulary, split ratio and output files
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransformationConfig {
    pub train_data_file_path: PathBuf,
    pub test_data_file_path: PathBuf,
    pub test_size: f64,
    pub seed: u64,
    pub negative_label: String,
    pub positive_label: String,
}

impl TransformationConfig {
    pub fn resolve(layout: &ArtifactLayout, params: &PipelineParams) -> Self {
        let p = &params.data_transformation;
        Self {
            train_data_file_path: stage_file(layout, StageName::Transformation, TRAIN_FILE),
            test_data_file_path: stage_file(layout, StageName::Transformation, TEST_FILE),
            test_size: p.test_size,
            seed: SPLIT_SEED,
            negative_label: p.negative_label.clone(),
            positive_label: p.positive_label.clone(),
        }
    }
}

impl Default for TransformationConfig {
    fn default() -> Self {
        Self::resolve(&ArtifactLayout::default(), &PipelineParams::default())
    }
}

/// Feature engineering: vocabulary cap and output files
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureEngineeringConfig {
    pub featured_train_data_file_path: PathBuf,
    pub featured_test_data_file_path: PathBuf,
    pub vectorizer_file_path: PathBuf,
    pub max_features: usize,
}

impl FeatureEngineeringConfig {
    pub fn resolve(layout: &ArtifactLayout, params: &PipelineParams) -> Self {
        let stage = StageName::FeatureEngineering;
        Self {
            featured_train_data_file_path: stage_file(layout, stage, TRAIN_FILE),
            featured_test_data_file_path: stage_file(layout, stage, TEST_FILE),
            vectorizer_file_path: stage_file(layout, stage, VECTORIZER_FILE),
            max_features: params.feature_engineering.max_features,
        }
    }
}

impl Default for FeatureEngineeringConfig {
    fn default() -> Self {
        Self::resolve(&ArtifactLayout::default(), &PipelineParams::default())
    }
}

/// Training: hyperparameters and model file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainerConfig {
    pub model_object_file_path: PathBuf,
    pub model_params: ModelParams,
}

impl TrainerConfig {
    pub fn resolve(layout: &ArtifactLayout, params: &PipelineParams) -> Self {
        Self {
            model_object_file_path: stage_file(layout, StageName::Training, MODEL_FILE),
            model_params: params.model_params.clone(),
        }
    }
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self::resolve(&ArtifactLayout::default(), &PipelineParams::default())
    }
}

/// Evaluation: report files and registry names
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationConfig {
    pub metrics_file_path: PathBuf,
    pub experiment_info_file_path: PathBuf,
    pub experiment_name: String,
    pub model_name: String,
    pub model_alias: String,
}

impl EvaluationConfig {
    pub fn resolve(layout: &ArtifactLayout, params: &PipelineParams) -> Self {
        Self {
            metrics_file_path: stage_file(layout, StageName::Evaluation, METRICS_FILE),
            experiment_info_file_path: stage_file(
                layout,
                StageName::Evaluation,
                EXPERIMENT_INFO_FILE,
            ),
            experiment_name: params.registry.experiment_name.clone(),
            model_name: params.registry.model_name.clone(),
            model_alias: params.registry.model_alias.clone(),
        }
    }
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self::resolve(&ArtifactLayout::default(), &PipelineParams::default())
    }
}

/// Pusher: remote destination of the trained model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PusherConfig {
    pub container: String,
    pub model_blob_file_path: String,
}

impl PusherConfig {
    pub fn resolve(params: &PipelineParams) -> Self {
        Self {
            container: params.storage.container.clone(),
            model_blob_file_path: params.storage.model_blob_path.clone(),
        }
    }
}

impl Default for PusherConfig {
    fn default() -> Self {
        Self::resolve(&PipelineParams::default())
    }
}

/// All stage configs of one Run, resolved together
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineConfig {
    pub run: Run,
    pub params: PipelineParams,
    pub ingestion: IngestionConfig,
    pub transformation: TransformationConfig,
    pub feature_engineering: FeatureEngineeringConfig,
    pub trainer: TrainerConfig,
    pub evaluation: EvaluationConfig,
    pub pusher: PusherConfig,
}

impl PipelineConfig {
    /// Resolve every stage config for `run`.
    ///
    /// `params` is expected to be validated already.
    pub fn resolve(run: Run, params: PipelineParams) -> Self {
        let layout = run.layout();
        Self {
            ingestion: IngestionConfig::resolve(&layout, &params),
            transformation: TransformationConfig::resolve(&layout, &params),
            feature_engineering: FeatureEngineeringConfig::resolve(&layout, &params),
            trainer: TrainerConfig::resolve(&layout, &params),
            evaluation: EvaluationConfig::resolve(&layout, &params),
            pusher: PusherConfig::resolve(&params),
            run,
            params,
        }
    }

    /// Every local output path, paired with the stage that writes it.
    pub fn declared_outputs(&self) -> Vec<(StageName, PathBuf)> {
        vec![
            (StageName::Ingestion, self.ingestion.raw_data_file_path.clone()),
            (
                StageName::Transformation,
                self.transformation.train_data_file_path.clone(),
            ),
            (
                StageName::Transformation,
                self.transformation.test_data_file_path.clone(),
            ),
            (
                StageName::FeatureEngineering,
                self.feature_engineering.featured_train_data_file_path.clone(),
            ),
            (
                StageName::FeatureEngineering,
                self.feature_engineering.featured_test_data_file_path.clone(),
            ),
            (
                StageName::FeatureEngineering,
                self.feature_engineering.vectorizer_file_path.clone(),
            ),
            (
                StageName::Training,
                self.trainer.model_object_file_path.clone(),
            ),
            (
                StageName::Evaluation,
                self.evaluation.metrics_file_path.clone(),
            ),
            (
                StageName::Evaluation,
                self.evaluation.experiment_info_file_path.clone(),
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::path::Path;

    fn config() -> PipelineConfig {
        PipelineConfig::resolve(
            Run::with_id("/tmp/artifact", "run-1"),
            PipelineParams::default(),
        )
    }

    #[test]
    fn test_declared_outputs_disjoint() {
        let outputs = config().declared_outputs();
        let unique: HashSet<_> = outputs.iter().map(|(_, p)| p.clone()).collect();
        assert_eq!(outputs.len(), unique.len());
    }

    #[test]
    fn test_outputs_live_in_owning_stage_dir() {
        let cfg = config();
        for (stage, path) in cfg.declared_outputs() {
            let dir = stage.artifact_dir().unwrap();
            assert_eq!(
                path.parent().unwrap(),
                Path::new("/tmp/artifact/run-1").join(dir),
                "{stage} writes outside its directory"
            );
        }
    }

    #[test]
    fn test_layout_matches_documented_files() {
        let cfg = config();
        assert!(cfg
            .transformation
            .train_data_file_path
            .ends_with("transformed_data/train.csv"));
        assert!(cfg
            .feature_engineering
            .featured_test_data_file_path
            .ends_with("feature/test.csv"));
        assert!(cfg
            .evaluation
            .experiment_info_file_path
            .ends_with("reports/experiment_info.json"));
    }

    #[test]
    fn test_params_flow_into_stage_configs() {
        let mut params = PipelineParams::default();
        params.data_transformation.test_size = 0.3;
        params.feature_engineering.max_features = 7;
        params
            .model_params
            .insert("C".into(), serde_json::json!(2.0));
        let cfg = PipelineConfig::resolve(Run::with_id("a", "r"), params);
        assert_eq!(cfg.transformation.test_size, 0.3);
        assert_eq!(cfg.transformation.seed, SPLIT_SEED);
        assert_eq!(cfg.feature_engineering.max_features, 7);
        assert_eq!(cfg.trainer.model_params["C"], serde_json::json!(2.0));
    }

    #[test]
    fn test_default_configs_use_default_artifact_dir() {
        let cfg = TransformationConfig::default();
        assert!(cfg.train_data_file_path.starts_with("artifact"));
    }
}
