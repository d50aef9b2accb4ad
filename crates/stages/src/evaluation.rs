//! Evaluation - metrics, experiment tracking and model registration
//!
//! Everything the tracker sees happens inside one [`RunScope`]. A failure
//! before `finish()` drops the scope, which ends the tracker run as failed.

use contracts::constants::LOGGED_MODEL_PATH;
use contracts::{
    run_artifact_uri, EvaluationArtifact, EvaluationConfig, EvaluationMetrics, ExperimentInfo,
    ExperimentTracker, FeatureEngineeringArtifact, ModelRegistry, PipelineError, RunScope, Stage,
    StageName, TrainerArtifact,
};
use learn::{classification_metrics, LogisticParams, LogisticRegression};
use tracing::{info, warn};

use crate::error::{Result, StageError};
use crate::io::{load_bincode, read_feature_matrix, write_json};

pub struct EvaluationStage<'a> {
    trainer: TrainerArtifact,
    feature_engineering: FeatureEngineeringArtifact,
    config: EvaluationConfig,
    tracker: &'a dyn ExperimentTracker,
    registry: &'a dyn ModelRegistry,
}

impl<'a> EvaluationStage<'a> {
    pub fn new(
        trainer: TrainerArtifact,
        feature_engineering: FeatureEngineeringArtifact,
        tracker: &'a dyn ExperimentTracker,
        registry: &'a dyn ModelRegistry,
    ) -> Self {
        Self::with_config(
            trainer,
            feature_engineering,
            tracker,
            registry,
            EvaluationConfig::default(),
        )
    }

    pub fn with_config(
        trainer: TrainerArtifact,
        feature_engineering: FeatureEngineeringArtifact,
        tracker: &'a dyn ExperimentTracker,
        registry: &'a dyn ModelRegistry,
        config: EvaluationConfig,
    ) -> Self {
        Self {
            trainer,
            feature_engineering,
            config,
            tracker,
            registry,
        }
    }

    fn compute_metrics(&self, model: &LogisticRegression) -> Result<EvaluationMetrics> {
        let path = &self.feature_engineering.featured_test_data_file_path;
        let (x, y) = read_feature_matrix(path)?;
        if x.is_empty() {
            return Err(StageError::EmptyDataset { path: path.clone() });
        }

        let scores = x
            .iter()
            .map(|row| model.predict_proba(row))
            .collect::<learn::Result<Vec<f64>>>()?;
        let predictions: Vec<u8> = scores.iter().map(|p| u8::from(*p >= 0.5)).collect();
        Ok(classification_metrics(&y, &predictions, &scores)?)
    }

    /// Register the logged model and point the configured alias at it
    fn register(&self, model_uri: &str) -> std::result::Result<u64, PipelineError> {
        let cfg = &self.config;
        let version = self.registry.register_model(model_uri, &cfg.model_name)?;
        info!(
            model = %cfg.model_name,
            version = version.version,
            "Model registered"
        );
        if let Err(e) = self
            .registry
            .set_alias(&cfg.model_name, version.version, &cfg.model_alias)
        {
            warn!(
                model = %cfg.model_name,
                alias = %cfg.model_alias,
                error = %e,
                "Alias assignment failed"
            );
        }
        Ok(version.version)
    }
}

fn param_entries(params: &LogisticParams) -> [(&'static str, String); 6] {
    let penalty = match params.penalty {
        learn::Penalty::L1 => "l1",
        learn::Penalty::L2 => "l2",
        learn::Penalty::None => "none",
    };
    [
        ("C", params.c.to_string()),
        ("penalty", penalty.to_string()),
        ("solver", params.solver.clone()),
        ("max_iter", params.max_iter.to_string()),
        ("learning_rate", params.learning_rate.to_string()),
        ("tol", params.tol.to_string()),
    ]
}

impl Stage for EvaluationStage<'_> {
    type Artifact = EvaluationArtifact;
    type Error = StageError;

    fn name(&self) -> StageName {
        StageName::Evaluation
    }

    fn execute(&self) -> Result<EvaluationArtifact> {
        let cfg = &self.config;
        let model_path = &self.trainer.model_object_file_path;
        let model: LogisticRegression = load_bincode(model_path)?;
        let metrics = self.compute_metrics(&model)?;
        info!(
            accuracy = metrics.accuracy,
            precision = metrics.precision,
            recall = metrics.recall,
            auc = metrics.auc,
            "Metrics computed"
        );

        let scope = RunScope::start(self.tracker, &cfg.experiment_name)?;
        for (name, value) in metrics.entries() {
            scope.log_metric(name, value)?;
        }
        for (name, value) in param_entries(model.params()) {
            scope.log_param(name, &value)?;
        }

        write_json(&cfg.metrics_file_path, &metrics)?;
        scope.log_artifact(model_path, Some(LOGGED_MODEL_PATH))?;

        let model_uri = run_artifact_uri(scope.run_id(), LOGGED_MODEL_PATH);
        let mut experiment_info = ExperimentInfo {
            run_id: scope.run_id().to_string(),
            model_path: LOGGED_MODEL_PATH.to_string(),
            model_uri: model_uri.clone(),
            registered_version: None,
        };
        write_json(&cfg.experiment_info_file_path, &experiment_info)?;

        match self.register(&model_uri) {
            Ok(version) => {
                experiment_info.registered_version = Some(version);
                write_json(&cfg.experiment_info_file_path, &experiment_info)?;
            }
            Err(e) => warn!(
                model = %cfg.model_name,
                error = %e,
                "Model registration failed, metrics are still logged"
            ),
        }

        scope.log_artifact(&cfg.metrics_file_path, None)?;
        scope.finish()?;

        Ok(EvaluationArtifact {
            metrics_file_path: cfg.metrics_file_path.clone(),
            experiment_info_file_path: cfg.experiment_info_file_path.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{save_bincode, write_feature_matrix};
    use contracts::constants::CHALLENGER_ALIAS;
    use contracts::{ArtifactLayout, PipelineParams, RunStatus};
    use registry::{MockConfig, MockRegistry};
    use std::path::Path;

    struct Fixture {
        _dir: tempfile::TempDir,
        trainer: TrainerArtifact,
        fe: FeatureEngineeringArtifact,
        config: EvaluationConfig,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let x = vec![vec![2.0, 0.0], vec![1.0, 0.0], vec![0.0, 2.0], vec![0.0, 1.0]];
        let y = vec![1, 1, 0, 0];
        let model = LogisticRegression::fit(&x, &y, LogisticParams::default()).unwrap();
        let model_path = root.join("model/model.bin");
        save_bincode(&model_path, &model).unwrap();

        let test_path = root.join("feature/test.csv");
        write_feature_matrix(&test_path, 2, &[(vec![3, 0], 1), (vec![0, 3], 0)]).unwrap();

        Fixture {
            trainer: TrainerArtifact {
                model_object_file_path: model_path,
            },
            fe: FeatureEngineeringArtifact {
                featured_train_data_file_path: root.join("feature/train.csv"),
                featured_test_data_file_path: test_path,
                vectorizer_file_path: root.join("feature/vectorizer.bin"),
            },
            config: EvaluationConfig::resolve(
                &ArtifactLayout::new(root),
                &PipelineParams::default(),
            ),
            _dir: dir,
        }
    }

    fn evaluate(
        f: &Fixture,
        mock: &MockRegistry,
    ) -> std::result::Result<EvaluationArtifact, PipelineError> {
        EvaluationStage::with_config(
            f.trainer.clone(),
            f.fe.clone(),
            mock,
            mock,
            f.config.clone(),
        )
        .initiate()
    }

    fn read_info(path: &Path) -> ExperimentInfo {
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn test_tracking_order_and_outputs() {
        let f = fixture();
        let mock = MockRegistry::new();

        let artifact = evaluate(&f, &mock).unwrap();

        assert_eq!(
            mock.calls(),
            vec![
                "start_run",
                "log_metric:accuracy",
                "log_metric:precision",
                "log_metric:recall",
                "log_metric:auc",
                "log_param:C",
                "log_param:penalty",
                "log_param:solver",
                "log_param:max_iter",
                "log_param:learning_rate",
                "log_param:tol",
                "log_artifact:model/model.bin",
                "register_model",
                "set_alias:challenger",
                "log_artifact:metrics.json",
                "end_run:finished",
            ]
        );

        let metrics: EvaluationMetrics =
            serde_json::from_str(&std::fs::read_to_string(&artifact.metrics_file_path).unwrap())
                .unwrap();
        assert_eq!(metrics.accuracy, 1.0);
        assert_eq!(metrics.auc, 1.0);

        let info = read_info(&artifact.experiment_info_file_path);
        assert_eq!(info.run_id, "mock-run-1");
        assert_eq!(info.model_uri, "runs:/mock-run-1/model");
        assert_eq!(info.registered_version, Some(1));
        assert_eq!(mock.alias(&f.config.model_name, CHALLENGER_ALIAS), Some(1));
    }

    #[test]
    fn test_registration_failure_does_not_fail_stage() {
        let f = fixture();
        let mock = MockRegistry::with_config(MockConfig {
            fail_register: true,
            ..Default::default()
        });

        let artifact = evaluate(&f, &mock).unwrap();

        assert_eq!(mock.metrics().len(), 4);
        assert_eq!(read_info(&artifact.experiment_info_file_path).registered_version, None);
        assert_eq!(mock.run_status("mock-run-1"), Some(RunStatus::Finished));
    }

    #[test]
    fn test_tracker_failure_ends_run_as_failed() {
        let f = fixture();
        let mock = MockRegistry::with_config(MockConfig {
            fail_metrics: vec!["recall".into()],
            ..Default::default()
        });

        let err = evaluate(&f, &mock).unwrap_err();

        assert_eq!(err.failed_stage(), Some(StageName::Evaluation));
        assert_eq!(mock.run_status("mock-run-1"), Some(RunStatus::Failed));
        assert_eq!(mock.calls().last().map(String::as_str), Some("end_run:failed"));
    }
}
