//! Stage artifacts
//!
//! An artifact only records where a stage put its outputs. It is produced by
//! a successful `initiate()` and is the sole input of the next stage.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Output of Ingestion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestionArtifact {
    pub raw_data_file_path: PathBuf,
}

/// Output of Transformation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformationArtifact {
    pub train_data_file_path: PathBuf,
    pub test_data_file_path: PathBuf,
}

/// Output of Feature Engineering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureEngineeringArtifact {
    pub featured_train_data_file_path: PathBuf,
    pub featured_test_data_file_path: PathBuf,
    /// Fitted vectorizer, required again at inference time
    pub vectorizer_file_path: PathBuf,
}

/// Output of Training
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainerArtifact {
    pub model_object_file_path: PathBuf,
}

/// Output of Evaluation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationArtifact {
    pub metrics_file_path: PathBuf,
    pub experiment_info_file_path: PathBuf,
}

/// Output of the Pusher
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PusherArtifact {
    pub model_blob_file_path: String,
    pub container: String,
}

/// Metric values written to `metrics.json`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvaluationMetrics {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub auc: f64,
}

impl EvaluationMetrics {
    /// Metric name/value pairs in a stable order
    pub fn entries(&self) -> [(&'static str, f64); 4] {
        [
            ("accuracy", self.accuracy),
            ("precision", self.precision),
            ("recall", self.recall),
            ("auc", self.auc),
        ]
    }
}

/// Contents of `experiment_info.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperimentInfo {
    pub run_id: String,
    /// Path of the model inside the tracker run
    pub model_path: String,
    pub model_uri: String,
    /// `None` when registration failed
    pub registered_version: Option<u64>,
}
