//! PipelineParams - Config Resolver input
//!
//! The user-editable parameter file: split ratio, vocabulary cap, model
//! hyperparameters, and optional storage/registry overrides.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::constants::{
    CHALLENGER_ALIAS, DEFAULT_CONTAINER, DEFAULT_DATA_BLOB_PATH, DEFAULT_EXPERIMENT_NAME,
    DEFAULT_MODEL_BLOB_PATH, DEFAULT_MODEL_NAME, NEGATIVE_LABEL, POSITIVE_LABEL,
};

/// Current schema version
pub const PARAMS_VERSION: u32 = 1;

/// Hyperparameters forwarded verbatim to the training delegate.
pub type ModelParams = BTreeMap<String, serde_json::Value>;

/// Complete parameter file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct PipelineParams {
    /// Schema version
    #[serde(default = "default_version")]
    #[validate(range(min = 1, max = 1))]
    pub version: u32,

    #[validate(nested)]
    pub data_transformation: TransformationParams,

    #[validate(nested)]
    pub feature_engineering: FeatureEngineeringParams,

    /// Opaque classifier hyperparameters
    pub model_params: ModelParams,

    #[serde(default)]
    #[validate(nested)]
    pub storage: StorageParams,

    #[serde(default)]
    #[validate(nested)]
    pub registry: RegistryParams,
}

fn default_version() -> u32 {
    PARAMS_VERSION
}

impl Default for PipelineParams {
    fn default() -> Self {
        Self {
            version: PARAMS_VERSION,
            data_transformation: TransformationParams::default(),
            feature_engineering: FeatureEngineeringParams::default(),
            model_params: ModelParams::new(),
            storage: StorageParams::default(),
            registry: RegistryParams::default(),
        }
    }
}

/// Transformation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct TransformationParams {
    /// Fraction of rows held out for testing, in (0, 1)
    #[validate(range(exclusive_min = 0.0, exclusive_max = 1.0))]
    pub test_size: f64,

    /// Label mapped to 0
    #[serde(default = "default_negative_label")]
    #[validate(length(min = 1))]
    pub negative_label: String,

    /// Label mapped to 1
    #[serde(default = "default_positive_label")]
    #[validate(length(min = 1))]
    pub positive_label: String,
}

fn default_negative_label() -> String {
    NEGATIVE_LABEL.to_string()
}

fn default_positive_label() -> String {
    POSITIVE_LABEL.to_string()
}

impl Default for TransformationParams {
    fn default() -> Self {
        Self {
            test_size: 0.2,
            negative_label: default_negative_label(),
            positive_label: default_positive_label(),
        }
    }
}

/// Feature engineering settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct FeatureEngineeringParams {
    /// Vocabulary cap of the bag-of-words vectorizer
    #[validate(range(min = 1))]
    pub max_features: usize,
}

impl Default for FeatureEngineeringParams {
    fn default() -> Self {
        Self { max_features: 20 }
    }
}

/// Object storage locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct StorageParams {
    #[serde(default = "default_container")]
    #[validate(length(min = 1))]
    pub container: String,

    /// Blob holding the raw dataset
    #[serde(default = "default_data_blob_path")]
    #[validate(length(min = 1))]
    pub data_blob_path: String,

    /// Blob the trained model is pushed to
    #[serde(default = "default_model_blob_path")]
    #[validate(length(min = 1))]
    pub model_blob_path: String,
}

fn default_container() -> String {
    DEFAULT_CONTAINER.to_string()
}

fn default_data_blob_path() -> String {
    DEFAULT_DATA_BLOB_PATH.to_string()
}

fn default_model_blob_path() -> String {
    DEFAULT_MODEL_BLOB_PATH.to_string()
}

impl Default for StorageParams {
    fn default() -> Self {
        Self {
            container: default_container(),
            data_blob_path: default_data_blob_path(),
            model_blob_path: default_model_blob_path(),
        }
    }
}

/// Experiment tracking and registry names
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct RegistryParams {
    #[serde(default = "default_experiment_name")]
    #[validate(length(min = 1))]
    pub experiment_name: String,

    #[serde(default = "default_model_name")]
    #[validate(length(min = 1))]
    pub model_name: String,

    /// Alias assigned to a freshly registered version
    #[serde(default = "default_model_alias")]
    #[validate(length(min = 1))]
    pub model_alias: String,
}

fn default_experiment_name() -> String {
    DEFAULT_EXPERIMENT_NAME.to_string()
}

fn default_model_name() -> String {
    DEFAULT_MODEL_NAME.to_string()
}

fn default_model_alias() -> String {
    CHALLENGER_ALIAS.to_string()
}

impl Default for RegistryParams {
    fn default() -> Self {
        Self {
            experiment_name: default_experiment_name(),
            model_name: default_model_name(),
            model_alias: default_model_alias(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(PipelineParams::default().validate().is_ok());
    }

    #[test]
    fn test_split_ratio_bounds() {
        let mut params = PipelineParams::default();
        params.data_transformation.test_size = 1.0;
        assert!(params.validate().is_err());

        params.data_transformation.test_size = 0.0;
        assert!(params.validate().is_err());

        params.data_transformation.test_size = 0.5;
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_max_features_positive() {
        let mut params = PipelineParams::default();
        params.feature_engineering.max_features = 0;
        let err = params.validate().unwrap_err().to_string();
        assert!(err.contains("max_features"), "got: {err}");
    }

    #[test]
    fn test_unknown_version_rejected() {
        let params = PipelineParams {
            version: 2,
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_optional_sections_default() {
        let json = r#"{
            "data_transformation": { "test_size": 0.25 },
            "feature_engineering": { "max_features": 50 },
            "model_params": { "C": 0.5 }
        }"#;
        let params: PipelineParams = serde_json::from_str(json).unwrap();
        assert_eq!(params.version, PARAMS_VERSION);
        assert_eq!(params.storage, StorageParams::default());
        assert_eq!(params.registry.model_alias, CHALLENGER_ALIAS);
        assert_eq!(params.data_transformation.positive_label, POSITIVE_LABEL);
        assert_eq!(params.model_params["C"], serde_json::json!(0.5));
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let json = r#"{
            "data_transformation": { "test_size": 0.25 },
            "feature_engineering": { "max_features": 50 },
            "model_params": {},
            "surprise": true
        }"#;
        assert!(serde_json::from_str::<PipelineParams>(json).is_err());
    }
}
