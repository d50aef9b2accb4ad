//! Parameter validation
//!
//! Rules:
//! - schema ranges (`validator` derive): test_size in (0, 1), max_features > 0, names non-empty
//! - the two class labels differ
//! - model_params keys are non-empty and values are not null
//! - container names and blob paths are relative, without `..` segments

use contracts::{PipelineError, PipelineParams};
use validator::Validate;

/// Validate parsed parameters
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(params: &PipelineParams) -> Result<(), PipelineError> {
    validate_schema(params)?;
    validate_labels(params)?;
    validate_model_params(params)?;
    validate_storage(params)?;
    Ok(())
}

fn validate_schema(params: &PipelineParams) -> Result<(), PipelineError> {
    params
        .validate()
        .map_err(|e| PipelineError::config_with_source(format!("invalid parameters: {e}"), e))
}

/// The label vocabulary must hold exactly two classes
fn validate_labels(params: &PipelineParams) -> Result<(), PipelineError> {
    let t = &params.data_transformation;
    if t.negative_label == t.positive_label {
        return Err(PipelineError::config(format!(
            "data_transformation: negative_label and positive_label must differ, both are '{}'",
            t.negative_label
        )));
    }
    Ok(())
}

fn validate_model_params(params: &PipelineParams) -> Result<(), PipelineError> {
    for (key, value) in &params.model_params {
        if key.trim().is_empty() {
            return Err(PipelineError::config("model_params: empty parameter name"));
        }
        if value.is_null() {
            return Err(PipelineError::config(format!(
                "model_params.{key}: value cannot be null"
            )));
        }
    }
    Ok(())
}

fn validate_storage(params: &PipelineParams) -> Result<(), PipelineError> {
    let storage = &params.storage;
    if storage.container.contains(['/', '\\']) || storage.container == ".." {
        return Err(PipelineError::config(format!(
            "storage.container: '{}' must be a plain name",
            storage.container
        )));
    }
    validate_blob_path("storage.data_blob_path", &storage.data_blob_path)?;
    validate_blob_path("storage.model_blob_path", &storage.model_blob_path)?;
    Ok(())
}

fn validate_blob_path(field: &str, path: &str) -> Result<(), PipelineError> {
    if path.starts_with('/') || path.split('/').any(|seg| seg == "..") {
        return Err(PipelineError::config(format!(
            "{field}: '{path}' must be relative and stay inside the container"
        )));
    }
    Ok(())
}
