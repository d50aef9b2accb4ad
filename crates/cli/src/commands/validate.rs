//! `validate` command implementation.

use anyhow::{Context, Result};
use config_loader::{ConfigLoader, PipelineParams};
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;
use crate::error::CliError;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    params_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ParamsSummary>,
}

#[derive(Serialize)]
struct ParamsSummary {
    version: u32,
    test_size: f64,
    max_features: usize,
    model_params: Vec<String>,
    container: String,
    model_name: String,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(params = %args.params.display(), "Validating parameters");

    let result = validate_params(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    match result.error {
        None => Ok(()),
        Some(message) => Err(CliError::validation(message).into()),
    }
}

fn validate_params(args: &ValidateArgs) -> ValidationResult {
    let params_path = args.params.display().to_string();

    if !args.params.exists() {
        return ValidationResult {
            valid: false,
            params_path,
            error: Some(CliError::params_not_found(&args.params).to_string()),
            warnings: None,
            summary: None,
        };
    }

    match ConfigLoader::load_from_path(&args.params) {
        Ok(params) => {
            let warnings = collect_warnings(&params);
            ValidationResult {
                valid: true,
                params_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(ParamsSummary {
                    version: params.version,
                    test_size: params.data_transformation.test_size,
                    max_features: params.feature_engineering.max_features,
                    model_params: params.model_params.keys().cloned().collect(),
                    container: params.storage.container.clone(),
                    model_name: params.registry.model_name.clone(),
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            params_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Non-fatal issues
fn collect_warnings(params: &PipelineParams) -> Vec<String> {
    let mut warnings = Vec::new();

    if params.model_params.is_empty() {
        warnings.push("model_params is empty - classifier defaults will be used".to_string());
    }

    if params.data_transformation.test_size > 0.5 {
        warnings.push(format!(
            "test_size {} holds out more rows than it trains on",
            params.data_transformation.test_size
        ));
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Parameters are valid: {}", result.params_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Version: {}", summary.version);
            println!("  Test size: {}", summary.test_size);
            println!("  Max features: {}", summary.max_features);
            println!("  Model params: {}", summary.model_params.join(", "));
            println!("  Container: {}", summary.container);
            println!("  Model name: {}", summary.model_name);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Parameters are invalid: {}", result.params_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
