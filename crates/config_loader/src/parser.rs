//! Parameter file parsing
//!
//! YAML is the primary format; TOML and JSON are accepted as well.

use contracts::{PipelineError, PipelineParams};

/// Parameter file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML (recommended)
    Yaml,
    /// TOML
    Toml,
    /// JSON
    Json,
}

impl ConfigFormat {
    /// Infer the format from a file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "yaml" | "yml" => Some(Self::Yaml),
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Parse YAML parameters
pub fn parse_yaml(content: &str) -> Result<PipelineParams, PipelineError> {
    serde_yaml::from_str(content)
        .map_err(|e| PipelineError::config_with_source(format!("YAML parse error: {e}"), e))
}

/// Parse TOML parameters
pub fn parse_toml(content: &str) -> Result<PipelineParams, PipelineError> {
    toml::from_str(content)
        .map_err(|e| PipelineError::config_with_source(format!("TOML parse error: {e}"), e))
}

/// Parse JSON parameters
pub fn parse_json(content: &str) -> Result<PipelineParams, PipelineError> {
    serde_json::from_str(content)
        .map_err(|e| PipelineError::config_with_source(format!("JSON parse error: {e}"), e))
}

/// Parse according to `format`
pub fn parse(content: &str, format: ConfigFormat) -> Result<PipelineParams, PipelineError> {
    match format {
        ConfigFormat::Yaml => parse_yaml(content),
        ConfigFormat::Toml => parse_toml(content),
        ConfigFormat::Json => parse_json(content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml_minimal() {
        let content = r#"
data_transformation:
  test_size: 0.2
feature_engineering:
  max_features: 20
model_params:
  C: 1.0
  solver: liblinear
  penalty: l2
"#;
        let params = parse_yaml(content).unwrap();
        assert_eq!(params.data_transformation.test_size, 0.2);
        assert_eq!(params.feature_engineering.max_features, 20);
        assert_eq!(params.model_params["solver"], serde_json::json!("liblinear"));
    }

    #[test]
    fn test_parse_toml_minimal() {
        let content = r#"
[data_transformation]
test_size = 0.25

[feature_engineering]
max_features = 100

[model_params]
C = 0.5

[storage]
container = "reviews"
"#;
        let params = parse_toml(content).unwrap();
        assert_eq!(params.storage.container, "reviews");
        assert_eq!(params.model_params["C"], serde_json::json!(0.5));
    }

    #[test]
    fn test_parse_yaml_missing_section() {
        let content = "data_transformation:\n  test_size: 0.2\n";
        let err = parse_yaml(content).unwrap_err();
        assert!(matches!(err, PipelineError::ConfigResolution { .. }));
        assert!(err.to_string().contains("feature_engineering"), "got: {err}");
    }

    #[test]
    fn test_parse_toml_syntax_error() {
        let result = parse_toml("invalid toml [[[");
        assert!(matches!(
            result,
            Err(PipelineError::ConfigResolution { .. })
        ));
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ConfigFormat::from_extension("yaml"), Some(ConfigFormat::Yaml));
        assert_eq!(ConfigFormat::from_extension("YML"), Some(ConfigFormat::Yaml));
        assert_eq!(ConfigFormat::from_extension("toml"), Some(ConfigFormat::Toml));
        assert_eq!(ConfigFormat::from_extension("json"), Some(ConfigFormat::Json));
        assert_eq!(ConfigFormat::from_extension("ini"), None);
    }
}
