//! # Config Loader
//!
//! Config Resolver for the training pipeline.
//!
//! Responsibilities:
//! - Parse the parameter file (YAML/TOML/JSON)
//! - Validate parameter legality
//! - Resolve one immutable `PipelineConfig` per Run
//!
//! Resolution is fail-fast: a malformed parameter file is reported before any
//! stage is constructed.
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigResolver;
//! use std::path::Path;
//!
//! let config = ConfigResolver::resolve(Path::new("params.yaml"), Path::new("artifact")).unwrap();
//! println!("Run root: {}", config.run.root.display());
//! ```

mod parser;
mod validator;

pub use contracts::{PipelineConfig, PipelineParams};
pub use parser::ConfigFormat;

use contracts::{PipelineError, Run};
use std::path::Path;
use tracing::{debug, info};

/// Parameter file loader
///
/// Provides static methods to load parameters from files or strings.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load parameters from file path
    ///
    /// Detects the format from the file extension (.yaml / .yml / .toml / .json).
    ///
    /// # Errors
    /// - File read failure
    /// - Unsupported format
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_path(path: &Path) -> Result<PipelineParams, PipelineError> {
        let format = Self::detect_format(path)?;
        let content = Self::read_file(path)?;
        debug!(path = %path.display(), ?format, "Parsing parameter file");
        Self::load_from_str(&content, format)
    }

    /// Load parameters from string
    ///
    /// # Errors
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_str(
        content: &str,
        format: ConfigFormat,
    ) -> Result<PipelineParams, PipelineError> {
        Self::parse_and_validate(content, format)
    }

    /// Serialize parameters to YAML
    pub fn to_yaml(params: &PipelineParams) -> Result<String, PipelineError> {
        serde_yaml::to_string(params)
            .map_err(|e| PipelineError::config_with_source(format!("YAML serialize error: {e}"), e))
    }

    /// Serialize parameters to TOML
    pub fn to_toml(params: &PipelineParams) -> Result<String, PipelineError> {
        toml::to_string_pretty(params)
            .map_err(|e| PipelineError::config_with_source(format!("TOML serialize error: {e}"), e))
    }

    /// Serialize parameters to JSON
    pub fn to_json(params: &PipelineParams) -> Result<String, PipelineError> {
        serde_json::to_string_pretty(params)
            .map_err(|e| PipelineError::config_with_source(format!("JSON serialize error: {e}"), e))
    }
}

impl ConfigLoader {
    /// Infer parameter file format from file extension
    fn detect_format(path: &Path) -> Result<ConfigFormat, PipelineError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            PipelineError::config(format!(
                "cannot determine file format of '{}' from extension",
                path.display()
            ))
        })?;

        ConfigFormat::from_extension(ext)
            .ok_or_else(|| PipelineError::config(format!("unsupported parameter format: .{ext}")))
    }

    /// Read parameter file content
    fn read_file(path: &Path) -> Result<String, PipelineError> {
        std::fs::read_to_string(path).map_err(|e| {
            PipelineError::config_with_source(
                format!("cannot read parameter file '{}'", path.display()),
                e,
            )
        })
    }

    fn parse_and_validate(
        content: &str,
        format: ConfigFormat,
    ) -> Result<PipelineParams, PipelineError> {
        let params = parser::parse(content, format)?;
        validator::validate(&params)?;
        Ok(params)
    }
}

/// Resolves the per-stage configuration of a Run
pub struct ConfigResolver;

impl ConfigResolver {
    /// Load `params_path` and resolve every stage config for a new Run under
    /// `artifact_dir`.
    ///
    /// No directory is created; stages create their own on first write.
    pub fn resolve(
        params_path: &Path,
        artifact_dir: &Path,
    ) -> Result<PipelineConfig, PipelineError> {
        let params = ConfigLoader::load_from_path(params_path)?;
        let config = Self::resolve_with_run(Run::start(artifact_dir), params);
        info!(
            run_id = %config.run.id,
            root = %config.run.root.display(),
            params = %params_path.display(),
            "Configuration resolved"
        );
        Ok(config)
    }

    /// Resolve every stage config for an explicit Run.
    ///
    /// `params` must already be validated.
    pub fn resolve_with_run(run: Run, params: PipelineParams) -> PipelineConfig {
        PipelineConfig::resolve(run, params)
    }
}
