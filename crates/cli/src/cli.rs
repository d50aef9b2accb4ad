//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use contracts::constants::{DEFAULT_ARTIFACT_DIR, DEFAULT_MODEL_NAME};
use std::path::PathBuf;

/// Sentiment Pipeline - train, evaluate and register a review sentiment classifier
#[derive(Parser, Debug)]
#[command(
    name = "sentiment-pipeline",
    author,
    version,
    about = "Sentiment classifier training pipeline",
    long_about = "Fetches a labeled review dataset from object storage, normalizes and \n\
                  vectorizes it, trains a logistic-regression classifier, logs the run \n\
                  to the tracking store and registers the model."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "SENTIMENT_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "SENTIMENT_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    /// Also write JSON logs to a timestamped file in this directory
    #[arg(long, global = true, env = "SENTIMENT_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Level used when RUST_LOG is unset
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "warn";
        }
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the training pipeline
    Run(RunArgs),

    /// Validate a parameter file without running
    Validate(ValidateArgs),

    /// Display the resolved layout of a new Run
    Info(InfoArgs),

    /// Promote the challenger model version to alpha
    Promote(PromoteArgs),

    /// Classify reviews with the model of a finished Run
    Predict(PredictArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Path to the parameter file (YAML, TOML or JSON)
    #[arg(short, long, default_value = "params.yaml", env = "SENTIMENT_PARAMS")]
    pub params: PathBuf,

    /// Directory holding one sub-directory per Run
    #[arg(long, default_value = DEFAULT_ARTIFACT_DIR, env = "SENTIMENT_ARTIFACT_DIR")]
    pub artifact_dir: PathBuf,

    /// Root of the directory-backed object store
    #[arg(long, default_value = "storage", env = "SENTIMENT_STORAGE_ROOT")]
    pub storage_root: PathBuf,

    /// Root of the local tracking store and model registry
    #[arg(long, default_value = "tracking", env = "SENTIMENT_TRACKING_DIR")]
    pub tracking_dir: PathBuf,

    /// Upload the trained model to object storage after evaluation
    #[arg(long)]
    pub push: bool,

    /// Resolve configuration and exit without running the pipeline
    #[arg(long)]
    pub dry_run: bool,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "SENTIMENT_METRICS_PORT")]
    pub metrics_port: u16,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to the parameter file to validate
    #[arg(short, long, default_value = "params.yaml", env = "SENTIMENT_PARAMS")]
    pub params: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to the parameter file
    #[arg(short, long, default_value = "params.yaml", env = "SENTIMENT_PARAMS")]
    pub params: PathBuf,

    /// Directory holding one sub-directory per Run
    #[arg(long, default_value = DEFAULT_ARTIFACT_DIR, env = "SENTIMENT_ARTIFACT_DIR")]
    pub artifact_dir: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `promote` command
#[derive(Parser, Debug)]
pub struct PromoteArgs {
    /// Root of the local tracking store and model registry
    #[arg(long, default_value = "tracking", env = "SENTIMENT_TRACKING_DIR")]
    pub tracking_dir: PathBuf,

    /// Registered model name
    #[arg(long, default_value = DEFAULT_MODEL_NAME, env = "SENTIMENT_MODEL_NAME")]
    pub model_name: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `predict` command
#[derive(Parser, Debug)]
pub struct PredictArgs {
    /// Root directory of a finished Run
    #[arg(long)]
    pub run_dir: PathBuf,

    /// Review texts to classify
    #[arg(required = true)]
    pub texts: Vec<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}
