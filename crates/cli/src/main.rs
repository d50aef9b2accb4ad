//! # Sentiment Pipeline CLI
//!
//! Command-line entry point:
//! - parameter loading and validation
//! - pipeline execution against local storage and tracking
//! - model promotion and inference

mod cli;
mod commands;
mod error;

use anyhow::Result;
use clap::Parser;
use observability::{ObservabilityConfig, ObservabilityGuard};
use tracing::info;

use cli::{Cli, Commands};
use commands::{run_info, run_pipeline, run_predict, run_promote, run_validate};

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let _guard = init_logging(&cli)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Sentiment pipeline CLI starting"
    );

    let result = match &cli.command {
        Commands::Run(args) => run_pipeline(args),
        Commands::Validate(args) => run_validate(args),
        Commands::Info(args) => run_info(args),
        Commands::Promote(args) => run_promote(args),
        Commands::Predict(args) => run_predict(args),
    };

    if let Err(ref e) = result {
        tracing::error!(error = %e, "Command failed");
    }

    result
}

/// Initialize logging based on CLI options
fn init_logging(cli: &Cli) -> Result<ObservabilityGuard> {
    observability::init_with_config(ObservabilityConfig {
        log_format: cli.log_format.into(),
        metrics_port: None,
        default_log_level: cli.log_level().to_string(),
        log_dir: cli.log_dir.clone(),
    })
}
