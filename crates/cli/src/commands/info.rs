//! `info` command implementation.

use anyhow::{Context, Result};
use config_loader::{ConfigResolver, PipelineConfig};
use tracing::info;

use crate::cli::InfoArgs;
use crate::error::CliError;

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(params = %args.params.display(), "Loading configuration info");

    if !args.params.exists() {
        return Err(CliError::params_not_found(&args.params).into());
    }

    let config = ConfigResolver::resolve(&args.params, &args.artifact_dir)
        .with_context(|| format!("Failed to resolve config from {}", args.params.display()))?;

    if args.json {
        let json =
            serde_json::to_string_pretty(&config).context("Failed to serialize config info")?;
        println!("{}", json);
    } else {
        print_layout(&config);
    }

    Ok(())
}

/// Human-readable layout of a resolved Run
pub(crate) fn print_layout(config: &PipelineConfig) {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║               Sentiment Pipeline Run Layout                  ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("📍 Run");
    println!("   ├─ Id: {}", config.run.id);
    println!("   └─ Root: {}", config.run.root.display());

    let outputs = config.declared_outputs();
    println!("\n📂 Outputs ({})", outputs.len());
    for (i, (stage, path)) in outputs.iter().enumerate() {
        let prefix = if i == outputs.len() - 1 { "└─" } else { "├─" };
        println!("   {} {:<20} {}", prefix, stage.as_str(), path.display());
    }

    let params = &config.params;
    println!("\n⚙️  Parameters");
    println!("   ├─ Test size: {}", params.data_transformation.test_size);
    println!("   ├─ Max features: {}", params.feature_engineering.max_features);
    if params.model_params.is_empty() {
        println!("   └─ Model params: defaults");
    } else {
        println!("   └─ Model params:");
        for (key, value) in &params.model_params {
            println!("        {key} = {value}");
        }
    }

    println!("\n☁️  Storage");
    println!(
        "   ├─ Dataset: {}/{}",
        config.ingestion.container, config.ingestion.blob_data_path
    );
    println!(
        "   └─ Model push: {}/{}",
        config.pusher.container, config.pusher.model_blob_file_path
    );

    println!("\n🏷  Registry");
    println!("   ├─ Experiment: {}", config.evaluation.experiment_name);
    println!("   ├─ Model: {}", config.evaluation.model_name);
    println!("   └─ Alias: {}", config.evaluation.model_alias);

    println!();
}
