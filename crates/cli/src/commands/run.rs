//! `run` command implementation.

use anyhow::{Context, Result};
use config_loader::ConfigResolver;
use pipeline::{Collaborators, PipelineOptions, TrainingPipeline};
use registry::LocalTracker;
use storage::FsObjectStore;
use tracing::{info, warn};

use crate::cli::RunArgs;
use crate::commands::info::print_layout;
use crate::error::CliError;

/// Execute the `run` command
pub fn run_pipeline(args: &RunArgs) -> Result<()> {
    info!(params = %args.params.display(), "Loading parameters");

    if !args.params.exists() {
        return Err(CliError::params_not_found(&args.params).into());
    }

    // Fail fast: nothing runs unless every stage config resolves
    let config = ConfigResolver::resolve(&args.params, &args.artifact_dir)
        .with_context(|| format!("Failed to resolve config from {}", args.params.display()))?;

    if args.dry_run {
        info!("Dry run mode - configuration is valid, exiting");
        print_layout(&config);
        return Ok(());
    }

    if args.metrics_port != 0 {
        observability::init_metrics_only(args.metrics_port)?;
        info!("Metrics endpoint available on port {}", args.metrics_port);
    }

    let store = FsObjectStore::new(&args.storage_root);
    let tracker = LocalTracker::open(&args.tracking_dir).with_context(|| {
        format!(
            "Failed to open tracking store at {}",
            args.tracking_dir.display()
        )
    })?;

    let mut pipeline = TrainingPipeline::new(
        config,
        Collaborators {
            store: &store,
            tracker: &tracker,
            registry: &tracker,
        },
        PipelineOptions { push: args.push },
    );

    info!("Starting pipeline...");
    match pipeline.run() {
        Ok(outcome) => {
            info!(
                state = %outcome.state,
                duration_secs = outcome.stats.duration.as_secs_f64(),
                registered_version = ?outcome.stats.registered_version,
                "Pipeline completed successfully"
            );
            outcome.stats.print_summary();
            Ok(())
        }
        Err(e) => {
            warn!(
                state = %pipeline.state(),
                root = %pipeline.config().run.root.display(),
                "Partial artifacts kept for inspection"
            );
            pipeline.stats().print_summary();
            Err(e).context("Pipeline execution failed")
        }
    }
}
