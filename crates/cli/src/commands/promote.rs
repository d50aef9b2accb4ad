//! `promote` command implementation.

use anyhow::{Context, Result};
use contracts::constants::{ALPHA_ALIAS, VETERAN_ALIAS};
use registry::{promote_challenger, LocalTracker};
use tracing::info;

use crate::cli::PromoteArgs;

/// Execute the `promote` command
pub fn run_promote(args: &PromoteArgs) -> Result<()> {
    info!(
        tracking_dir = %args.tracking_dir.display(),
        model = %args.model_name,
        "Promoting challenger"
    );

    let registry = LocalTracker::open(&args.tracking_dir).with_context(|| {
        format!(
            "Failed to open tracking store at {}",
            args.tracking_dir.display()
        )
    })?;

    let outcome = promote_challenger(&registry, &args.model_name)
        .with_context(|| format!("Failed to promote model '{}'", args.model_name))?;

    if args.json {
        let json = serde_json::to_string_pretty(&outcome)
            .context("Failed to serialize promotion outcome")?;
        println!("{}", json);
    } else {
        println!(
            "✓ {} v{} is now {}",
            outcome.promoted.name, outcome.promoted.version, ALPHA_ALIAS
        );
        match &outcome.demoted {
            Some(old) => println!("  {} v{} is now {}", old.name, old.version, VETERAN_ALIAS),
            None => println!("  No previous {} version", ALPHA_ALIAS),
        }
    }

    Ok(())
}
