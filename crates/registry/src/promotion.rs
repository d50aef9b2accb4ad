//! Model promotion
//!
//! Moves the current production version (alias `alpha`) to `veteran` and
//! points `alpha` at the `challenger`. Runs outside the training pipeline.

use contracts::constants::{ALPHA_ALIAS, CHALLENGER_ALIAS, VETERAN_ALIAS};
use contracts::{ModelRegistry, ModelVersion, PipelineError};
use serde::Serialize;
use tracing::{error, info, warn};

/// Result of a promotion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromotionOutcome {
    /// Version now holding `alpha`
    pub promoted: ModelVersion,
    /// Previous `alpha` holder, now `veteran`
    pub demoted: Option<ModelVersion>,
}

/// Promote the challenger of `model_name` to alpha.
///
/// A missing alpha is treated as "no current production" and only logged.
/// The challenger is promoted even when demoting the old alpha failed; that
/// failure is returned afterwards.
///
/// # Errors
/// - no version holds `challenger`
/// - assigning `alpha` failed
/// - demotion failed for a reason other than a lookup miss
pub fn promote_challenger(
    registry: &dyn ModelRegistry,
    model_name: &str,
) -> Result<PromotionOutcome, PipelineError> {
    let challenger = registry.get_version_by_alias(model_name, CHALLENGER_ALIAS)?;
    info!(
        model = model_name,
        version = challenger.version,
        "Challenger found"
    );

    let (demoted, demotion_error) = match demote_alpha(registry, model_name, &challenger) {
        Ok(demoted) => (demoted, None),
        Err(e) => {
            error!(model = model_name, error = %e, "Demotion of current alpha failed");
            (None, Some(e))
        }
    };

    registry.set_alias(model_name, challenger.version, ALPHA_ALIAS)?;
    info!(
        model = model_name,
        version = challenger.version,
        "Model version promoted to {ALPHA_ALIAS}"
    );

    match demotion_error {
        Some(e) => Err(e),
        None => Ok(PromotionOutcome {
            promoted: challenger,
            demoted,
        }),
    }
}

fn demote_alpha(
    registry: &dyn ModelRegistry,
    model_name: &str,
    challenger: &ModelVersion,
) -> Result<Option<ModelVersion>, PipelineError> {
    let alpha = match registry.get_version_by_alias(model_name, ALPHA_ALIAS) {
        Ok(alpha) => alpha,
        Err(e) if e.is_lookup_miss() => {
            warn!(model = model_name, "No current {ALPHA_ALIAS} version, nothing to demote");
            return Ok(None);
        }
        Err(e) => return Err(e),
    };

    if alpha.version == challenger.version {
        info!(
            model = model_name,
            version = alpha.version,
            "Challenger already holds {ALPHA_ALIAS}"
        );
        return Ok(None);
    }

    registry.set_alias(model_name, alpha.version, VETERAN_ALIAS)?;
    info!(
        model = model_name,
        version = alpha.version,
        "Previous {ALPHA_ALIAS} moved to {VETERAN_ALIAS}"
    );
    Ok(Some(alpha))
}
