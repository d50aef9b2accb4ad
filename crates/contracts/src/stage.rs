//! Stage trait - the contract every pipeline step satisfies
//!
//! A stage is built from the previous stage's artifact plus its own config,
//! and exposes a single entry point, [`Stage::initiate`].

use std::path::Path;
use std::time::Instant;

use metrics::{counter, histogram};
use tracing::{error, info};

use crate::{PipelineError, StageName};

/// One pipeline step
///
/// Implementors provide [`Stage::execute`]; callers use [`Stage::initiate`],
/// which logs, times and wraps any failure into
/// [`PipelineError::StageExecution`].
pub trait Stage {
    /// Artifact handed to the next stage
    type Artifact;

    /// Stage-internal failure
    type Error: std::error::Error + Send + Sync + 'static;

    /// Stage name (used for logging/metrics)
    fn name(&self) -> StageName;

    /// Do the stage's work.
    ///
    /// Implementation hook, not an entry point. Callers and tests go through
    /// [`Stage::initiate`]; calling this directly skips the stage metrics and
    /// returns failures without the stage name attached.
    fn execute(&self) -> Result<Self::Artifact, Self::Error>;

    /// Run the stage and return its artifact
    ///
    /// # Errors
    /// Any failure of [`Stage::execute`], wrapped with the stage name
    fn initiate(&self) -> Result<Self::Artifact, PipelineError> {
        let stage = self.name();
        let started = Instant::now();
        info!(stage = %stage, "Stage initiated");

        let result = self.execute();
        let elapsed = started.elapsed();
        histogram!("pipeline_stage_duration_seconds", "stage" => stage.as_str())
            .record(elapsed.as_secs_f64());

        match result {
            Ok(artifact) => {
                counter!("pipeline_stage_total", "stage" => stage.as_str(), "status" => "ok")
                    .increment(1);
                info!(
                    stage = %stage,
                    duration_ms = elapsed.as_millis() as u64,
                    "Stage completed"
                );
                Ok(artifact)
            }
            Err(e) => {
                counter!("pipeline_stage_total", "stage" => stage.as_str(), "status" => "failed")
                    .increment(1);
                error!(stage = %stage, error = %e, "Stage failed");
                Err(PipelineError::stage(stage, e))
            }
        }
    }
}

/// Create the parent directory of `path` if missing.
///
/// Succeeds when the directory already exists.
pub fn ensure_parent_dir(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thiserror::Error;

    #[derive(Debug, Error)]
    #[error("delegate exploded")]
    struct Boom;

    struct Failing;

    impl Stage for Failing {
        type Artifact = ();
        type Error = Boom;

        fn name(&self) -> StageName {
            StageName::Training
        }

        fn execute(&self) -> Result<(), Boom> {
            Err(Boom)
        }
    }

    struct Passing;

    impl Stage for Passing {
        type Artifact = u32;
        type Error = Boom;

        fn name(&self) -> StageName {
            StageName::Ingestion
        }

        fn execute(&self) -> Result<u32, Boom> {
            Ok(7)
        }
    }

    #[test]
    fn test_initiate_wraps_failure_with_stage() {
        let err = Failing.initiate().unwrap_err();
        match err {
            PipelineError::StageExecution { stage, source } => {
                assert_eq!(stage, StageName::Training);
                assert_eq!(source.to_string(), "delegate exploded");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_initiate_passes_artifact_through() {
        assert_eq!(Passing.initiate().unwrap(), 7);
    }

    #[test]
    fn test_ensure_parent_dir_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a").join("b").join("out.csv");
        ensure_parent_dir(&file).unwrap();
        ensure_parent_dir(&file).unwrap();
        assert!(file.parent().unwrap().is_dir());
    }

    #[test]
    fn test_ensure_parent_dir_bare_file_name() {
        assert!(ensure_parent_dir(Path::new("out.csv")).is_ok());
    }
}
