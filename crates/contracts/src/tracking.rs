//! Experiment tracker and model registry collaborators
//!
//! Reads are assumed idempotent and writes best-effort. Alias lookups fail
//! with [`PipelineError::RegistryLookupMiss`] when no version holds the alias,
//! which callers treat as an expected condition.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::PipelineError;

/// Terminal status of a tracker run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Running,
    Finished,
    Failed,
}

/// A registered model version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelVersion {
    pub name: String,
    pub version: u64,
    /// Source URI the version was registered from
    pub source: String,
    /// Tracker run that produced it, when known
    pub run_id: Option<String>,
}

/// Experiment tracking collaborator
pub trait ExperimentTracker: Send + Sync {
    /// Open a run under `experiment` and return its id
    fn start_run(&self, experiment: &str) -> Result<String, PipelineError>;

    fn log_metric(&self, run_id: &str, name: &str, value: f64) -> Result<(), PipelineError>;

    fn log_param(&self, run_id: &str, name: &str, value: &str) -> Result<(), PipelineError>;

    /// Attach a local file to the run, under `artifact_path` when given
    fn log_artifact(
        &self,
        run_id: &str,
        local_path: &Path,
        artifact_path: Option<&str>,
    ) -> Result<(), PipelineError>;

    /// Close the run
    fn end_run(&self, run_id: &str, status: RunStatus) -> Result<(), PipelineError>;
}

/// Model registry collaborator
pub trait ModelRegistry: Send + Sync {
    /// Register `model_uri` as a new version of `name`
    fn register_model(&self, model_uri: &str, name: &str) -> Result<ModelVersion, PipelineError>;

    /// Version currently holding `alias`
    ///
    /// # Errors
    /// [`PipelineError::RegistryLookupMiss`] when no version holds it
    fn get_version_by_alias(&self, name: &str, alias: &str)
        -> Result<ModelVersion, PipelineError>;

    /// Point `alias` at `version`, moving it off any other version
    fn set_alias(&self, name: &str, version: u64, alias: &str) -> Result<(), PipelineError>;
}

/// URI of an artifact logged inside a tracker run
pub fn run_artifact_uri(run_id: &str, artifact_path: &str) -> String {
    format!("runs:/{run_id}/{artifact_path}")
}

/// Scoped tracker run
///
/// Ends the run exactly once: [`RunScope::finish`] closes it as finished;
/// dropping the scope without finishing closes it as failed.
pub struct RunScope<'a> {
    tracker: &'a dyn ExperimentTracker,
    run_id: String,
    ended: bool,
}

impl<'a> RunScope<'a> {
    /// Open a run under `experiment`
    pub fn start(
        tracker: &'a dyn ExperimentTracker,
        experiment: &str,
    ) -> Result<Self, PipelineError> {
        let run_id = tracker.start_run(experiment)?;
        Ok(Self {
            tracker,
            run_id,
            ended: false,
        })
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn log_metric(&self, name: &str, value: f64) -> Result<(), PipelineError> {
        self.tracker.log_metric(&self.run_id, name, value)
    }

    pub fn log_param(&self, name: &str, value: &str) -> Result<(), PipelineError> {
        self.tracker.log_param(&self.run_id, name, value)
    }

    pub fn log_artifact(
        &self,
        local_path: &Path,
        artifact_path: Option<&str>,
    ) -> Result<(), PipelineError> {
        self.tracker
            .log_artifact(&self.run_id, local_path, artifact_path)
    }

    /// Close the run as finished
    pub fn finish(mut self) -> Result<(), PipelineError> {
        self.ended = true;
        self.tracker.end_run(&self.run_id, RunStatus::Finished)
    }
}

impl Drop for RunScope<'_> {
    fn drop(&mut self) {
        if self.ended {
            return;
        }
        self.ended = true;
        if let Err(e) = self.tracker.end_run(&self.run_id, RunStatus::Failed) {
            warn!(run_id = %self.run_id, error = %e, "Failed to close tracker run");
        }
    }
}
