//! LocalTracker - file-backed tracking store
//!
//! Layout under the tracking directory:
//! - `tracking.json`: runs, metrics, params, model versions and aliases
//! - `runs/<run_id>/artifacts/...`: copies of logged artifacts

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use contracts::{ExperimentTracker, ModelRegistry, ModelVersion, PipelineError, RunStatus};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::error::{RegistryError, Result};

/// Name of the store file inside the tracking directory
pub const TRACKING_FILE: &str = "tracking.json";

/// One tracked run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub run_id: String,
    pub experiment: String,
    pub status: RunStatus,
    pub started_at: String,
    pub ended_at: Option<String>,
    pub metrics: BTreeMap<String, f64>,
    pub params: BTreeMap<String, String>,
    /// Artifact paths relative to the run's artifact directory
    pub artifacts: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RegisteredModel {
    versions: Vec<ModelVersion>,
    /// alias -> version
    aliases: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct TrackingState {
    runs: BTreeMap<String, RunRecord>,
    models: BTreeMap<String, RegisteredModel>,
}

impl TrackingState {
    fn live_run(&mut self, run_id: &str) -> Result<&mut RunRecord> {
        let run = self
            .runs
            .get_mut(run_id)
            .ok_or_else(|| RegistryError::UnknownRun(run_id.to_string()))?;
        if run.status != RunStatus::Running {
            return Err(RegistryError::RunEnded(run_id.to_string()));
        }
        Ok(run)
    }
}

/// File-backed experiment tracker and model registry
///
/// Every mutation is written through to `tracking.json` before returning.
pub struct LocalTracker {
    root: PathBuf,
    state: Mutex<TrackingState>,
}

impl LocalTracker {
    /// Open (or create) the store under `root`
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| RegistryError::io(&root, e))?;

        let file = root.join(TRACKING_FILE);
        let state = if file.exists() {
            let content = fs::read_to_string(&file).map_err(|e| RegistryError::io(&file, e))?;
            serde_json::from_str(&content)?
        } else {
            TrackingState::default()
        };
        debug!(root = %root.display(), runs = state.runs.len(), "Tracking store opened");

        Ok(Self {
            root,
            state: Mutex::new(state),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Snapshot of a run
    pub fn run(&self, run_id: &str) -> Option<RunRecord> {
        self.lock().runs.get(run_id).cloned()
    }

    /// All versions of a model, oldest first
    pub fn versions(&self, name: &str) -> Vec<ModelVersion> {
        self.lock()
            .models
            .get(name)
            .map(|m| m.versions.clone())
            .unwrap_or_default()
    }

    /// Alias assignments of a model
    pub fn aliases(&self, name: &str) -> BTreeMap<String, u64> {
        self.lock()
            .models
            .get(name)
            .map(|m| m.aliases.clone())
            .unwrap_or_default()
    }

    /// Directory holding the artifacts of `run_id`
    pub fn artifact_dir(&self, run_id: &str) -> PathBuf {
        self.root.join("runs").join(run_id).join("artifacts")
    }

    fn lock(&self) -> MutexGuard<'_, TrackingState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply `f` to a copy of the state and keep it once written back
    fn update<T>(&self, f: impl FnOnce(&mut TrackingState) -> Result<T>) -> Result<T> {
        let mut state = self.lock();
        let mut next = state.clone();
        let out = f(&mut next)?;
        self.persist(&next)?;
        *state = next;
        Ok(out)
    }

    fn persist(&self, state: &TrackingState) -> Result<()> {
        let file = self.root.join(TRACKING_FILE);
        let tmp = file.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(state)?;
        fs::write(&tmp, content).map_err(|e| RegistryError::io(&tmp, e))?;
        fs::rename(&tmp, &file).map_err(|e| RegistryError::io(&file, e))?;
        Ok(())
    }

    fn copy_artifact(
        &self,
        run_id: &str,
        local_path: &Path,
        artifact_path: Option<&str>,
    ) -> Result<String> {
        let file_name = local_path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                RegistryError::io(
                    local_path,
                    std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no file name"),
                )
            })?;
        let relative = match artifact_path {
            Some(dir) => format!("{}/{file_name}", dir.trim_end_matches('/')),
            None => file_name.to_string(),
        };
        let dest = self.artifact_dir(run_id).join(&relative);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(|e| RegistryError::io(parent, e))?;
        }
        fs::copy(local_path, &dest).map_err(|e| RegistryError::io(local_path, e))?;
        Ok(relative)
    }
}

/// Run id from a `runs:/<run_id>/<path>` URI
fn run_id_of(model_uri: &str) -> Option<String> {
    model_uri
        .strip_prefix("runs:/")
        .and_then(|rest| rest.split('/').next())
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

impl ExperimentTracker for LocalTracker {
    #[instrument(name = "local_tracker_start_run", skip(self))]
    fn start_run(&self, experiment: &str) -> std::result::Result<String, PipelineError> {
        let run_id = self.update(|state| {
            let run_id = format!(
                "{}-{:04}",
                Utc::now().format("%Y%m%d%H%M%S"),
                state.runs.len() + 1
            );
            state.runs.insert(
                run_id.clone(),
                RunRecord {
                    run_id: run_id.clone(),
                    experiment: experiment.to_string(),
                    status: RunStatus::Running,
                    started_at: Utc::now().to_rfc3339(),
                    ended_at: None,
                    metrics: BTreeMap::new(),
                    params: BTreeMap::new(),
                    artifacts: Vec::new(),
                },
            );
            Ok(run_id)
        })?;
        info!(run_id = %run_id, "Tracker run started");
        Ok(run_id)
    }

    fn log_metric(
        &self,
        run_id: &str,
        name: &str,
        value: f64,
    ) -> std::result::Result<(), PipelineError> {
        self.update(|state| {
            state.live_run(run_id)?.metrics.insert(name.to_string(), value);
            Ok(())
        })?;
        debug!(run_id, metric = name, value, "Metric logged");
        Ok(())
    }

    fn log_param(
        &self,
        run_id: &str,
        name: &str,
        value: &str,
    ) -> std::result::Result<(), PipelineError> {
        self.update(|state| {
            state
                .live_run(run_id)?
                .params
                .insert(name.to_string(), value.to_string());
            Ok(())
        })?;
        debug!(run_id, param = name, value, "Param logged");
        Ok(())
    }

    #[instrument(
        name = "local_tracker_log_artifact",
        skip(self, local_path),
        fields(local = %local_path.display())
    )]
    fn log_artifact(
        &self,
        run_id: &str,
        local_path: &Path,
        artifact_path: Option<&str>,
    ) -> std::result::Result<(), PipelineError> {
        self.update(|state| {
            let run = state.live_run(run_id)?;
            let relative = self.copy_artifact(run_id, local_path, artifact_path)?;
            run.artifacts.push(relative);
            Ok(())
        })?;
        Ok(())
    }

    #[instrument(name = "local_tracker_end_run", skip(self))]
    fn end_run(&self, run_id: &str, status: RunStatus) -> std::result::Result<(), PipelineError> {
        self.update(|state| {
            let run = state.live_run(run_id)?;
            run.status = status;
            run.ended_at = Some(Utc::now().to_rfc3339());
            Ok(())
        })?;
        info!(run_id, ?status, "Tracker run ended");
        Ok(())
    }
}

impl ModelRegistry for LocalTracker {
    #[instrument(name = "local_registry_register", skip(self))]
    fn register_model(
        &self,
        model_uri: &str,
        name: &str,
    ) -> std::result::Result<ModelVersion, PipelineError> {
        let version = self.update(|state| {
            let model = state.models.entry(name.to_string()).or_default();
            let version = ModelVersion {
                name: name.to_string(),
                version: model.versions.len() as u64 + 1,
                source: model_uri.to_string(),
                run_id: run_id_of(model_uri),
            };
            model.versions.push(version.clone());
            Ok(version)
        })?;
        info!(model = name, version = version.version, "Model version registered");
        Ok(version)
    }

    fn get_version_by_alias(
        &self,
        name: &str,
        alias: &str,
    ) -> std::result::Result<ModelVersion, PipelineError> {
        let state = self.lock();
        state
            .models
            .get(name)
            .and_then(|m| {
                let version = *m.aliases.get(alias)?;
                m.versions.iter().find(|v| v.version == version).cloned()
            })
            .ok_or_else(|| {
                RegistryError::AliasNotFound {
                    name: name.to_string(),
                    alias: alias.to_string(),
                }
                .into()
            })
    }

    #[instrument(name = "local_registry_set_alias", skip(self))]
    fn set_alias(
        &self,
        name: &str,
        version: u64,
        alias: &str,
    ) -> std::result::Result<(), PipelineError> {
        self.update(|state| {
            let model = state
                .models
                .get_mut(name)
                .filter(|m| m.versions.iter().any(|v| v.version == version))
                .ok_or_else(|| RegistryError::UnknownVersion {
                    name: name.to_string(),
                    version,
                })?;
            model.aliases.insert(alias.to_string(), version);
            Ok(())
        })?;
        info!(model = name, version, alias, "Alias assigned");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_lifecycle_is_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let tracker = LocalTracker::open(dir.path()).unwrap();

        let run_id = tracker.start_run("exp").unwrap();
        tracker.log_metric(&run_id, "accuracy", 0.75).unwrap();
        tracker.log_param(&run_id, "C", "1.0").unwrap();
        tracker.end_run(&run_id, RunStatus::Finished).unwrap();

        let reopened = LocalTracker::open(dir.path()).unwrap();
        let run = reopened.run(&run_id).unwrap();
        assert_eq!(run.experiment, "exp");
        assert_eq!(run.status, RunStatus::Finished);
        assert_eq!(run.metrics["accuracy"], 0.75);
        assert_eq!(run.params["C"], "1.0");
        assert!(run.ended_at.is_some());
    }

    #[test]
    fn test_ended_run_rejects_writes() {
        let dir = tempfile::tempdir().unwrap();
        let tracker = LocalTracker::open(dir.path()).unwrap();
        let run_id = tracker.start_run("exp").unwrap();
        tracker.end_run(&run_id, RunStatus::Failed).unwrap();

        assert!(tracker.log_metric(&run_id, "auc", 0.5).is_err());
        assert!(tracker.end_run(&run_id, RunStatus::Finished).is_err());
    }

    #[test]
    fn test_log_artifact_copies_file() {
        let dir = tempfile::tempdir().unwrap();
        let tracker = LocalTracker::open(dir.path().join("mlruns")).unwrap();
        let local = dir.path().join("model.bin");
        fs::write(&local, b"weights").unwrap();

        let run_id = tracker.start_run("exp").unwrap();
        tracker.log_artifact(&run_id, &local, Some("model")).unwrap();

        let copied = tracker.artifact_dir(&run_id).join("model/model.bin");
        assert_eq!(fs::read(copied).unwrap(), b"weights");
        assert_eq!(tracker.run(&run_id).unwrap().artifacts, vec!["model/model.bin"]);
    }

    #[test]
    fn test_register_and_alias() {
        let dir = tempfile::tempdir().unwrap();
        let tracker = LocalTracker::open(dir.path()).unwrap();

        let v1 = tracker.register_model("runs:/abc/model", "m").unwrap();
        let v2 = tracker.register_model("runs:/def/model", "m").unwrap();
        assert_eq!((v1.version, v2.version), (1, 2));
        assert_eq!(v1.run_id.as_deref(), Some("abc"));

        tracker.set_alias("m", 1, "challenger").unwrap();
        tracker.set_alias("m", 2, "challenger").unwrap();
        let holder = tracker.get_version_by_alias("m", "challenger").unwrap();
        assert_eq!(holder.version, 2);
        assert_eq!(tracker.aliases("m").len(), 1);
    }

    #[test]
    fn test_alias_miss_is_lookup_miss() {
        let dir = tempfile::tempdir().unwrap();
        let tracker = LocalTracker::open(dir.path()).unwrap();
        let err = tracker.get_version_by_alias("m", "alpha").unwrap_err();
        assert!(err.is_lookup_miss());
    }

    #[test]
    fn test_set_alias_unknown_version() {
        let dir = tempfile::tempdir().unwrap();
        let tracker = LocalTracker::open(dir.path()).unwrap();
        tracker.register_model("runs:/abc/model", "m").unwrap();
        let err = tracker.set_alias("m", 9, "alpha").unwrap_err();
        assert!(matches!(err, PipelineError::Registry { .. }));
    }

    #[test]
    fn test_corrupt_store_fails_to_open() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(TRACKING_FILE), "{not json").unwrap();
        assert!(matches!(
            LocalTracker::open(dir.path()),
            Err(RegistryError::Corrupt(_))
        ));
    }

    #[test]
    fn test_failed_write_leaves_state_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let tracker = LocalTracker::open(dir.path()).unwrap();
        tracker.register_model("runs:/abc/model", "m").unwrap();

        let store = dir.path().join(TRACKING_FILE);
        fs::remove_file(&store).unwrap();
        fs::create_dir(&store).unwrap();

        assert!(tracker.set_alias("m", 1, "alpha").is_err());
        assert!(tracker
            .get_version_by_alias("m", "alpha")
            .unwrap_err()
            .is_lookup_miss());

        fs::remove_dir(&store).unwrap();
        tracker.register_model("runs:/def/model", "m").unwrap();

        let reopened = LocalTracker::open(dir.path()).unwrap();
        assert!(reopened.aliases("m").is_empty());
        assert_eq!(
            reopened.register_model("runs:/ghi/model", "m").unwrap().version,
            3
        );
    }
}
