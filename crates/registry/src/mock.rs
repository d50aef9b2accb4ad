//! Mock tracker + registry
//!
//! In-memory implementation for tests. Records every call in order and
//! supports injecting failures.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use contracts::{ExperimentTracker, ModelRegistry, ModelVersion, PipelineError, RunStatus};

/// Failure injection settings
#[derive(Debug, Default, Clone)]
pub struct MockConfig {
    pub fail_start_run: bool,
    /// Metric names whose logging fails
    pub fail_metrics: Vec<String>,
    pub fail_register: bool,
    /// Aliases whose lookup fails with a non-miss error
    pub fail_lookup_aliases: Vec<String>,
    /// Aliases whose assignment fails
    pub fail_set_aliases: Vec<String>,
}

#[derive(Debug, Default)]
struct MockState {
    calls: Vec<String>,
    next_run: u32,
    runs: BTreeMap<String, RunStatus>,
    metrics: BTreeMap<String, f64>,
    params: BTreeMap<String, String>,
    artifacts: Vec<String>,
    versions: BTreeMap<String, Vec<ModelVersion>>,
    aliases: BTreeMap<(String, String), u64>,
}

/// In-memory experiment tracker and model registry
#[derive(Debug, Default)]
pub struct MockRegistry {
    config: MockConfig,
    state: Mutex<MockState>,
}

impl MockRegistry {
    pub fn new() -> Self {
        Self::with_config(MockConfig::default())
    }

    pub fn with_config(config: MockConfig) -> Self {
        Self {
            config,
            state: Mutex::new(MockState::default()),
        }
    }

    /// Calls received so far, e.g. `log_metric:accuracy`, `end_run:finished`
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    pub fn metrics(&self) -> BTreeMap<String, f64> {
        self.lock().metrics.clone()
    }

    pub fn params(&self) -> BTreeMap<String, String> {
        self.lock().params.clone()
    }

    /// Logged artifacts as `<artifact_path>/<file name>`
    pub fn artifacts(&self) -> Vec<String> {
        self.lock().artifacts.clone()
    }

    pub fn run_status(&self, run_id: &str) -> Option<RunStatus> {
        self.lock().runs.get(run_id).copied()
    }

    /// Version currently holding `alias`, if any
    pub fn alias(&self, name: &str, alias: &str) -> Option<u64> {
        self.lock()
            .aliases
            .get(&(name.to_string(), alias.to_string()))
            .copied()
    }

    /// Seed a registered version
    pub fn add_version(&self, name: &str, source: &str) -> ModelVersion {
        let mut state = self.lock();
        let versions = state.versions.entry(name.to_string()).or_default();
        let version = ModelVersion {
            name: name.to_string(),
            version: versions.len() as u64 + 1,
            source: source.to_string(),
            run_id: None,
        };
        versions.push(version.clone());
        version
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, call: impl Into<String>) {
        self.lock().calls.push(call.into());
    }
}

impl ExperimentTracker for MockRegistry {
    fn start_run(&self, _experiment: &str) -> Result<String, PipelineError> {
        if self.config.fail_start_run {
            return Err(PipelineError::registry("mock failure: start_run"));
        }
        let mut state = self.lock();
        state.next_run += 1;
        let run_id = format!("mock-run-{}", state.next_run);
        state.runs.insert(run_id.clone(), RunStatus::Running);
        state.calls.push("start_run".to_string());
        Ok(run_id)
    }

    fn log_metric(&self, _run_id: &str, name: &str, value: f64) -> Result<(), PipelineError> {
        self.record(format!("log_metric:{name}"));
        if self.config.fail_metrics.iter().any(|m| m == name) {
            return Err(PipelineError::registry(format!("mock failure: log_metric {name}")));
        }
        self.lock().metrics.insert(name.to_string(), value);
        Ok(())
    }

    fn log_param(&self, _run_id: &str, name: &str, value: &str) -> Result<(), PipelineError> {
        self.record(format!("log_param:{name}"));
        self.lock()
            .params
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn log_artifact(
        &self,
        _run_id: &str,
        local_path: &Path,
        artifact_path: Option<&str>,
    ) -> Result<(), PipelineError> {
        let file_name = local_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let logged = match artifact_path {
            Some(dir) => format!("{dir}/{file_name}"),
            None => file_name,
        };
        self.record(format!("log_artifact:{logged}"));
        self.lock().artifacts.push(logged);
        Ok(())
    }

    fn end_run(&self, run_id: &str, status: RunStatus) -> Result<(), PipelineError> {
        let label = match status {
            RunStatus::Running => "running",
            RunStatus::Finished => "finished",
            RunStatus::Failed => "failed",
        };
        self.record(format!("end_run:{label}"));
        self.lock().runs.insert(run_id.to_string(), status);
        Ok(())
    }
}

impl ModelRegistry for MockRegistry {
    fn register_model(&self, model_uri: &str, name: &str) -> Result<ModelVersion, PipelineError> {
        self.record("register_model");
        if self.config.fail_register {
            return Err(PipelineError::registry("mock failure: register_model"));
        }
        Ok(self.add_version(name, model_uri))
    }

    fn get_version_by_alias(&self, name: &str, alias: &str) -> Result<ModelVersion, PipelineError> {
        self.record(format!("get_version_by_alias:{alias}"));
        if self.config.fail_lookup_aliases.iter().any(|a| a == alias) {
            return Err(PipelineError::registry(format!("mock failure: lookup {alias}")));
        }
        let state = self.lock();
        state
            .aliases
            .get(&(name.to_string(), alias.to_string()))
            .and_then(|version| {
                state
                    .versions
                    .get(name)?
                    .iter()
                    .find(|v| v.version == *version)
                    .cloned()
            })
            .ok_or_else(|| PipelineError::lookup_miss(name, alias))
    }

    fn set_alias(&self, name: &str, version: u64, alias: &str) -> Result<(), PipelineError> {
        self.record(format!("set_alias:{alias}"));
        if self.config.fail_set_aliases.iter().any(|a| a == alias) {
            return Err(PipelineError::registry(format!("mock failure: set_alias {alias}")));
        }
        let mut state = self.lock();
        let known = state
            .versions
            .get(name)
            .is_some_and(|vs| vs.iter().any(|v| v.version == version));
        if !known {
            return Err(PipelineError::registry(format!(
                "model '{name}' has no version {version}"
            )));
        }
        state
            .aliases
            .insert((name.to_string(), alias.to_string()), version);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calls_recorded_in_order() {
        let mock = MockRegistry::new();
        let run_id = mock.start_run("exp").unwrap();
        mock.log_metric(&run_id, "accuracy", 1.0).unwrap();
        mock.end_run(&run_id, RunStatus::Finished).unwrap();
        assert_eq!(
            mock.calls(),
            vec!["start_run", "log_metric:accuracy", "end_run:finished"]
        );
        assert_eq!(mock.run_status(&run_id), Some(RunStatus::Finished));
    }

    #[test]
    fn test_alias_roundtrip() {
        let mock = MockRegistry::new();
        let v = mock.add_version("m", "runs:/x/model");
        mock.set_alias("m", v.version, "challenger").unwrap();
        assert_eq!(mock.get_version_by_alias("m", "challenger").unwrap(), v);
        assert!(mock
            .get_version_by_alias("m", "alpha")
            .unwrap_err()
            .is_lookup_miss());
    }

    #[test]
    fn test_injected_register_failure() {
        let mock = MockRegistry::with_config(MockConfig {
            fail_register: true,
            ..Default::default()
        });
        assert!(mock.register_model("runs:/x/model", "m").is_err());
    }
}
