//! Run identity and artifact directory layout.
//!
//! Pure path computation, no I/O.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_ARTIFACT_DIR, FEATURE_DIR, INGESTION_DIR, MODEL_DIR, REPORTS_DIR, RUN_ID_FORMAT,
    TRANSFORMATION_DIR,
};

/// Pipeline stages in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageName {
    Ingestion,
    Transformation,
    FeatureEngineering,
    Training,
    Evaluation,
    Pusher,
}

impl StageName {
    /// All stages, in order.
    pub const ALL: [StageName; 6] = [
        StageName::Ingestion,
        StageName::Transformation,
        StageName::FeatureEngineering,
        StageName::Training,
        StageName::Evaluation,
        StageName::Pusher,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ingestion => "ingestion",
            Self::Transformation => "transformation",
            Self::FeatureEngineering => "feature_engineering",
            Self::Training => "training",
            Self::Evaluation => "evaluation",
            Self::Pusher => "pusher",
        }
    }

    /// Sub-directory owned by this stage under the Run root.
    ///
    /// The pusher writes nothing locally.
    pub fn artifact_dir(&self) -> Option<&'static str> {
        match self {
            Self::Ingestion => Some(INGESTION_DIR),
            Self::Transformation => Some(TRANSFORMATION_DIR),
            Self::FeatureEngineering => Some(FEATURE_DIR),
            Self::Training => Some(MODEL_DIR),
            Self::Evaluation => Some(REPORTS_DIR),
            Self::Pusher => None,
        }
    }
}

impl fmt::Display for StageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One execution of the pipeline.
///
/// Created once at orchestrator start and never mutated. The directory it
/// names is never removed by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Run {
    /// Timestamp identifier
    pub id: String,
    /// Artifact root of this Run
    pub root: PathBuf,
}

impl Run {
    /// Start a new Run under `artifact_dir`, identified by the current local time.
    pub fn start(artifact_dir: impl AsRef<Path>) -> Self {
        let id = Local::now().format(RUN_ID_FORMAT).to_string();
        Self::with_id(artifact_dir, id)
    }

    /// Run with an explicit identifier.
    pub fn with_id(artifact_dir: impl AsRef<Path>, id: impl Into<String>) -> Self {
        let id = id.into();
        let root = artifact_dir.as_ref().join(&id);
        Self { id, root }
    }

    /// Layout rooted at this Run.
    pub fn layout(&self) -> ArtifactLayout {
        ArtifactLayout::new(&self.root)
    }
}

/// Deterministic file paths under a Run root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactLayout {
    root: PathBuf,
}

impl ArtifactLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/<stage_dir>/<file_name>`
    pub fn path_for(&self, stage_dir: &str, file_name: &str) -> PathBuf {
        self.root.join(stage_dir).join(file_name)
    }

    /// Path of `file_name` inside the directory owned by `stage`.
    ///
    /// Returns `None` for stages that own no local directory.
    pub fn stage_path(&self, stage: StageName, file_name: &str) -> Option<PathBuf> {
        stage
            .artifact_dir()
            .map(|dir| self.path_for(dir, file_name))
    }
}

impl Default for ArtifactLayout {
    fn default() -> Self {
        Self::new(DEFAULT_ARTIFACT_DIR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_path_for_is_deterministic() {
        let layout = ArtifactLayout::new("/runs/r1");
        assert_eq!(
            layout.path_for("feature", "train.csv"),
            PathBuf::from("/runs/r1/feature/train.csv")
        );
        assert_eq!(
            layout.path_for("feature", "train.csv"),
            ArtifactLayout::new("/runs/r1").path_for("feature", "train.csv")
        );
    }

    #[test]
    fn test_stage_dirs_are_distinct() {
        let dirs: Vec<_> = StageName::ALL
            .iter()
            .filter_map(|s| s.artifact_dir())
            .collect();
        let unique: HashSet<_> = dirs.iter().collect();
        assert_eq!(dirs.len(), unique.len());
        assert_eq!(StageName::Pusher.artifact_dir(), None);
    }

    #[test]
    fn test_run_root_under_artifact_dir() {
        let run = Run::with_id("artifact", "2024-01-01--00-00-00");
        assert_eq!(run.root, PathBuf::from("artifact/2024-01-01--00-00-00"));
        assert_eq!(run.layout().root(), run.root.as_path());
    }

    #[test]
    fn test_run_start_uses_timestamp_id() {
        let run = Run::start("artifact");
        // 2024-01-01--00-00-00
        assert_eq!(run.id.len(), 20);
        assert!(run.root.ends_with(&run.id));
    }

    #[test]
    fn test_stage_name_display() {
        assert_eq!(StageName::FeatureEngineering.to_string(), "feature_engineering");
    }
}
