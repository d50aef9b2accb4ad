//! Run state machine

use std::fmt;

use contracts::StageName;
use serde::Serialize;

/// Where a pipeline run currently is.
///
/// `Pending -> Ingesting -> Transforming -> FeatureEngineering -> Training
/// -> Evaluating [-> Pushing] -> Done`, or `Failed(stage)` from any
/// stage state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Pending,
    Ingesting,
    Transforming,
    FeatureEngineering,
    Training,
    Evaluating,
    Pushing,
    Done,
    Failed(StageName),
}

impl RunState {
    /// State entered while `stage` runs
    pub fn running(stage: StageName) -> Self {
        match stage {
            StageName::Ingestion => Self::Ingesting,
            StageName::Transformation => Self::Transforming,
            StageName::FeatureEngineering => Self::FeatureEngineering,
            StageName::Training => Self::Training,
            StageName::Evaluation => Self::Evaluating,
            StageName::Pusher => Self::Pushing,
        }
    }

    /// Stage running in this state
    pub fn stage(&self) -> Option<StageName> {
        match self {
            Self::Ingesting => Some(StageName::Ingestion),
            Self::Transforming => Some(StageName::Transformation),
            Self::FeatureEngineering => Some(StageName::FeatureEngineering),
            Self::Training => Some(StageName::Training),
            Self::Evaluating => Some(StageName::Evaluation),
            Self::Pushing => Some(StageName::Pusher),
            Self::Pending | Self::Done | Self::Failed(_) => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed(_))
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => f.write_str("pending"),
            Self::Ingesting => f.write_str("ingesting"),
            Self::Transforming => f.write_str("transforming"),
            Self::FeatureEngineering => f.write_str("feature_engineering"),
            Self::Training => f.write_str("training"),
            Self::Evaluating => f.write_str("evaluating"),
            Self::Pushing => f.write_str("pushing"),
            Self::Done => f.write_str("done"),
            Self::Failed(stage) => write!(f, "failed({stage})"),
        }
    }
}
