//! Pipeline-level metrics
//!
//! Stage timings and counts are recorded by `Stage::initiate`; this module
//! covers what only the orchestrator knows.

use contracts::EvaluationMetrics;
use metrics::{counter, gauge};

/// Terminal status of a pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Succeeded,
    Failed,
}

impl RunOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        }
    }
}

/// Count one finished run
pub fn record_run_outcome(outcome: RunOutcome) {
    counter!("pipeline_runs_total", "status" => outcome.as_str()).increment(1);
}

/// Publish the latest evaluation metrics as gauges
pub fn record_evaluation_metrics(metrics: &EvaluationMetrics) {
    for (name, value) in metrics.entries() {
        gauge!("pipeline_evaluation_metric", "name" => name).set(value);
    }
}
