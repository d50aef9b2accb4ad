//! Run statistics

use std::time::Duration;

use contracts::{EvaluationMetrics, StageName};
use serde::Serialize;

/// Statistics from a pipeline run
#[derive(Debug, Clone, Default, Serialize)]
pub struct PipelineStats {
    /// Run identifier
    pub run_id: String,

    /// Wall time of each stage that ran, in execution order
    pub stage_durations: Vec<(StageName, Duration)>,

    /// Total duration of the run
    pub duration: Duration,

    /// Evaluation metrics, once Evaluation has finished
    pub metrics: Option<EvaluationMetrics>,

    /// Registered model version, when registration succeeded
    pub registered_version: Option<u64>,
}

impl PipelineStats {
    pub fn new(run_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            ..Default::default()
        }
    }

    pub fn record_stage(&mut self, stage: StageName, elapsed: Duration) {
        self.stage_durations.push((stage, elapsed));
    }

    pub fn stage_duration(&self, stage: StageName) -> Option<Duration> {
        self.stage_durations
            .iter()
            .find(|(s, _)| *s == stage)
            .map(|(_, d)| *d)
    }

    /// Stages that ran, in order
    pub fn stages_run(&self) -> Vec<StageName> {
        self.stage_durations.iter().map(|(s, _)| *s).collect()
    }

    /// Print detailed summary
    pub fn print_summary(&self) {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║                    Pipeline Statistics                       ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");

        println!("📊 Overview");
        println!("   ├─ Run: {}", self.run_id);
        println!("   ├─ Duration: {:.2}s", self.duration.as_secs_f64());
        match self.registered_version {
            Some(v) => println!("   └─ Registered version: {v}"),
            None => println!("   └─ Registered version: -"),
        }

        if !self.stage_durations.is_empty() {
            println!("\n⏱  Stages");
            let last = self.stage_durations.len() - 1;
            for (i, (stage, elapsed)) in self.stage_durations.iter().enumerate() {
                let branch = if i == last { "└─" } else { "├─" };
                println!("   {branch} {stage}: {:.3}s", elapsed.as_secs_f64());
            }
        }

        if let Some(m) = &self.metrics {
            println!("\n📈 Evaluation");
            println!("   ├─ Accuracy: {:.4}", m.accuracy);
            println!("   ├─ Precision: {:.4}", m.precision);
            println!("   ├─ Recall: {:.4}", m.recall);
            println!("   └─ AUC: {:.4}", m.auc);
        }

        println!();
    }
}
