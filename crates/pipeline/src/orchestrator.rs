//! Pipeline orchestrator - runs the stages of one Run in order.
//!
//! Every stage is built from the previous stage's artifact and its slice of
//! the resolved [`PipelineConfig`], then invoked through `initiate()`. The
//! first failure stops the Run; files written so far stay on disk.

use std::time::Instant;

use contracts::{
    EvaluationArtifact, EvaluationMetrics, ExperimentInfo, ExperimentTracker,
    FeatureEngineeringArtifact, IngestionArtifact, ModelRegistry, ObjectStore, PipelineConfig,
    PipelineError, PusherArtifact, Stage, StageName, TrainerArtifact, TransformationArtifact,
};
use observability::{record_evaluation_metrics, record_run_outcome, RunOutcome};
use serde::Serialize;
use stages::{
    EvaluationStage, FeatureEngineeringStage, IngestionStage, PusherStage, TrainingStage,
    TransformationStage,
};
use tracing::{error, info, warn};

use crate::{PipelineStats, RunState};

/// External services a Run talks to
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    pub store: &'a dyn ObjectStore,
    pub tracker: &'a dyn ExperimentTracker,
    pub registry: &'a dyn ModelRegistry,
}

/// Optional behaviour of a Run
#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineOptions {
    /// Upload the trained model after Evaluation
    pub push: bool,
}

/// Artifacts of every stage that ran
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineArtifacts {
    pub ingestion: IngestionArtifact,
    pub transformation: TransformationArtifact,
    pub feature_engineering: FeatureEngineeringArtifact,
    pub trainer: TrainerArtifact,
    pub evaluation: EvaluationArtifact,
    pub pusher: Option<PusherArtifact>,
}

/// Result of a successful Run
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub state: RunState,
    pub artifacts: PipelineArtifacts,
    pub stats: PipelineStats,
}

/// Main pipeline orchestrator
pub struct TrainingPipeline<'a> {
    config: PipelineConfig,
    collaborators: Collaborators<'a>,
    options: PipelineOptions,
    state: RunState,
    stats: PipelineStats,
}

impl<'a> TrainingPipeline<'a> {
    pub fn new(
        config: PipelineConfig,
        collaborators: Collaborators<'a>,
        options: PipelineOptions,
    ) -> Self {
        let stats = PipelineStats::new(&config.run.id);
        Self {
            config,
            collaborators,
            options,
            state: RunState::Pending,
            stats,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Statistics collected so far, including those of a failed Run
    pub fn stats(&self) -> &PipelineStats {
        &self.stats
    }

    /// Run the pipeline to completion
    ///
    /// # Errors
    /// The first stage failure, unchanged. The state is then `Failed(stage)`.
    pub fn run(&mut self) -> Result<PipelineOutcome, PipelineError> {
        let started = Instant::now();
        info!(
            run_id = %self.config.run.id,
            root = %self.config.run.root.display(),
            push = self.options.push,
            "Pipeline started"
        );

        let result = self.run_stages();
        self.stats.duration = started.elapsed();

        match result {
            Ok(artifacts) => {
                self.transition(RunState::Done);
                record_run_outcome(RunOutcome::Succeeded);
                info!(
                    run_id = %self.config.run.id,
                    duration_ms = self.stats.duration.as_millis() as u64,
                    "Pipeline completed"
                );
                Ok(PipelineOutcome {
                    state: self.state,
                    artifacts,
                    stats: self.stats.clone(),
                })
            }
            Err(e) => {
                let stage = e
                    .failed_stage()
                    .or_else(|| self.state.stage())
                    .unwrap_or(StageName::Ingestion);
                self.transition(RunState::Failed(stage));
                record_run_outcome(RunOutcome::Failed);
                error!(run_id = %self.config.run.id, stage = %stage, error = %e, "Pipeline failed");
                Err(e)
            }
        }
    }

    fn run_stages(&mut self) -> Result<PipelineArtifacts, PipelineError> {
        let cfg = self.config.clone();
        let c = self.collaborators;

        let ingestion = self.timed(StageName::Ingestion, || {
            IngestionStage::with_config(c.store, cfg.ingestion.clone()).initiate()
        })?;

        let transformation = self.timed(StageName::Transformation, || {
            TransformationStage::with_config(ingestion.clone(), cfg.transformation.clone())
                .initiate()
        })?;

        let feature_engineering = self.timed(StageName::FeatureEngineering, || {
            FeatureEngineeringStage::with_config(
                transformation.clone(),
                cfg.feature_engineering.clone(),
            )
            .initiate()
        })?;

        let trainer = self.timed(StageName::Training, || {
            TrainingStage::with_config(feature_engineering.clone(), cfg.trainer.clone())
                .initiate()
        })?;

        let evaluation = self.timed(StageName::Evaluation, || {
            EvaluationStage::with_config(
                trainer.clone(),
                feature_engineering.clone(),
                c.tracker,
                c.registry,
                cfg.evaluation.clone(),
            )
            .initiate()
        })?;
        self.collect_evaluation(&evaluation);

        let pusher = if self.options.push {
            Some(self.timed(StageName::Pusher, || {
                PusherStage::with_config(trainer.clone(), c.store, cfg.pusher.clone()).initiate()
            })?)
        } else {
            None
        };

        Ok(PipelineArtifacts {
            ingestion,
            transformation,
            feature_engineering,
            trainer,
            evaluation,
            pusher,
        })
    }

    fn timed<T>(
        &mut self,
        stage: StageName,
        f: impl FnOnce() -> Result<T, PipelineError>,
    ) -> Result<T, PipelineError> {
        self.transition(RunState::running(stage));
        let started = Instant::now();
        let result = f();
        self.stats.record_stage(stage, started.elapsed());
        result
    }

    fn transition(&mut self, next: RunState) {
        info!(from = %self.state, to = %next, "Run state changed");
        self.state = next;
    }

    /// Read back the evaluation reports for stats and gauges
    fn collect_evaluation(&mut self, artifact: &EvaluationArtifact) {
        match read_json::<EvaluationMetrics>(&artifact.metrics_file_path) {
            Ok(metrics) => {
                record_evaluation_metrics(&metrics);
                self.stats.metrics = Some(metrics);
            }
            Err(e) => warn!(error = %e, "Could not read evaluation metrics"),
        }
        match read_json::<ExperimentInfo>(&artifact.experiment_info_file_path) {
            Ok(info) => self.stats.registered_version = info.registered_version,
            Err(e) => warn!(error = %e, "Could not read experiment info"),
        }
    }
}

fn read_json<T: serde::de::DeserializeOwned>(
    path: &std::path::Path,
) -> Result<T, PipelineError> {
    let text = std::fs::read_to_string(path)?;
    serde_json::from_str(&text).map_err(|e| PipelineError::Io(e.into()))
}
