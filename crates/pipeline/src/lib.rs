//! # Pipeline
//!
//! Runs the stages in order against one resolved [`contracts::PipelineConfig`]
//! and loads a finished Run back for inference.

mod orchestrator;
mod predictor;
mod state;
mod stats;

pub use orchestrator::{
    Collaborators, PipelineArtifacts, PipelineOptions, PipelineOutcome, TrainingPipeline,
};
pub use predictor::{PredictError, Prediction, Predictor};
pub use state::RunState;
pub use stats::PipelineStats;
