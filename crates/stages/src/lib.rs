//! # Stages
//!
//! The concrete pipeline steps. Each one is built from the previous stage's
//! artifact, its own config and the collaborators it needs, and implements
//! [`contracts::Stage`].
//!
//! | Stage | Consumes | Produces |
//! |---|---|---|
//! | [`IngestionStage`] | object store | raw CSV |
//! | [`TransformationStage`] | raw CSV | normalized train/test CSV |
//! | [`FeatureEngineeringStage`] | train/test CSV | count matrices + vectorizer |
//! | [`TrainingStage`] | featured train CSV | model file |
//! | [`EvaluationStage`] | model + featured test CSV | metrics + experiment info |
//! | [`PusherStage`] | model file | remote blob |

mod error;
mod evaluation;
mod feature_engineering;
mod ingestion;
pub mod io;
mod pusher;
mod training;
mod transformation;

pub use error::StageError;
pub use evaluation::EvaluationStage;
pub use feature_engineering::FeatureEngineeringStage;
pub use ingestion::IngestionStage;
pub use pusher::PusherStage;
pub use training::TrainingStage;
pub use transformation::TransformationStage;
