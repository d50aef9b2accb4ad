//! # Registry
//!
//! Experiment tracker and model registry collaborators, plus the model
//! promotion operation.
//!
//! - [`LocalTracker`]: file-backed tracking store under a directory
//! - [`MockRegistry`]: in-memory tracker + registry with failure injection
//! - [`promote_challenger`]: challenger -> alpha, alpha -> veteran

mod error;
mod local;
mod mock;
mod promotion;

pub use error::RegistryError;
pub use local::{LocalTracker, TRACKING_FILE};
pub use mock::{MockConfig, MockRegistry};
pub use promotion::{promote_challenger, PromotionOutcome};
