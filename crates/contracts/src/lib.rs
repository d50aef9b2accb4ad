//! # Contracts
//!
//! Frozen interface contracts for the sentiment training pipeline.
//! Every business crate depends on this crate; reverse dependencies are prohibited.
//!
//! ## Data flow
//! Ingestion -> Transformation -> Feature Engineering -> Training -> Evaluation,
//! with the Pusher consuming the Training artifact independently.
//! Stages hand each other *artifacts*, immutable records of file paths, never
//! the data itself.

mod artifact;
mod config;
pub mod constants;
mod error;
mod layout;
mod params;
mod stage;
mod storage;
mod tracking;

pub use artifact::*;
pub use config::*;
pub use error::*;
pub use layout::*;
pub use params::*;
pub use stage::{ensure_parent_dir, Stage};
pub use storage::ObjectStore;
pub use tracking::*;
