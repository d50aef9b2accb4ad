//! Command implementations.

mod info;
mod predict;
mod promote;
mod run;
mod validate;

pub use info::run_info;
pub use predict::run_predict;
pub use promote::run_promote;
pub use run::run_pipeline;
pub use validate::run_validate;
