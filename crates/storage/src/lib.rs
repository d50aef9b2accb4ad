//! # Storage
//!
//! Object storage collaborators used by Ingestion and the Pusher.
//!
//! - [`FsObjectStore`]: containers are directories under a root directory
//! - [`MemoryObjectStore`]: in-memory store with failure injection, for tests

mod fs_store;
mod memory;

pub use fs_store::FsObjectStore;
pub use memory::{MemoryObjectStore, MockConfig};
