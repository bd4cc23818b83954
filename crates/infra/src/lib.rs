//! # LazyCache Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - Snapshot encoding with a registered payload type table
//! - `PersistenceStore` adapters (in-memory buffer, JSON file)
//! - Configuration loading from the environment and config files
//! - Tracing subscriber setup and the process bootstrap context
//!
//! ## Architecture
//! - Implements traits defined in `lazycache-core`
//! - Depends on `lazycache-common`, `lazycache-domain` and `lazycache-core`
//! - Contains all "impure" code (file I/O, environment, global subscriber)

pub mod bootstrap;
pub mod codec;
pub mod config;
pub mod errors;
pub mod observability;
pub mod store;

// Re-export commonly used items
pub use bootstrap::CacheContext;
pub use codec::{PayloadCodec, PayloadTypes};
pub use errors::StoreError;
pub use observability::init_tracing;
pub use store::{open_store, FileStore, MemoryStore};
