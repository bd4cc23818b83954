//! # LazyCache Domain
//!
//! Value types shared by every lazycache crate.
//!
//! This crate contains:
//! - The cache error type and Result definition
//! - Notification vocabulary (statuses, actions, loading keys, tokens)
//! - Load outcomes, bulk load reports and statistics snapshots
//! - Configuration structures and constants
//!
//! ## Architecture
//! - No dependencies on other lazycache crates
//! - Only external dependencies allowed
//! - Pure data, no locking or I/O

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
