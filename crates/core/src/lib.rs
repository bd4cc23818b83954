//! # LazyCache Core
//!
//! Lazy-loading cache logic - no storage or logging-setup dependencies.
//!
//! This crate contains:
//! - The `Payload` and `PersistenceStore` ports
//! - The entry controller state machine and its notifications
//! - The cache registry (membership, queries, persistence, broadcasts)
//! - The worker pool that runs background loads and invalidations
//!
//! ## Architecture Principles
//! - Only depends on `lazycache-common` and `lazycache-domain`
//! - Serialization and files live behind `PersistenceStore` in infra
//! - Payload work is synchronous; background work goes through `WorkerPool`

pub mod entry;
pub mod factory;
pub mod keys;
pub mod payload;
pub mod registry;
pub mod runtime;
pub mod stats;
pub mod store;

pub use entry::{EntryController, InvalidateHandler, LoadStatusHandler};
pub use factory::{create_entry, create_entry_with};
pub use lazycache_domain::{
    BulkLoadReport, CacheError, EntryFailure, LoadOutcome, LoadStats, LoadingKey, LoadingStatus,
    NotificationAction, Result, SubscriptionToken,
};
pub use payload::{AsAny, LoadContext, Payload, PayloadType};
pub use registry::{CacheRegistry, Selector};
pub use runtime::{Completion, WorkerPool};
pub use stats::LoadMetrics;
pub use store::PersistenceStore;
