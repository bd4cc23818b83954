//! Cache value types
//!
//! Plain data shared between the core engine, the infra adapters and
//! consumers: notification vocabulary, load outcomes and statistics.

pub mod loading;
pub mod report;
pub mod stats;

pub use loading::{LoadOutcome, LoadingKey, LoadingStatus, NotificationAction, SubscriptionToken};
pub use report::{BulkLoadReport, EntryFailure};
pub use stats::LoadStats;
