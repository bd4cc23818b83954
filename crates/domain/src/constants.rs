//! Cache constants
//!
//! Centralized location for the messages, environment variable names and
//! format identifiers shared by every lazycache crate.

// Notification messages
/// Message sent with `Starting`.
pub const LOAD_STARTED_MESSAGE: &str = "Load Started";
/// Message sent with `Loaded`.
pub const LOAD_COMPLETE_MESSAGE: &str = "Load Complete";
/// Error text for persistence with no store bound.
pub const STORE_UNDEFINED_MESSAGE: &str = "DataStore is undefined. Call setup_store to resolve.";

// Loading keys start at 1; 0 means "never subscribed"
/// Raw value of an unassigned loading key.
pub const UNASSIGNED_LOADING_KEY: u64 = 0;

// Snapshot format
/// Version written to, and required of, snapshots.
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

// Worker pool defaults
/// Async worker threads in an owned runtime.
pub const DEFAULT_WORKER_THREADS: usize = 2;
/// Blocking threads available to payload loads.
pub const DEFAULT_MAX_BLOCKING_THREADS: usize = 16;
/// Lowest accepted blocking thread count.
pub const MIN_BLOCKING_THREADS: usize = 1;
/// Thread name prefix for an owned runtime.
pub const DEFAULT_THREAD_NAME: &str = "lazycache-worker";

// Logging defaults
/// Filter used when neither `RUST_LOG` nor config sets one.
pub const DEFAULT_LOG_FILTER: &str = "info";

// Environment variables
/// `memory` or `file`.
pub const ENV_STORE_KIND: &str = "LAZYCACHE_STORE_KIND";
/// Snapshot path for the file store.
pub const ENV_STORE_PATH: &str = "LAZYCACHE_STORE_PATH";
/// Overrides `workers.worker_threads`.
pub const ENV_WORKER_THREADS: &str = "LAZYCACHE_WORKER_THREADS";
/// Overrides `workers.max_blocking_threads`.
pub const ENV_MAX_BLOCKING_THREADS: &str = "LAZYCACHE_MAX_BLOCKING_THREADS";
/// Overrides `logging.filter`.
pub const ENV_LOG_FILTER: &str = "LAZYCACHE_LOG_FILTER";
/// Overrides `logging.json`.
pub const ENV_LOG_JSON: &str = "LAZYCACHE_LOG_JSON";
