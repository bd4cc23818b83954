//! Configuration structures
//!
//! Every section has serde defaults so a partial JSON/TOML file (or an empty
//! one) produces a usable configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_LOG_FILTER, DEFAULT_MAX_BLOCKING_THREADS, DEFAULT_THREAD_NAME,
    DEFAULT_WORKER_THREADS, MIN_BLOCKING_THREADS,
};
use crate::{CacheError, Result};

/// Top-level cache configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Worker pool sizing.
    pub workers: WorkerConfig,
    /// Snapshot persistence.
    pub store: StoreConfig,
    /// Tracing subscriber settings.
    pub logging: LoggingConfig,
}

impl CacheConfig {
    /// Check cross-field constraints.
    ///
    /// # Errors
    /// Returns `CacheError::InvalidArgument` for out-of-range pool sizes and
    /// `CacheError::Config` for a file store without a path.
    pub fn validate(&self) -> Result<()> {
        self.workers.validate()?;
        self.store.validate()
    }
}

/// Background worker pool sizing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Async worker threads driving task completion
    pub worker_threads: usize,
    /// Upper bound on threads running payload loads and invalidations
    pub max_blocking_threads: usize,
    /// Thread name prefix for an owned runtime.
    pub thread_name: String,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            worker_threads: DEFAULT_WORKER_THREADS,
            max_blocking_threads: DEFAULT_MAX_BLOCKING_THREADS,
            thread_name: DEFAULT_THREAD_NAME.to_string(),
        }
    }
}

impl WorkerConfig {
    /// # Errors
    /// Returns `CacheError::InvalidArgument` when a size or name is unusable.
    pub fn validate(&self) -> Result<()> {
        if self.worker_threads == 0 {
            return Err(CacheError::InvalidArgument(
                "workers.worker_threads must be at least 1".to_string(),
            ));
        }
        if self.max_blocking_threads < MIN_BLOCKING_THREADS {
            return Err(CacheError::InvalidArgument(format!(
                "workers.max_blocking_threads must be at least {}, got {}",
                MIN_BLOCKING_THREADS, self.max_blocking_threads
            )));
        }
        if self.thread_name.trim().is_empty() {
            return Err(CacheError::InvalidArgument(
                "workers.thread_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Which persistence backend to open
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreKind {
    #[default]
    Memory,
    File,
}

crate::impl_cache_enum_conversions!(StoreKind {
    Memory => "memory",
    File => "file",
});

/// Where snapshots are persisted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Backend to use.
    pub kind: StoreKind,
    /// Snapshot location, required for [`StoreKind::File`]
    pub path: Option<PathBuf>,
}

impl StoreConfig {
    fn validate(&self) -> Result<()> {
        match (self.kind, &self.path) {
            (StoreKind::File, None) => {
                Err(CacheError::Config("store.path is required for the file store".to_string()))
            }
            _ => Ok(()),
        }
    }
}

/// Tracing subscriber settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, overridden by `RUST_LOG` when set
    pub filter: String,
    /// Emit JSON lines instead of the human-readable format
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { filter: DEFAULT_LOG_FILTER.to_string(), json: false }
    }
}
