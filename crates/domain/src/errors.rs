//! Error types used throughout the cache

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for lazycache
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum CacheError {
    /// No persistence store bound, or invalid configuration values
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Persistence backend read/write failure
    #[error("Store error: {0}")]
    Store(String),

    /// A payload's own load operation failed
    #[error("Payload load failed: {0}")]
    PayloadLoad(String),

    /// A background task panicked or was aborted before completing
    #[error("Background task failed: {0}")]
    Task(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CacheError {
    /// Error returned by save/load when no store has been bound.
    pub fn store_undefined() -> Self {
        Self::Config(crate::constants::STORE_UNDEFINED_MESSAGE.to_string())
    }

    /// Whether this error came from a payload rather than the cache itself.
    pub fn is_payload_failure(&self) -> bool {
        matches!(self, Self::PayloadLoad(_) | Self::Task(_))
    }
}

/// Result type alias for lazycache operations
pub type Result<T> = std::result::Result<T, CacheError>;
