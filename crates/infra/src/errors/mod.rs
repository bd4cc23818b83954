//! Infrastructure error types
//!
//! Adapter errors compose with `CommonError` and are flattened into
//! `CacheError::Store` at the `PersistenceStore` boundary.

use lazycache_common::{log_classified, CommonError, ErrorSeverity};
use lazycache_domain::CacheError;
use thiserror::Error;

/// Failure while encoding, decoding or moving a snapshot
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Payload type '{0}' has no registered tag")]
    UnregisteredType(String),

    #[error("Unsupported snapshot version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error(transparent)]
    Common(#[from] CommonError),
}

lazycache_common::impl_error_conversion!(StoreError, Common);

lazycache_common::impl_error_classification!(StoreError, Common,
    Self::UnregisteredType(_) => {
        retryable: false,
        severity: ErrorSeverity::Error,
        critical: false,
    },
    Self::UnsupportedVersion { .. } => {
        retryable: false,
        severity: ErrorSeverity::Error,
        critical: false,
    }
);

impl From<StoreError> for CacheError {
    fn from(err: StoreError) -> Self {
        CacheError::Store(err.to_string())
    }
}

/// Log `err` at its classified level and convert it for the port boundary.
pub(crate) fn report(context: &str, err: StoreError) -> CacheError {
    log_classified(context, &err);
    err.into()
}

#[cfg(test)]
mod tests {
    use lazycache_common::ErrorClassification;

    use super::*;

    #[test]
    fn test_io_error_becomes_persistence() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only volume");
        let err = StoreError::from(io);

        assert!(matches!(err, StoreError::Common(CommonError::Persistence { .. })));
        assert!(!err.is_retryable());
        assert_eq!(err.severity(), ErrorSeverity::Error);
    }

    #[test]
    fn test_version_error_converts_to_store() {
        let err = StoreError::UnsupportedVersion { found: 9, expected: 1 };
        let cache_err = CacheError::from(err);

        assert_eq!(
            cache_err,
            CacheError::Store("Unsupported snapshot version 9 (expected 1)".to_string())
        );
    }

    #[test]
    fn test_json_error_is_serialization() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err = StoreError::from(json_err);

        assert!(matches!(err, StoreError::Common(CommonError::Serialization { .. })));
        assert!(err.to_string().contains("JSON"));
    }
}
