//! Shared error building blocks for lazycache crates
//!
//! Stores, codecs and the worker pool fail in a small number of ways: bad
//! configuration, unreadable snapshots, I/O, timeouts and dead tasks.
//! `CommonError` names those once; adapter errors embed it and gain
//! [`ErrorClassification`] through [`impl_error_classification!`].
//!
//! ```rust,ignore
//! #[derive(Debug, thiserror::Error)]
//! pub enum StoreError {
//!     #[error("Payload type '{0}' has no registered tag")]
//!     UnregisteredType(String),
//!
//!     #[error(transparent)]
//!     Common(#[from] CommonError),
//! }
//!
//! impl_error_conversion!(StoreError, Common);
//! impl_error_classification!(StoreError, Common,
//!     Self::UnregisteredType(_) => {
//!         retryable: false,
//!         severity: ErrorSeverity::Error,
//!         critical: false,
//!     }
//! );
//! ```
//!
//! | Severity | Raised for |
//! |----------|------------|
//! | Info | Cancelled task |
//! | Warning | Timeout |
//! | Error | Config, snapshot encoding, file I/O |
//! | Critical | Internal invariant broken |

use std::fmt;
use std::time::Duration;

/// Result alias over [`CommonError`].
pub type CommonResult<T> = Result<T, CommonError>;

/// Failure kinds shared by every adapter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommonError {
    /// Unusable configuration, optionally pinned to one field
    Config { field: Option<String>, message: String },

    /// Text that could not be encoded or decoded
    Serialization { format: Option<String>, message: String },

    /// Backing storage could not be read or written
    Persistence { operation: Option<String>, message: String },

    /// Waited longer than allowed
    Timeout { operation: String, after: Duration },

    /// Background task aborted or panicked
    TaskCancelled { task: String, reason: Option<String> },

    Internal { context: Option<String>, message: String },
}

fn write_scoped(
    f: &mut fmt::Formatter<'_>,
    label: &str,
    scope: Option<&String>,
    message: &str,
) -> fmt::Result {
    match scope {
        Some(scope) => write!(f, "{label} ({scope}): {message}"),
        None => write!(f, "{label}: {message}"),
    }
}

impl fmt::Display for CommonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config { field, message } => {
                write_scoped(f, "invalid configuration", field.as_ref(), message)
            }
            Self::Serialization { format, message } => {
                write_scoped(f, "serialization failed", format.as_ref(), message)
            }
            Self::Persistence { operation, message } => {
                write_scoped(f, "persistence failed", operation.as_ref(), message)
            }
            Self::Timeout { operation, after } => {
                write!(f, "'{operation}' timed out after {after:?}")
            }
            Self::TaskCancelled { task, reason: Some(reason) } => {
                write!(f, "task '{task}' cancelled: {reason}")
            }
            Self::TaskCancelled { task, reason: None } => write!(f, "task '{task}' cancelled"),
            Self::Internal { context, message } => {
                write_scoped(f, "internal error", context.as_ref(), message)
            }
        }
    }
}

impl std::error::Error for CommonError {}

impl CommonError {
    /// Configuration error with no specific field.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config { field: None, message: message.into() }
    }

    /// Configuration error for `field`.
    pub fn config_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Config { field: Some(field.into()), message: message.into() }
    }

    /// Serialization error with no specific format.
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization { format: None, message: message.into() }
    }

    /// Serialization failure tagged with the wire format (`JSON`, `TOML`).
    pub fn serialization_format(format: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Serialization { format: Some(format.into()), message: message.into() }
    }

    /// Persistence error with no specific operation.
    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence { operation: None, message: message.into() }
    }

    /// Persistence failure tagged with the step that failed (`rename`, ...).
    pub fn persistence_op(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Persistence { operation: Some(operation.into()), message: message.into() }
    }

    /// `operation` gave up after `after`.
    pub fn timeout(operation: impl Into<String>, after: Duration) -> Self {
        Self::Timeout { operation: operation.into(), after }
    }

    /// `task` was cancelled without a reason.
    pub fn task_cancelled(task: impl Into<String>) -> Self {
        Self::TaskCancelled { task: task.into(), reason: None }
    }

    /// `task` was cancelled because of `reason`.
    pub fn task_cancelled_with_reason(task: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::TaskCancelled { task: task.into(), reason: Some(reason.into()) }
    }

    /// Internal invariant violation.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal { context: None, message: message.into() }
    }

    /// Internal invariant violation inside `context`.
    pub fn internal_in(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Internal { context: Some(context.into()), message: message.into() }
    }

    /// Stable snake_case name of the variant, for structured log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config { .. } => "config",
            Self::Serialization { .. } => "serialization",
            Self::Persistence { .. } => "persistence",
            Self::Timeout { .. } => "timeout",
            Self::TaskCancelled { .. } => "task_cancelled",
            Self::Internal { .. } => "internal",
        }
    }
}

/// Retry and alerting metadata for an error
pub trait ErrorClassification {
    /// Transient failures worth retrying unchanged.
    fn is_retryable(&self) -> bool;

    fn severity(&self) -> ErrorSeverity;

    fn is_critical(&self) -> bool;

    /// Suggested delay before a retry, when the error knows one.
    fn retry_after(&self) -> Option<Duration>;
}

impl ErrorClassification for CommonError {
    fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::TaskCancelled { .. } => ErrorSeverity::Info,
            Self::Timeout { .. } => ErrorSeverity::Warning,
            Self::Config { .. } | Self::Serialization { .. } | Self::Persistence { .. } => {
                ErrorSeverity::Error
            }
            Self::Internal { .. } => ErrorSeverity::Critical,
        }
    }

    fn is_critical(&self) -> bool {
        self.severity() == ErrorSeverity::Critical
    }

    fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::Timeout { after, .. } => Some(*after),
            _ => None,
        }
    }
}

/// Log level for a classified error
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Critical => "critical",
        };
        f.write_str(name)
    }
}

impl From<serde_json::Error> for CommonError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization_format("JSON", err.to_string())
    }
}

impl From<toml::de::Error> for CommonError {
    fn from(err: toml::de::Error) -> Self {
        Self::serialization_format("TOML", err.to_string())
    }
}

impl From<std::io::Error> for CommonError {
    fn from(err: std::io::Error) -> Self {
        Self::persistence_op(format!("{:?}", err.kind()), err.to_string())
    }
}

/// Route `serde_json` and `std::io` errors into an adapter error's
/// `CommonError` variant.
///
/// ```rust,ignore
/// impl_error_conversion!(StoreError, Common);
/// ```
///
/// The `with_common` form also generates `From<CommonError>`, for error
/// types that do not derive it with `#[from]`.
#[macro_export]
macro_rules! impl_error_conversion {
    ($error_type:ty, $variant:ident) => {
        impl From<serde_json::Error> for $error_type {
            fn from(err: serde_json::Error) -> Self {
                Self::$variant($crate::error::CommonError::from(err))
            }
        }

        impl From<std::io::Error> for $error_type {
            fn from(err: std::io::Error) -> Self {
                Self::$variant($crate::error::CommonError::from(err))
            }
        }
    };

    ($error_type:ty, $variant:ident, with_common) => {
        impl From<$crate::error::CommonError> for $error_type {
            fn from(err: $crate::error::CommonError) -> Self {
                Self::$variant(err)
            }
        }

        $crate::impl_error_conversion!($error_type, $variant);
    };
}

/// Implement `ErrorClassification` for an adapter error, delegating its
/// `CommonError` variant and classifying the rest inline.
#[macro_export]
macro_rules! impl_error_classification {
    (
        $error_type:ty,
        $common_variant:ident
        $(,
            $variant:pat => {
                retryable: $retryable:expr,
                severity: $severity:expr,
                critical: $critical:expr
                $(,)?
            }
        )*
        $(,)?
    ) => {
        impl $crate::error::ErrorClassification for $error_type {
            fn is_retryable(&self) -> bool {
                match self {
                    Self::$common_variant(e) => $crate::error::ErrorClassification::is_retryable(e),
                    $($variant => $retryable,)*
                }
            }

            fn severity(&self) -> $crate::error::ErrorSeverity {
                match self {
                    Self::$common_variant(e) => $crate::error::ErrorClassification::severity(e),
                    $($variant => $severity,)*
                }
            }

            fn is_critical(&self) -> bool {
                match self {
                    Self::$common_variant(e) => $crate::error::ErrorClassification::is_critical(e),
                    $($variant => $critical,)*
                }
            }

            fn retry_after(&self) -> Option<std::time::Duration> {
                match self {
                    Self::$common_variant(e) => $crate::error::ErrorClassification::retry_after(e),
                    #[allow(unreachable_patterns)]
                    _ => None,
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_display() {
        assert_eq!(
            CommonError::config("no store kind").to_string(),
            "invalid configuration: no store kind"
        );
        assert_eq!(
            CommonError::config_field("store.path", "must be absolute").to_string(),
            "invalid configuration (store.path): must be absolute"
        );
    }

    #[test]
    fn test_timeout_is_only_retryable_kind() {
        let err = CommonError::timeout("completion wait", Duration::from_millis(250));
        assert_eq!(err.to_string(), "'completion wait' timed out after 250ms");
        assert!(err.is_retryable());
        assert_eq!(err.retry_after(), Some(Duration::from_millis(250)));
        assert_eq!(err.severity(), ErrorSeverity::Warning);

        assert!(!CommonError::persistence("disk full").is_retryable());
    }

    #[test]
    fn test_internal_is_critical() {
        let err = CommonError::internal_in("entry", "gate released twice");
        assert_eq!(err.to_string(), "internal error (entry): gate released twice");
        assert!(err.is_critical());
        assert_eq!(err.kind(), "internal");
    }

    #[test]
    fn test_task_cancelled_display() {
        let err = CommonError::task_cancelled_with_reason("invalidate", "worker panicked");
        assert_eq!(err.to_string(), "task 'invalidate' cancelled: worker panicked");
        assert_eq!(CommonError::task_cancelled("save").to_string(), "task 'save' cancelled");
        assert_eq!(err.severity(), ErrorSeverity::Info);
    }

    #[test]
    fn test_json_error_tags_format() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err = CommonError::from(json_err);
        assert!(matches!(err, CommonError::Serialization { format: Some(ref f), .. } if f == "JSON"));
    }

    #[test]
    fn test_io_error_keeps_kind() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "snapshot.json");
        let err = CommonError::from(io_err);
        assert!(
            matches!(err, CommonError::Persistence { operation: Some(ref op), .. } if op == "NotFound")
        );
        assert_eq!(err.kind(), "persistence");
    }

    #[test]
    fn test_severity_order() {
        assert!(ErrorSeverity::Info < ErrorSeverity::Warning);
        assert!(ErrorSeverity::Error < ErrorSeverity::Critical);
        assert_eq!(ErrorSeverity::Warning.to_string(), "warning");
    }
}
