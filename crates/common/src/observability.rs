//! Logging helpers for classified errors

use crate::error::{ErrorClassification, ErrorSeverity};

/// Emit `err` at the tracing level matching its severity.
pub fn log_classified<E>(context: &str, err: &E)
where
    E: ErrorClassification + std::fmt::Display,
{
    let retryable = err.is_retryable();
    match err.severity() {
        ErrorSeverity::Info => tracing::info!(%context, retryable, error = %err, "operation failed"),
        ErrorSeverity::Warning => {
            tracing::warn!(%context, retryable, error = %err, "operation failed");
        }
        ErrorSeverity::Error | ErrorSeverity::Critical => {
            tracing::error!(
                %context,
                retryable,
                critical = err.is_critical(),
                error = %err,
                "operation failed"
            );
        }
    }
}
