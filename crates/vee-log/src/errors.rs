//! Conversation log error types.

/// Errors from the primary (durable) log path.
///
/// Only the local append can fail a log operation; mirror failures are
/// swallowed behind their own boundary, and scan-side read problems degrade
/// to skipped lines, never errors.
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    /// Local filesystem failure on the primary append path.
    #[error("log write failed: {0}")]
    Io(#[from] std::io::Error),

    /// Entry could not be serialized (should not happen for valid strings).
    #[error("log entry serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result alias for log operations.
pub type Result<T> = std::result::Result<T, LogError>;
