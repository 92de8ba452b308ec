//! Retrieval boundary error types.

/// Errors from the vector service boundary.
#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    /// The request exceeded its time budget.
    #[error("vector service request timed out")]
    Timeout,

    /// Transport-level failure reaching the service.
    #[error("vector service request failed: {0}")]
    Http(reqwest::Error),

    /// The service answered with a non-success status.
    #[error("vector service returned {status}: {message}")]
    Api { status: u16, message: String },

    /// The service answered with a body this client cannot interpret.
    #[error("unexpected vector service response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for RetrievalError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Http(err)
        }
    }
}

/// Result alias for retrieval operations.
pub type Result<T> = std::result::Result<T, RetrievalError>;
