//! Completion boundary error types.

/// Errors from the completion service.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// The call exceeded its time budget. Distinguished so callers can
    /// treat a slow model differently from a broken one.
    #[error("completion request timed out")]
    Timeout,

    /// Transport-level failure reaching the service.
    #[error("completion request failed: {0}")]
    Http(reqwest::Error),

    /// The service answered with a non-success status.
    #[error("completion service returned {status}: {message}")]
    Api { status: u16, message: String },

    /// The response carried no usable completion.
    #[error("unexpected completion response: {0}")]
    InvalidResponse(String),

    /// No API key was configured for an authenticated endpoint.
    #[error("no API key configured")]
    MissingApiKey,
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Http(err)
        }
    }
}

/// Result alias for completion operations.
pub type Result<T> = std::result::Result<T, LlmError>;
