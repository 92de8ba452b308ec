//! Speech boundary error types.

/// Errors from speech processing.
#[derive(Debug, thiserror::Error)]
pub enum VoiceError {
    /// The call exceeded its time budget.
    #[error("speech request timed out")]
    Timeout,

    /// Transport-level failure reaching the service.
    #[error("speech request failed: {0}")]
    Http(reqwest::Error),

    /// The service answered with a non-success status.
    #[error("speech service returned {status}: {message}")]
    Api { status: u16, message: String },

    /// The response could not be interpreted.
    #[error("unexpected speech service response: {0}")]
    InvalidResponse(String),

    /// No API key was configured.
    #[error("no API key configured")]
    MissingApiKey,

    /// Upload is not a supported audio format.
    #[error("unsupported audio format: {0}")]
    UnsupportedFormat(String),

    /// Upload exceeds the transcription size cap.
    #[error("audio too large: {size_bytes} bytes (max {max_bytes})")]
    TooLarge { size_bytes: usize, max_bytes: usize },
}

impl From<reqwest::Error> for VoiceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Http(err)
        }
    }
}

/// Result alias for speech operations.
pub type Result<T> = std::result::Result<T, VoiceError>;
