//! Orchestrator error types.

use vee_llm::LlmError;
use vee_log::LogError;
use vee_retrieval::RetrievalError;

/// Errors from the answering flows.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    /// The completion service failed (including timeouts).
    #[error(transparent)]
    Llm(#[from] LlmError),

    /// Context retrieval failed.
    #[error(transparent)]
    Retrieval(#[from] RetrievalError),

    /// The durable log append failed after a successful answer.
    #[error(transparent)]
    Log(#[from] LogError),
}

impl ChatError {
    /// Whether this failure is a model-call timeout, which callers turn
    /// into a "try again" response rather than a generic error.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Llm(LlmError::Timeout))
    }
}

/// Result alias for orchestrator operations.
pub type Result<T> = std::result::Result<T, ChatError>;
