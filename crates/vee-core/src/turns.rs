//! Conversation turn types.

use serde::{Deserialize, Serialize};

/// One completed exchange: a user message and the assistant's reply.
///
/// Turns are immutable once created; insertion order is chronological order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// The user's message.
    pub user: String,
    /// The assistant's reply.
    pub assistant: String,
}

impl Turn {
    /// Create a turn from a user/assistant message pair.
    pub fn new(user: impl Into<String>, assistant: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            assistant: assistant.into(),
        }
    }
}

/// A turn reconstructed from the durable conversation log.
///
/// Carries its source timestamp so callers can order merges against live
/// in-memory turns; only the `{user, assistant}` pair feeds the prompt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoricalTurn {
    /// The user's message.
    pub user: String,
    /// The assistant's reply.
    pub assistant: String,
    /// Naive-UTC ISO-8601 timestamp of the source log entry.
    pub timestamp: String,
}

impl From<HistoricalTurn> for Turn {
    fn from(h: HistoricalTurn) -> Self {
        Self {
            user: h.user,
            assistant: h.assistant,
        }
    }
}
