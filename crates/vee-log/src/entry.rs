//! Log entry schema and the derived read-side views.
//!
//! [`LogEntry`] is the write model: its serialized shape is the permanent
//! on-disk record and interoperates with files written by the previous
//! generation of the system, so fields stay snake_case and in this order.
//!
//! The read side deliberately parses lines as loose [`serde_json::Value`]s
//! instead of `LogEntry`: historical files contain entries with numeric
//! user ids, missing fields, and the occasional corrupt line, and a scan
//! must take what it can from each line rather than reject it wholesale.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One durable record of a completed exchange. Never mutated or deleted.
///
/// Identity is positional — the line's place in its day file. There is no
/// entry id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Naive-UTC ISO-8601 timestamp (no offset).
    pub timestamp: String,
    /// Owning user, when known.
    pub user_id: Option<String>,
    /// Conversation this exchange belongs to, when known.
    pub conversation_id: Option<String>,
    /// The question as asked; prefixed `"[IMAGE] "` for image turns.
    pub question: String,
    /// The assistant's answer.
    pub answer: String,
    /// Whether the topic classifier judged the question food-related.
    pub is_food_related: bool,
    /// Number of documents retrieved for the prompt.
    pub num_retrieved_docs: usize,
    /// Number of history turns fed into the prompt.
    pub history_length: usize,
    /// Open key-value map; may include `image_url`, model info, etc.
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

/// Parameters for one log append.
#[derive(Clone, Debug, Default)]
pub struct AppendRequest<'a> {
    /// The question as asked.
    pub question: &'a str,
    /// The assistant's answer.
    pub answer: &'a str,
    /// Topic classifier verdict.
    pub is_food_related: bool,
    /// Documents retrieved for the prompt.
    pub num_retrieved_docs: usize,
    /// History turns fed into the prompt.
    pub history_length: usize,
    /// Owning user, when known.
    pub user_id: Option<&'a str>,
    /// Conversation id, when known.
    pub conversation_id: Option<&'a str>,
    /// Extra metadata recorded with the entry.
    pub metadata: Option<Map<String, Value>>,
}

/// Aggregate view of one conversation, derived by folding its log entries.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConversationSummary {
    /// Normalized conversation id.
    pub conversation_id: String,
    /// First question seen during the scan, truncated to 100 chars.
    pub title: String,
    /// Last question (or answer) processed, truncated to 150 chars.
    pub preview: String,
    /// Number of matching log entries.
    pub message_count: usize,
    /// Earliest matching timestamp (naive-UTC compared).
    pub created_at: String,
    /// Latest matching timestamp (naive-UTC compared).
    pub last_updated: String,
}

/// One message of a reconstructed conversation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConversationMessage {
    /// The question as logged (including any `"[IMAGE] "` prefix).
    pub question: String,
    /// The answer as logged.
    pub answer: String,
    /// The entry's timestamp string.
    pub timestamp: String,
    /// Image reference when the turn originated from an upload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Extract and normalize an id field from a loosely parsed entry.
///
/// Ids are compared after trimming and string-casting, so `42`, `"42"`, and
/// `" 42 "` all normalize to `"42"`. Returns `None` for missing, null,
/// empty, or non-scalar values.
pub(crate) fn normalized_id(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// A string field from a loosely parsed entry, defaulting to `""`.
pub(crate) fn str_field<'a>(entry: &'a Value, key: &str) -> &'a str {
    entry.get(key).and_then(Value::as_str).unwrap_or("")
}
