//! Retrieval document model.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One retrievable knowledge document.
///
/// `metadata` conventionally carries a `type` key (`recipe`, `food`, ...)
/// used when formatting retrieved context into a prompt.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Stable document id within the collection.
    pub id: String,
    /// The text that was embedded and is fed to the prompt.
    pub content: String,
    /// Open key-value metadata stored alongside the document.
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl Document {
    /// Convenience constructor for documents without metadata.
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            metadata: Map::new(),
        }
    }

    /// The `type` metadata value, defaulting to `"doc"`.
    pub fn doc_type(&self) -> &str {
        self.metadata
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or("doc")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn doc_type_defaults_when_absent() {
        assert_eq!(Document::new("d1", "rice").doc_type(), "doc");
    }

    #[test]
    fn doc_type_reads_metadata() {
        let mut doc = Document::new("d1", "rice");
        doc.metadata.insert("type".into(), json!("recipe"));
        assert_eq!(doc.doc_type(), "recipe");
    }
}
