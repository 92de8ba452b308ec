//! Vector index trait and mock implementation.

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::errors::Result;
use crate::types::Document;

/// Trait for the vector service's document contract.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Index a batch of documents. An empty batch is a no-op.
    async fn add(&self, documents: &[Document]) -> Result<()>;

    /// Return the `n_results` documents most similar to `text`, best first.
    async fn query(&self, text: &str, n_results: usize) -> Result<Vec<Document>>;

    /// Drop and recreate the collection, discarding every document.
    async fn reset(&self) -> Result<()>;
}

/// In-memory mock index for testing.
///
/// Ranks by deterministic word overlap between the query and each
/// document's content, breaking ties by insertion order, so tests can
/// predict exactly which documents come back and in what order.
#[derive(Default)]
pub struct MockVectorIndex {
    docs: Mutex<Vec<Document>>,
}

impl MockVectorIndex {
    /// Create an empty mock index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of indexed documents.
    pub fn len(&self) -> usize {
        self.docs.lock().len()
    }

    /// Whether the index holds no documents.
    pub fn is_empty(&self) -> bool {
        self.docs.lock().is_empty()
    }

    fn overlap(query: &str, content: &str) -> usize {
        let query_words: Vec<String> = query
            .split_whitespace()
            .map(str::to_lowercase)
            .collect();
        let content_lower = content.to_lowercase();
        query_words
            .iter()
            .filter(|w| content_lower.contains(w.as_str()))
            .count()
    }
}

#[async_trait]
impl VectorIndex for MockVectorIndex {
    async fn add(&self, documents: &[Document]) -> Result<()> {
        self.docs.lock().extend_from_slice(documents);
        Ok(())
    }

    async fn query(&self, text: &str, n_results: usize) -> Result<Vec<Document>> {
        let docs = self.docs.lock();
        let mut scored: Vec<(usize, &Document)> = docs
            .iter()
            .map(|d| (Self::overlap(text, &d.content), d))
            .filter(|(score, _)| *score > 0)
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(scored
            .into_iter()
            .take(n_results)
            .map(|(_, d)| d.clone())
            .collect())
    }

    async fn reset(&self) -> Result<()> {
        self.docs.lock().clear();
        Ok(())
    }
}
