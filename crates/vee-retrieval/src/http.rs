//! HTTP client for the sidecar vector service.
//!
//! The service exposes a Chroma-style collection API: batch `add`, nested
//! per-query result arrays from `query`, and a destructive `reset`. The
//! sidecar owns embedding; this client only moves documents and text.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::errors::{Result, RetrievalError};
use crate::service::VectorIndex;
use crate::types::Document;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Vector index backed by the sidecar service over HTTP.
pub struct HttpVectorIndex {
    client: reqwest::Client,
    base_url: String,
    collection: String,
}

#[derive(Serialize)]
struct AddRequest<'a> {
    ids: Vec<&'a str>,
    documents: Vec<&'a str>,
    metadatas: Vec<&'a Map<String, Value>>,
}

#[derive(Serialize)]
struct QueryRequest<'a> {
    query_texts: [&'a str; 1],
    n_results: usize,
}

/// Chroma-style response: one inner array per query text (we send one).
#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    ids: Vec<Vec<String>>,
    #[serde(default)]
    documents: Vec<Vec<String>>,
    #[serde(default)]
    metadatas: Vec<Vec<Map<String, Value>>>,
}

impl HttpVectorIndex {
    /// Create a client for `collection` on the service at `base_url`.
    pub fn new(base_url: impl Into<String>, collection: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(RetrievalError::Http)?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            collection: collection.into(),
        })
    }

    fn endpoint(&self, op: &str) -> String {
        format!("{}/collections/{}/{op}", self.base_url, self.collection)
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(RetrievalError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl VectorIndex for HttpVectorIndex {
    async fn add(&self, documents: &[Document]) -> Result<()> {
        if documents.is_empty() {
            return Ok(());
        }
        let body = AddRequest {
            ids: documents.iter().map(|d| d.id.as_str()).collect(),
            documents: documents.iter().map(|d| d.content.as_str()).collect(),
            metadatas: documents.iter().map(|d| &d.metadata).collect(),
        };
        let response = self
            .client
            .post(self.endpoint("add"))
            .json(&body)
            .send()
            .await?;
        Self::check_status(response).await?;
        debug!(count = documents.len(), collection = %self.collection, "documents indexed");
        Ok(())
    }

    async fn query(&self, text: &str, n_results: usize) -> Result<Vec<Document>> {
        let body = QueryRequest {
            query_texts: [text],
            n_results,
        };
        let response = self
            .client
            .post(self.endpoint("query"))
            .json(&body)
            .send()
            .await?;
        let parsed: QueryResponse = Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| RetrievalError::InvalidResponse(e.to_string()))?;

        let ids = parsed.ids.into_iter().next().unwrap_or_default();
        let contents = parsed.documents.into_iter().next().unwrap_or_default();
        let metadatas = parsed.metadatas.into_iter().next().unwrap_or_default();

        let docs: Vec<Document> = ids
            .into_iter()
            .zip(contents)
            .zip(metadatas.into_iter().chain(std::iter::repeat(Map::new())))
            .map(|((id, content), metadata)| Document {
                id,
                content,
                metadata,
            })
            .collect();
        debug!(count = docs.len(), collection = %self.collection, "query returned");
        Ok(docs)
    }

    async fn reset(&self) -> Result<()> {
        let response = self.client.post(self.endpoint("reset")).send().await?;
        Self::check_status(response).await?;
        debug!(collection = %self.collection, "collection reset");
        Ok(())
    }
}
