//! HTTP client for a Chroma-style vector store.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

use portfolio_core::errors::{AssistantError, AssistantResult};
use portfolio_core::models::knowledge::{DocumentMetadata, RetrievedDocument};

/// Ranked-context provider consumed by the responder.
#[async_trait]
pub trait KnowledgeIndex: Send + Sync {
    /// Top-`k` most similar stored documents, distance ascending.
    async fn similarity_search(
        &self,
        query: &str,
        k: usize,
    ) -> AssistantResult<Vec<RetrievedDocument>>;
}

/// Chroma REST client bound to one collection.
pub struct ChromaClient {
    http: reqwest::Client,
    base_url: String,
    collection: String,
}

// Chroma returns parallel arrays nested one level per query text; this
// client always sends exactly one query text.
#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    documents: Vec<Vec<String>>,
    #[serde(default)]
    metadatas: Vec<Vec<Option<DocumentMetadata>>>,
    #[serde(default)]
    distances: Vec<Vec<f64>>,
}

#[derive(Debug, Deserialize)]
struct CountResponse(usize);

impl ChromaClient {
    pub fn new(
        base_url: impl Into<String>,
        collection: impl Into<String>,
        timeout: std::time::Duration,
    ) -> AssistantResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AssistantError::Transient(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into(),
            collection: collection.into(),
        })
    }

    fn collection_url(&self, suffix: &str) -> String {
        format!(
            "{}/api/v1/collections/{}/{}",
            self.base_url,
            urlencoding::encode(&self.collection),
            suffix,
        )
    }

    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> AssistantResult<T> {
        let status = response.status();

        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| AssistantError::External(eyre::eyre!("JSON parse error: {e}")));
        }

        let body = response.text().await.unwrap_or_default();
        match status.as_u16() {
            401 | 403 => Err(AssistantError::Authorization(format!("{status}: {body}"))),
            404 => Err(AssistantError::NotFound(format!(
                "collection {}: {body}",
                self.collection
            ))),
            408 | 429 => Err(AssistantError::Transient(format!("{status}: {body}"))),
            s if s >= 500 => Err(AssistantError::Transient(format!("{status}: {body}"))),
            _ => Err(AssistantError::External(eyre::eyre!(
                "vector store returned {status}: {body}"
            ))),
        }
    }

    /// Number of documents in the collection.
    #[instrument(skip(self), level = "debug")]
    pub async fn count(&self) -> AssistantResult<usize> {
        let response = self
            .http
            .get(self.collection_url("count"))
            .send()
            .await
            .map_err(|e| AssistantError::Transient(format!("count request: {e}")))?;

        let CountResponse(count) = self.handle_response(response).await?;
        Ok(count)
    }

    /// Add documents with their metadata. Ids continue the existing
    /// `doc_{n}` sequence.
    #[instrument(skip(self, texts, metadata), level = "debug")]
    pub async fn add_documents(
        &self,
        texts: &[String],
        metadata: &[DocumentMetadata],
    ) -> AssistantResult<()> {
        if texts.len() != metadata.len() {
            return Err(AssistantError::Validation(format!(
                "{} documents but {} metadata entries",
                texts.len(),
                metadata.len()
            )));
        }

        let offset = self.count().await?;
        let ids: Vec<String> = (offset..offset + texts.len())
            .map(|i| format!("doc_{i}"))
            .collect();

        let body = serde_json::json!({
            "documents": texts,
            "metadatas": metadata,
            "ids": ids,
        });

        let response = self
            .http
            .post(self.collection_url("add"))
            .json(&body)
            .send()
            .await
            .map_err(|e| AssistantError::Transient(format!("add request: {e}")))?;

        let _: serde_json::Value = self.handle_response(response).await?;
        debug!(added = texts.len(), "Documents added to collection");
        Ok(())
    }

    /// Seed the collection only when it is empty.
    pub async fn seed_if_empty(
        &self,
        texts: &[String],
        metadata: &[DocumentMetadata],
    ) -> AssistantResult<bool> {
        if self.count().await? > 0 {
            return Ok(false);
        }
        self.add_documents(texts, metadata).await?;
        Ok(true)
    }
}

#[async_trait]
impl KnowledgeIndex for ChromaClient {
    #[instrument(skip(self), level = "debug")]
    async fn similarity_search(
        &self,
        query: &str,
        k: usize,
    ) -> AssistantResult<Vec<RetrievedDocument>> {
        let body = serde_json::json!({
            "query_texts": [query],
            "n_results": k,
            "include": ["documents", "metadatas", "distances"],
        });

        let response = self
            .http
            .post(self.collection_url("query"))
            .json(&body)
            .send()
            .await
            .map_err(|e| AssistantError::Transient(format!("query request: {e}")))?;

        let parsed: QueryResponse = self.handle_response(response).await?;

        let documents = parsed.documents.into_iter().next().unwrap_or_default();
        let metadatas = parsed.metadatas.into_iter().next().unwrap_or_default();
        let distances = parsed.distances.into_iter().next().unwrap_or_default();

        let results = documents
            .into_iter()
            .zip(distances)
            .enumerate()
            .map(|(i, (content, distance))| RetrievedDocument {
                content,
                metadata: metadatas
                    .get(i)
                    .cloned()
                    .flatten()
                    .unwrap_or_default(),
                distance,
            })
            .collect();

        Ok(results)
    }
}
