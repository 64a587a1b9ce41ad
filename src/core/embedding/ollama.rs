//! Local embedding provider backed by an Ollama server.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use crate::core::embedding::EmbeddingProvider;
use crate::core::error::{PsearchError, Result};

/// Request timeout for embedding calls. Batch embedding of a large
/// notes directory can take a while on CPU-only hosts.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Embedding provider using the Ollama `/api/embed` endpoint
pub struct OllamaEmbedder {
    client: reqwest::Client,
    endpoint: String,
    model: String,
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

impl OllamaEmbedder {
    /// Create a provider for the given server URL and model
    pub fn new(endpoint: &str, model: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaEmbedder {
    fn model(&self) -> &str {
        &self.model
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/api/embed", self.endpoint);
        let body = serde_json::json!({
            "model": self.model,
            "input": texts,
        });

        let response = self
            .client
            .post(&url)
            .timeout(REQUEST_TIMEOUT)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                PsearchError::EmbeddingFailed(format!(
                    "Ollama request to {url} failed: {e}. Is the server running?"
                ))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(PsearchError::EmbeddingFailed(format!(
                "Ollama returned {status}: {detail}"
            )));
        }

        let parsed: EmbedResponse = response.json().await.map_err(|e| {
            PsearchError::EmbeddingFailed(format!("Invalid Ollama embed response: {e}"))
        })?;

        if parsed.embeddings.len() != texts.len() {
            return Err(PsearchError::EmbeddingFailed(format!(
                "Expected {} embeddings, got {}",
                texts.len(),
                parsed.embeddings.len()
            )));
        }

        Ok(parsed.embeddings)
    }
}
