//! Remote embedding provider backed by the OpenAI embeddings API.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use crate::core::embedding::EmbeddingProvider;
use crate::core::error::{PsearchError, Result};

const API_URL: &str = "https://api.openai.com/v1/embeddings";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Embedding provider using the OpenAI `/v1/embeddings` endpoint
pub struct OpenAiEmbedder {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingItem>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingItem {
    embedding: Vec<f32>,
    index: usize,
}

impl OpenAiEmbedder {
    /// Create a provider. Fails without an API key so the
    /// misconfiguration surfaces before any indexing work starts.
    pub fn new(api_key: &str, model: &str) -> Result<Self> {
        if api_key.is_empty() {
            return Err(PsearchError::ConfigError(
                "OpenAI embeddings selected but no API key configured \
                 (set OPENAI_API_KEY or embedding.api_key)"
                    .to_string(),
            ));
        }
        Ok(Self {
            client: reqwest::Client::new(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        })
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbedder {
    fn model(&self) -> &str {
        &self.model
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let body = serde_json::json!({
            "model": self.model,
            "input": texts,
        });

        let response = self
            .client
            .post(API_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .timeout(REQUEST_TIMEOUT)
            .json(&body)
            .send()
            .await
            .map_err(|e| PsearchError::EmbeddingFailed(format!("OpenAI request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(PsearchError::EmbeddingFailed(format!(
                "OpenAI returned {status}: {detail}"
            )));
        }

        let parsed: EmbeddingsResponse = response.json().await.map_err(|e| {
            PsearchError::EmbeddingFailed(format!("Invalid OpenAI embeddings response: {e}"))
        })?;

        if parsed.data.len() != texts.len() {
            return Err(PsearchError::EmbeddingFailed(format!(
                "Expected {} embeddings, got {}",
                texts.len(),
                parsed.data.len()
            )));
        }

        // The API documents order-preserving responses; sort by the
        // returned index anyway.
        let mut data = parsed.data;
        data.sort_by_key(|item| item.index);
        Ok(data.into_iter().map(|item| item.embedding).collect())
    }
}
