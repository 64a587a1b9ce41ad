//! Relevance scorer: a small generative model used for re-ranking.
//!
//! The scorer receives a prompt describing a query and a candidate
//! chunk and replies with free-form text containing a 1-10 rating.
//! It is strictly optional: when disabled or misconfigured the
//! search engine falls back to vector-distance-only ranking, it
//! never aborts a search.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use crate::core::config::Config;
use crate::core::error::{PsearchError, Result};

/// Boundary contract for scoring backends
#[async_trait]
pub trait RelevanceScorer: Send + Sync {
    /// Model identifier, for logging
    fn model(&self) -> &str;

    /// Produce free-form text for a prompt, bounded output length
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Build the configured scorer, if any.
///
/// Returns `None` when re-ranking is disabled or the remote
/// provider lacks credentials; the latter logs a warning instead of
/// failing, since scoring is a best-effort refinement.
pub fn build_scorer(config: &Config) -> Option<Arc<dyn RelevanceScorer>> {
    if !config.scorer.enabled {
        return None;
    }

    if config.embedding.use_local {
        Some(Arc::new(OllamaScorer::new(
            &config.embedding.endpoint,
            &config.scorer.model,
            config.scorer.max_tokens,
            config.scorer.timeout_secs,
        )))
    } else if config.embedding.api_key.is_empty() {
        tracing::warn!("Re-ranking disabled: no API key for the remote scorer");
        None
    } else {
        Some(Arc::new(OpenAiScorer::new(
            &config.embedding.api_key,
            &config.scorer.model,
            config.scorer.max_tokens,
            config.scorer.timeout_secs,
        )))
    }
}

/// Scorer using the Ollama `/api/generate` endpoint
pub struct OllamaScorer {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    max_tokens: u32,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

impl OllamaScorer {
    pub fn new(endpoint: &str, model: &str, max_tokens: u32, timeout_secs: u64) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.to_string(),
            max_tokens,
            timeout: Duration::from_secs(timeout_secs),
        }
    }
}

#[async_trait]
impl RelevanceScorer for OllamaScorer {
    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/api/generate", self.endpoint);
        let body = serde_json::json!({
            "model": self.model,
            "prompt": prompt,
            "stream": false,
            "options": {
                "num_predict": self.max_tokens,
                "temperature": 0.0,
            },
        });

        let response = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| PsearchError::ScoringFailed(format!("Ollama request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(PsearchError::ScoringFailed(format!(
                "Ollama returned {status}: {detail}"
            )));
        }

        let parsed: GenerateResponse = response.json().await.map_err(|e| {
            PsearchError::ScoringFailed(format!("Invalid Ollama generate response: {e}"))
        })?;

        Ok(parsed.response)
    }
}

/// Scorer using the OpenAI chat completions endpoint
pub struct OpenAiScorer {
    client: reqwest::Client,
    api_key: String,
    model: String,
    max_tokens: u32,
    timeout: Duration,
}

const CHAT_API_URL: &str = "https://api.openai.com/v1/chat/completions";

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

impl OpenAiScorer {
    pub fn new(api_key: &str, model: &str, max_tokens: u32, timeout_secs: u64) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            max_tokens,
            timeout: Duration::from_secs(timeout_secs),
        }
    }
}

#[async_trait]
impl RelevanceScorer for OpenAiScorer {
    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": [{"role": "user", "content": prompt}],
            "max_tokens": self.max_tokens,
            "temperature": 0.0,
        });

        let response = self
            .client
            .post(CHAT_API_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| PsearchError::ScoringFailed(format!("OpenAI request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(PsearchError::ScoringFailed(format!(
                "OpenAI returned {status}: {detail}"
            )));
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| {
            PsearchError::ScoringFailed(format!("Invalid chat completion response: {e}"))
        })?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| PsearchError::ScoringFailed("Empty chat completion".to_string()))
    }
}
