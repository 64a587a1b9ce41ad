//! Embedding providers.
//!
//! An embedding provider turns text into fixed-length vectors for
//! the vector store. Two implementations exist: a local Ollama
//! server (default) and the OpenAI embeddings API. Providers must
//! be deterministic for identical input and model configuration;
//! a provider failure is fatal to the vector store operation that
//! triggered it.

mod ollama;
mod openai;

pub use ollama::OllamaEmbedder;
pub use openai::OpenAiEmbedder;

use crate::core::config::EmbeddingConfig;
use crate::core::error::{PsearchError, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// Boundary contract for embedding backends
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Model identifier, recorded in the store metadata so an index
    /// is never queried with vectors from a different model
    fn model(&self) -> &str;

    /// Embed a batch of texts, one vector per input, in order
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Embed a single text
    async fn embed_one(&self, text: &str) -> Result<Vec<f32>> {
        let texts = [text.to_string()];
        let mut vectors = self.embed(&texts).await?;
        vectors.pop().ok_or_else(|| {
            PsearchError::EmbeddingFailed("provider returned no embedding".to_string())
        })
    }
}

/// Construct the configured provider.
///
/// Selecting the remote provider without an API key is a
/// configuration error, raised here before any indexing or search
/// work begins.
pub fn build_provider(config: &EmbeddingConfig) -> Result<Arc<dyn EmbeddingProvider>> {
    if config.use_local {
        Ok(Arc::new(OllamaEmbedder::new(
            &config.endpoint,
            &config.model,
        )))
    } else {
        let provider = OpenAiEmbedder::new(&config.api_key, &config.remote_model)?;
        Ok(Arc::new(provider))
    }
}
