//! Unified service container for psearch.
//!
//! Wires configuration into the embedding provider and the
//! relevance scorer once, at startup. All adapters use this same
//! struct for service access.

use std::sync::Arc;

use crate::core::config::Config;
use crate::core::embedding::{build_provider, EmbeddingProvider};
use crate::core::error::Result;
use crate::core::indexer::IndexingPipeline;
use crate::core::scorer::{build_scorer, RelevanceScorer};
use crate::core::search::SearchEngine;

/// Unified services container
#[derive(Clone)]
pub struct Services {
    /// Application configuration
    pub config: Arc<Config>,

    /// Embedding provider shared by indexing and search
    pub embedder: Arc<dyn EmbeddingProvider>,

    /// Optional relevance scorer for re-ranking
    pub scorer: Option<Arc<dyn RelevanceScorer>>,
}

impl Services {
    /// Create services from configuration.
    ///
    /// Fails on provider misconfiguration (e.g. remote embeddings
    /// without an API key) before any indexing or search work.
    pub fn new(config: Config) -> Result<Self> {
        let embedder = build_provider(&config.embedding)?;
        let scorer = build_scorer(&config);

        Ok(Self {
            config: Arc::new(config),
            embedder,
            scorer,
        })
    }

    /// Create an indexing pipeline for the configured directories
    pub fn pipeline(&self) -> IndexingPipeline {
        IndexingPipeline::new(&self.config, Arc::clone(&self.embedder))
    }

    /// Open the search engine over the configured index.
    ///
    /// `Ok(None)` means no index exists yet.
    pub fn open_engine(&self) -> Result<Option<SearchEngine>> {
        SearchEngine::open(&self.config, Arc::clone(&self.embedder), self.scorer.clone())
    }
}
