//! Configuration management for the psearch engine.
//!
//! This module handles loading configuration from TOML files and
//! environment variables, with sensible defaults for all settings.
//! The configuration is constructed once at process start and passed
//! into each component; no component reads ambient global state.

use crate::core::error::{PsearchError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub notes: NotesConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub indexing: IndexingConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub scorer: ScorerConfig,
}

/// Notes source configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NotesConfig {
    /// Directory containing the notes to index
    #[serde(default = "default_notes_dir")]
    pub directory: PathBuf,
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Directory holding the persistent vector index
    #[serde(default = "default_index_dir")]
    pub index_dir: PathBuf,
}

/// Indexing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IndexingConfig {
    /// Characters per chunk (not bytes!)
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Character overlap between consecutive chunks
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,

    /// Extensions eligible for indexing in addition to the built-in
    /// allow-list (without the leading dot)
    #[serde(default)]
    pub extra_extensions: Vec<String>,

    /// Concurrent file loads during indexing (0 = number of cores)
    #[serde(default)]
    pub load_concurrency: usize,
}

/// Search configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Default number of results to return
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Maximum results per query
    #[serde(default = "default_max_k")]
    pub max_k: usize,

    /// Maximum query string length
    #[serde(default = "default_max_query_length")]
    pub max_query_length: usize,
}

/// Embedding provider configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmbeddingConfig {
    /// Use the local Ollama provider instead of the OpenAI API
    #[serde(default = "default_use_local")]
    pub use_local: bool,

    /// Local embedding model identifier
    #[serde(default = "default_embed_model")]
    pub model: String,

    /// Base URL of the local Ollama server
    #[serde(default = "default_ollama_endpoint")]
    pub endpoint: String,

    /// Remote embedding model identifier
    #[serde(default = "default_remote_embed_model")]
    pub remote_model: String,

    /// API key for the remote provider (falls back to
    /// OPENAI_API_KEY)
    #[serde(default)]
    pub api_key: String,
}

/// Relevance scorer configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScorerConfig {
    /// Enable LLM re-ranking of search results
    #[serde(default = "default_scorer_enabled")]
    pub enabled: bool,

    /// Generative model used to score candidates
    #[serde(default = "default_scorer_model")]
    pub model: String,

    /// Output budget for a single scoring call
    #[serde(default = "default_scorer_max_tokens")]
    pub max_tokens: u32,

    /// Per-call timeout in seconds
    #[serde(default = "default_scorer_timeout")]
    pub timeout_secs: u64,
}

// Default value functions
fn default_notes_dir() -> PathBuf {
    home_joined("notes")
}

fn default_index_dir() -> PathBuf {
    home_joined(".psearch/index")
}

fn default_chunk_size() -> usize {
    1000
}

fn default_chunk_overlap() -> usize {
    200
}

fn default_top_k() -> usize {
    5
}

fn default_max_k() -> usize {
    50
}

fn default_max_query_length() -> usize {
    500
}

fn default_use_local() -> bool {
    true
}

fn default_embed_model() -> String {
    "nomic-embed-text".to_string()
}

fn default_ollama_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_remote_embed_model() -> String {
    "text-embedding-3-small".to_string()
}

fn default_scorer_enabled() -> bool {
    true
}

fn default_scorer_model() -> String {
    "llama3.2:1b".to_string()
}

fn default_scorer_max_tokens() -> u32 {
    50
}

fn default_scorer_timeout() -> u64 {
    30
}

fn home_joined(rel: &str) -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(rel)
}

impl Default for NotesConfig {
    fn default() -> Self {
        Self {
            directory: default_notes_dir(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            index_dir: default_index_dir(),
        }
    }
}

impl Default for IndexingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            extra_extensions: Vec::new(),
            load_concurrency: 0,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            max_k: default_max_k(),
            max_query_length: default_max_query_length(),
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            use_local: default_use_local(),
            model: default_embed_model(),
            endpoint: default_ollama_endpoint(),
            remote_model: default_remote_embed_model(),
            api_key: String::new(),
        }
    }
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            enabled: default_scorer_enabled(),
            model: default_scorer_model(),
            max_tokens: default_scorer_max_tokens(),
            timeout_secs: default_scorer_timeout(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| PsearchError::ConfigError(format!("Failed to read config file: {e}")))?;

        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load config with priority: env vars > TOML > defaults
    ///
    /// File locations, in order:
    /// 1. PSEARCH_CONFIG env var
    /// 2. ~/.config/psearch/config.toml
    /// 3. ./psearch.toml
    /// 4. Defaults
    pub fn load() -> Result<Self> {
        let mut config = if let Ok(config_path) = env::var("PSEARCH_CONFIG") {
            Self::from_file(config_path)?
        } else {
            let user_config = dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("psearch")
                .join("config.toml");
            if user_config.exists() {
                Self::from_file(user_config)?
            } else if Path::new("psearch.toml").exists() {
                Self::from_file("psearch.toml")?
            } else {
                Self::default()
            }
        };

        config.merge_env();
        config.validate()?;

        Ok(config)
    }

    /// Merge configuration with environment variables
    pub fn merge_env(&mut self) {
        if let Ok(dir) = env::var("PSEARCH_NOTES_DIR") {
            self.notes.directory = PathBuf::from(dir);
        }
        if let Ok(dir) = env::var("PSEARCH_INDEX_DIR") {
            self.storage.index_dir = PathBuf::from(dir);
        }
        if let Ok(chunk_size) = env::var("PSEARCH_CHUNK_SIZE") {
            if let Ok(size) = chunk_size.parse() {
                self.indexing.chunk_size = size;
            }
        }
        if let Ok(overlap) = env::var("PSEARCH_CHUNK_OVERLAP") {
            if let Ok(o) = overlap.parse() {
                self.indexing.chunk_overlap = o;
            }
        }
        if let Ok(top_k) = env::var("PSEARCH_TOP_K") {
            if let Ok(k) = top_k.parse() {
                self.search.top_k = k;
            }
        }
        if let Ok(model) = env::var("PSEARCH_EMBED_MODEL") {
            self.embedding.model = model;
        }
        if let Ok(endpoint) = env::var("PSEARCH_OLLAMA_ENDPOINT") {
            self.embedding.endpoint = endpoint;
        }
        if let Ok(use_local) = env::var("PSEARCH_USE_LOCAL_EMBEDDINGS") {
            if let Ok(b) = use_local.parse() {
                self.embedding.use_local = b;
            }
        }
        if self.embedding.api_key.is_empty() {
            if let Ok(key) = env::var("OPENAI_API_KEY") {
                self.embedding.api_key = key;
            }
        }
        if let Ok(enabled) = env::var("PSEARCH_RERANK") {
            if let Ok(b) = enabled.parse() {
                self.scorer.enabled = b;
            }
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.indexing.chunk_size == 0 {
            return Err(PsearchError::ConfigError(
                "chunk_size must be greater than 0".to_string(),
            ));
        }
        if self.indexing.chunk_overlap >= self.indexing.chunk_size {
            return Err(PsearchError::ConfigError(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.indexing.chunk_overlap, self.indexing.chunk_size
            )));
        }
        if self.search.top_k == 0 {
            return Err(PsearchError::ConfigError(
                "top_k must be at least 1".to_string(),
            ));
        }
        if self.search.top_k > self.search.max_k {
            return Err(PsearchError::ConfigError(format!(
                "top_k ({}) must not exceed max_k ({})",
                self.search.top_k, self.search.max_k
            )));
        }
        Ok(())
    }

    /// Log the effective configuration at startup
    pub fn log_config(&self) {
        tracing::info!("Notes directory: {:?}", self.notes.directory);
        tracing::info!("Index directory: {:?}", self.storage.index_dir);
        tracing::info!(
            "Chunking: size={} overlap={}",
            self.indexing.chunk_size,
            self.indexing.chunk_overlap
        );
        tracing::info!(
            "Embedding: {} ({})",
            if self.embedding.use_local {
                &self.embedding.model
            } else {
                &self.embedding.remote_model
            },
            if self.embedding.use_local {
                "local"
            } else {
                "remote"
            }
        );
        tracing::info!(
            "Re-ranking: {}",
            if self.scorer.enabled {
                self.scorer.model.as_str()
            } else {
                "disabled"
            }
        );
    }
}
