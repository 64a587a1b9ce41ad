//! Error types and error handling for psearch.
//!
//! This module defines the error types used throughout the
//! application. Presentation-specific handling (exit codes, colored
//! messages) lives in the CLI adapter.

use thiserror::Error;

/// Result type alias for psearch operations
pub type Result<T> = std::result::Result<T, PsearchError>;

/// Main error type for the psearch engine
#[derive(Error, Debug)]
pub enum PsearchError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Indexing failed: {0}")]
    IndexingFailed(String),

    #[error("Embedding failed: {0}")]
    EmbeddingFailed(String),

    #[error("Scoring failed: {0}")]
    ScoringFailed(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Search failed: {0}")]
    SearchFailed(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl PsearchError {
    /// Get user-friendly error message
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Check if this error was caused by bad user input
    pub fn is_bad_request(&self) -> bool {
        matches!(
            self,
            PsearchError::InvalidQuery(_)
                | PsearchError::InvalidPath(_)
                | PsearchError::ConfigError(_)
        )
    }

    /// Check if this is a provider-side failure (embedding or scoring model)
    pub fn is_provider_error(&self) -> bool {
        matches!(
            self,
            PsearchError::EmbeddingFailed(_) | PsearchError::ScoringFailed(_)
        )
    }
}
