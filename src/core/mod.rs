//! Core domain logic (presentation-agnostic)
//!
//! This module contains all engine logic that is independent of
//! how psearch is driven (CLI today, anything else tomorrow).
//!
//! # Architecture
//!
//! - **config**: Configuration loading (TOML + environment)
//! - **error**: Error types and Result alias
//! - **types**: Domain data structures
//! - **embedding**: Embedding providers (Ollama, OpenAI)
//! - **scorer**: Relevance scorer for re-ranking
//! - **storage**: Persistent vector index
//! - **search**: Two-stage search and re-ranking
//! - **indexer**: Path filtering, chunking, indexing pipeline
//! - **services**: Unified service container

pub mod config;
pub mod embedding;
pub mod error;
pub mod indexer;
pub mod scorer;
pub mod search;
pub mod services;
pub mod storage;
pub mod types;

// Re-export key types for convenience
pub use config::Config;
pub use error::{PsearchError, Result};
pub use services::Services;
