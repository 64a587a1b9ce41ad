//! psearch - Semantic Search for Personal Notes
//!
//! Indexes a directory of text-like files into a persistent vector
//! store and answers natural-language queries against it, with
//! optional LLM re-ranking of the results.
//!
//! # Architecture
//!
//! The codebase is organized into two main modules:
//!
//! - **core**: Domain logic (presentation-agnostic)
//!   - config, error, types
//!   - indexer (path filtering, chunking, pipeline)
//!   - embedding (Ollama / OpenAI providers)
//!   - storage (persistent vector index)
//!   - search (retrieval + re-ranking), scorer
//!   - services (unified service container)
//!
//! - **cli**: Command-line adapter (depends on core)
//!   - commands, output formatting
//!
//! # Key Features
//!
//! - Incremental vector indexing with provenance metadata
//! - UTF-8 safe recursive chunking (character-based, never panics)
//! - Pluggable embedding provider (local Ollama or OpenAI API)
//! - Two-stage search: vector retrieval, then LLM re-ranking that
//!   degrades gracefully when no scorer is available

// Core domain logic (presentation-agnostic)
pub mod core;

// CLI adapter
pub mod cli;

// Re-export commonly used types for convenience
pub use core::config::Config;
pub use core::error::{PsearchError, Result};
pub use core::services::Services;
pub use core::types::*;
