//! Core data types for the psearch engine.
//!
//! This module defines the data structures shared across the
//! indexing pipeline, the vector store, and the search engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Provenance metadata attached to a document and inherited by all
/// of its chunks. Every entry in the vector store carries one of
/// these; an entry without provenance cannot exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Absolute path of the source file
    pub source: PathBuf,

    /// File name without directory components
    pub filename: String,

    /// Last-modified timestamp of the source file
    pub modified_at: DateTime<Utc>,

    /// SHA-256 digest of the raw file bytes, lowercase hex
    pub content_hash: String,
}

/// One loaded source file, ready for chunking.
///
/// `text` holds the decoded content with a synthetic header
/// (`Filename: ...\nPath: ...\n\n`) prepended so that queries
/// mentioning a file name retrieve chunks of that file. Documents
/// live only for the duration of an indexing run; they are dropped
/// once chunked.
#[derive(Debug, Clone)]
pub struct Document {
    /// Absolute path, unique within a run
    pub path: PathBuf,

    /// Header + decoded file content
    pub text: String,

    /// Provenance shared by every chunk of this document
    pub metadata: ChunkMetadata,
}

impl Document {
    /// Build the synthetic retrieval header for a file name and its
    /// parent directory name.
    pub fn header(filename: &str, parent: &str) -> String {
        format!("Filename: {filename}\nPath: {parent}/{filename}\n\n")
    }
}

/// A contiguous fragment of a document's text, the unit that is
/// embedded and retrieved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Fragment content, at most chunk_size characters plus the
    /// configured overlap carried over from the previous chunk
    pub text: String,

    /// Inherited from the parent document, identical per chunk
    pub metadata: ChunkMetadata,
}

/// Search result returned by a query.
///
/// `score` is a distance: lower means more relevant. Without a
/// relevance scorer it is the raw vector distance; with one it is
/// the blended score. Never persisted, recomputed per query.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    /// Chunk text content
    pub content: String,

    /// Source file path
    pub source: PathBuf,

    /// Source file name
    pub filename: String,

    /// Last-modified timestamp of the source file
    pub modified_at: DateTime<Utc>,

    /// Distance-like relevance score (lower = better)
    pub score: f32,
}

/// Statistics from an indexing run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexStats {
    /// Number of files successfully loaded
    pub files_loaded: usize,

    /// Number of files skipped due to load errors
    pub files_skipped: usize,

    /// Total chunks written to the vector store in this run
    pub chunks_indexed: usize,

    /// Run duration in milliseconds
    pub duration_ms: u64,
}
