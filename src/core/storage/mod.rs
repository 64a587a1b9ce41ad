//! Storage layer for the persistent vector index.
//!
//! # On-disk layout
//!
//! ```text
//! {index_dir}/
//! ├── meta.json       # embedding model, dimension, created_at
//! └── entries.jsonl   # one IndexEntry per line, append-only
//! ```
//!
//! "An index exists" means `entries.jsonl` is present and
//! non-empty; its absence is a normal "needs indexing" condition,
//! not an error.

mod vector;

pub use vector::{IndexEntry, MetadataFilter, VectorIndex};
