//! Document indexing module.
//!
//! Handles path filtering, text chunking and pipeline
//! orchestration for building the vector index:
//!
//! - Eligibility filtering (excluded directories, extension
//!   allow-list, binary sniffing)
//! - UTF-8 safe recursive chunking with overlap
//! - Parallel document loading with a bounded worker pool
//!
//! # Safety
//!
//! The chunker measures sizes in characters and only ever slices
//! on character boundaries, so files containing emojis or other
//! multi-byte sequences never cause panics.

pub mod chunker;
pub mod filter;
pub mod pipeline;

pub use chunker::Chunker;
pub use filter::{is_under_vcs_dir, PathFilter};
pub use pipeline::IndexingPipeline;
