//! Persistent vector store with nearest-neighbor retrieval.
//!
//! Entries live under the index directory as one JSON line each
//! (`entries.jsonl`), alongside a `meta.json` recording the
//! embedding model and vector dimension. Appending new entries
//! never rewrites existing ones; only a rebuild destroys the store.
//! Retrieval is brute-force cosine distance over all entries, which
//! is exact and plenty fast for a personal notes collection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::core::embedding::EmbeddingProvider;
use crate::core::error::{PsearchError, Result};
use crate::core::types::{Chunk, ChunkMetadata};

const ENTRIES_FILE: &str = "entries.jsonl";
const META_FILE: &str = "meta.json";

/// One stored chunk with its embedding. Owned exclusively by the
/// store; never mutated after being written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Store-assigned id, unique within the store
    pub id: u64,

    /// Chunk text
    pub text: String,

    /// Provenance metadata (always present)
    pub metadata: ChunkMetadata,

    /// Unit-length embedding vector
    pub embedding: Vec<f32>,
}

/// Store-level metadata, written once at creation
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoreMeta {
    embedding_model: String,
    dimension: usize,
    created_at: DateTime<Utc>,
}

/// Metadata equality filter for queries
#[derive(Debug, Clone, Default)]
pub struct MetadataFilter {
    /// Restrict to entries from this source path
    pub source: Option<PathBuf>,

    /// Restrict to entries with this file name
    pub filename: Option<String>,
}

impl MetadataFilter {
    fn matches(&self, metadata: &ChunkMetadata) -> bool {
        if let Some(source) = &self.source {
            if &metadata.source != source {
                return false;
            }
        }
        if let Some(filename) = &self.filename {
            if &metadata.filename != filename {
                return false;
            }
        }
        true
    }
}

/// Persistent vector index over embedded chunks
pub struct VectorIndex {
    dir: PathBuf,
    provider: Arc<dyn EmbeddingProvider>,
    meta: StoreMeta,
    entries: Vec<IndexEntry>,
}

impl std::fmt::Debug for VectorIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VectorIndex")
            .field("dir", &self.dir)
            .field("model", &self.meta.embedding_model)
            .field("entries", &self.entries.len())
            .finish()
    }
}

impl VectorIndex {
    /// True when a non-empty store exists at `dir`
    pub fn exists(dir: &Path) -> bool {
        let entries = dir.join(ENTRIES_FILE);
        entries
            .metadata()
            .map(|m| m.is_file() && m.len() > 0)
            .unwrap_or(false)
    }

    /// Open an existing store.
    ///
    /// A missing or empty store is not an error: `Ok(None)` tells
    /// the caller the directory needs indexing first.
    pub fn open(dir: &Path, provider: Arc<dyn EmbeddingProvider>) -> Result<Option<Self>> {
        if !Self::exists(dir) {
            return Ok(None);
        }

        let meta: StoreMeta =
            serde_json::from_str(&fs::read_to_string(dir.join(META_FILE)).map_err(|e| {
                PsearchError::StorageError(format!("Failed to read store metadata: {e}"))
            })?)?;

        if meta.embedding_model != provider.model() {
            return Err(PsearchError::StorageError(format!(
                "Index was built with embedding model '{}' but '{}' is configured; \
                 re-index with --force",
                meta.embedding_model,
                provider.model()
            )));
        }

        let entries = read_entries(&dir.join(ENTRIES_FILE))?;
        if entries.is_empty() {
            return Ok(None);
        }

        tracing::debug!("Opened vector store with {} entries", entries.len());

        Ok(Some(Self {
            dir: dir.to_path_buf(),
            provider,
            meta,
            entries,
        }))
    }

    /// Create a store from scratch, embedding and writing all given
    /// chunks. An embedding-provider failure aborts the call and
    /// leaves no store behind.
    pub async fn create(
        dir: &Path,
        provider: Arc<dyn EmbeddingProvider>,
        chunks: &[Chunk],
    ) -> Result<Self> {
        let entries = embed_chunks(provider.as_ref(), chunks, 0).await?;
        let dimension = entries.first().map(|e| e.embedding.len()).unwrap_or(0);

        fs::create_dir_all(dir)?;
        let meta = StoreMeta {
            embedding_model: provider.model().to_string(),
            dimension,
            created_at: Utc::now(),
        };
        fs::write(dir.join(META_FILE), serde_json::to_string_pretty(&meta)?)?;
        write_entries(&dir.join(ENTRIES_FILE), &entries, false)?;

        tracing::info!("Created vector store with {} entries", entries.len());

        Ok(Self {
            dir: dir.to_path_buf(),
            provider,
            meta,
            entries,
        })
    }

    /// Embed and append chunks without disturbing stored entries.
    /// Returns the number of entries added.
    pub async fn add(&mut self, chunks: &[Chunk]) -> Result<usize> {
        let next_id = self.entries.iter().map(|e| e.id + 1).max().unwrap_or(0);
        let new_entries = embed_chunks(self.provider.as_ref(), chunks, next_id).await?;

        if let Some(entry) = new_entries.first() {
            if self.meta.dimension != 0 && entry.embedding.len() != self.meta.dimension {
                return Err(PsearchError::StorageError(format!(
                    "Embedding dimension changed from {} to {}",
                    self.meta.dimension,
                    entry.embedding.len()
                )));
            }
        }

        write_entries(&self.dir.join(ENTRIES_FILE), &new_entries, true)?;
        let added = new_entries.len();
        self.entries.extend(new_entries);

        tracing::info!("Appended {added} entries to vector store");

        Ok(added)
    }

    /// Query the store for the `k` nearest chunks to `text`,
    /// ascending by cosine distance (lower = more similar).
    pub async fn query(
        &self,
        text: &str,
        k: usize,
        filter: Option<&MetadataFilter>,
    ) -> Result<Vec<(Chunk, f32)>> {
        let query_vec = normalize(self.provider.embed_one(text).await?);

        let mut scored: Vec<(&IndexEntry, f32)> = self
            .entries
            .iter()
            .filter(|e| filter.map_or(true, |f| f.matches(&e.metadata)))
            .map(|e| (e, cosine_distance(&query_vec, &e.embedding)))
            .collect();

        scored.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);

        Ok(scored
            .into_iter()
            .map(|(e, distance)| {
                (
                    Chunk {
                        text: e.text.clone(),
                        metadata: e.metadata.clone(),
                    },
                    distance,
                )
            })
            .collect())
    }

    /// Destroy all entries at `dir`. Used by force-reindex before a
    /// subsequent `create`.
    pub fn rebuild(dir: &Path) -> Result<()> {
        if dir.exists() {
            fs::remove_dir_all(dir)?;
            tracing::info!("Removed existing vector store at {:?}", dir);
        }
        Ok(())
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Embed chunk texts in one provider batch and pair them with ids
/// starting at `first_id`.
async fn embed_chunks(
    provider: &dyn EmbeddingProvider,
    chunks: &[Chunk],
    first_id: u64,
) -> Result<Vec<IndexEntry>> {
    let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
    let vectors = provider.embed(&texts).await?;

    if vectors.len() != chunks.len() {
        return Err(PsearchError::EmbeddingFailed(format!(
            "Provider returned {} vectors for {} chunks",
            vectors.len(),
            chunks.len()
        )));
    }

    Ok(chunks
        .iter()
        .zip(vectors)
        .enumerate()
        .map(|(i, (chunk, vector))| IndexEntry {
            id: first_id + i as u64,
            text: chunk.text.clone(),
            metadata: chunk.metadata.clone(),
            embedding: normalize(vector),
        })
        .collect())
}

fn read_entries(path: &Path) -> Result<Vec<IndexEntry>> {
    let file = File::open(path)
        .map_err(|e| PsearchError::StorageError(format!("Failed to open {path:?}: {e}")))?;
    let reader = BufReader::new(file);

    let mut entries = Vec::new();
    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let entry: IndexEntry = serde_json::from_str(&line).map_err(|e| {
            PsearchError::StorageError(format!(
                "Corrupt store entry at {path:?}:{}: {e}",
                line_no + 1
            ))
        })?;
        entries.push(entry);
    }
    Ok(entries)
}

fn write_entries(path: &Path, entries: &[IndexEntry], append: bool) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(append)
        .write(true)
        .truncate(!append)
        .open(path)
        .map_err(|e| PsearchError::StorageError(format!("Failed to open {path:?}: {e}")))?;
    let mut writer = BufWriter::new(file);

    for entry in entries {
        serde_json::to_writer(&mut writer, entry)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

/// Scale a vector to unit length. Stored and query vectors are both
/// normalized, so cosine similarity reduces to a dot product.
fn normalize(v: Vec<f32>) -> Vec<f32> {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm <= 0.0 {
        return v;
    }
    v.into_iter().map(|x| x / norm).collect()
}

/// Cosine distance between two unit vectors: `1 - dot`, lower is
/// more similar.
fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    let n = a.len().min(b.len());
    let dot: f32 = (0..n).map(|i| a[i] * b[i]).sum();
    1.0 - dot
}
