//! Indexing pipeline orchestration.
//!
//! Coordinates the end-to-end indexing workflow:
//! 1. Walk the notes directory and filter eligible files
//! 2. Load documents (bounded worker pool)
//! 3. Chunk text
//! 4. Embed and write chunks into the vector store
//!
//! Stages run strictly in order; each consumes the full output of
//! the previous one. Per-file load failures are logged and skipped,
//! an embedding-provider failure aborts the run.

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::core::config::Config;
use crate::core::embedding::EmbeddingProvider;
use crate::core::error::{PsearchError, Result};
use crate::core::indexer::{Chunker, PathFilter};
use crate::core::storage::VectorIndex;
use crate::core::types::{Chunk, ChunkMetadata, Document, IndexStats};

/// Orchestrates the indexing pipeline
pub struct IndexingPipeline {
    notes_dir: PathBuf,
    index_dir: PathBuf,
    filter: PathFilter,
    chunker: Chunker,
    provider: Arc<dyn EmbeddingProvider>,
    load_concurrency: usize,
}

impl IndexingPipeline {
    /// Create a pipeline from configuration and an embedding
    /// provider
    pub fn new(config: &Config, provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            notes_dir: config.notes.directory.clone(),
            index_dir: config.storage.index_dir.clone(),
            filter: PathFilter::new(&config.indexing.extra_extensions),
            chunker: Chunker::new(config.indexing.chunk_size, config.indexing.chunk_overlap),
            provider,
            load_concurrency: config.indexing.load_concurrency,
        }
    }

    /// Run the full pipeline.
    ///
    /// With `force_reindex` an existing store is destroyed first;
    /// otherwise new entries are appended to it. Returns statistics
    /// including the number of chunks written in this run.
    pub async fn run(&self, force_reindex: bool) -> Result<IndexStats> {
        let start = Instant::now();

        if !self.notes_dir.is_dir() {
            return Err(PsearchError::InvalidPath(format!(
                "Notes directory {:?} does not exist",
                self.notes_dir
            )));
        }

        // Stage 1: discover and load documents
        tracing::info!("Loading documents from {:?}", self.notes_dir);
        let files = self.filter.collect_files(&self.notes_dir)?;
        tracing::info!("Found {} eligible files", files.len());

        let (documents, files_skipped) = self.load_documents(files).await;
        let files_loaded = documents.len();

        if documents.is_empty() {
            tracing::info!("No documents to index");
            return Ok(IndexStats {
                files_loaded,
                files_skipped,
                chunks_indexed: 0,
                duration_ms: start.elapsed().as_millis() as u64,
            });
        }

        // Stage 2: chunk every document. Chunk order within one
        // document is stable.
        let chunks: Vec<Chunk> = documents
            .iter()
            .flat_map(|doc| self.chunker.split(doc))
            .collect();
        tracing::info!("Split {} documents into {} chunks", files_loaded, chunks.len());

        // Stage 3: embed and store. Reindexing is additive unless
        // forced; force destroys all prior entries first.
        if force_reindex && VectorIndex::exists(&self.index_dir) {
            VectorIndex::rebuild(&self.index_dir)?;
        }

        let chunks_indexed = match VectorIndex::open(&self.index_dir, Arc::clone(&self.provider))? {
            Some(mut index) => index.add(&chunks).await?,
            None => {
                VectorIndex::create(&self.index_dir, Arc::clone(&self.provider), &chunks)
                    .await?
                    .len()
            }
        };

        let duration_ms = start.elapsed().as_millis() as u64;
        tracing::info!(
            "Indexing complete: {} files loaded, {} skipped, {} chunks in {}ms",
            files_loaded,
            files_skipped,
            chunks_indexed,
            duration_ms
        );

        Ok(IndexStats {
            files_loaded,
            files_skipped,
            chunks_indexed,
            duration_ms,
        })
    }

    /// Load files on a bounded worker pool. Ordering across
    /// documents is not significant; results are sorted by path so
    /// runs are reproducible.
    async fn load_documents(&self, files: Vec<PathBuf>) -> (Vec<Document>, usize) {
        let concurrency = if self.load_concurrency == 0 {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4)
        } else {
            self.load_concurrency
        };

        let semaphore = Arc::new(Semaphore::new(concurrency));
        let mut join_set = JoinSet::new();

        for path in files {
            let semaphore = Arc::clone(&semaphore);
            join_set.spawn(async move {
                // The semaphore is never closed while tasks run
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .expect("load semaphore closed");
                let loaded = tokio::task::spawn_blocking({
                    let path = path.clone();
                    move || load_document(&path)
                })
                .await;
                (path, loaded)
            });
        }

        let mut documents = Vec::new();
        let mut skipped = 0;

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((path, Ok(Ok(document)))) => {
                    tracing::debug!("Loaded {:?}", path);
                    documents.push(document);
                }
                Ok((path, Ok(Err(e)))) => {
                    tracing::warn!("Failed to load {:?}: {}", path, e);
                    skipped += 1;
                }
                Ok((path, Err(e))) => {
                    tracing::warn!("Load task for {:?} failed: {}", path, e);
                    skipped += 1;
                }
                Err(e) => {
                    tracing::warn!("Load task join error: {}", e);
                    skipped += 1;
                }
            }
        }

        documents.sort_by(|a, b| a.path.cmp(&b.path));
        (documents, skipped)
    }
}

/// Read, hash and decode one file into a document with the
/// synthetic retrieval header prepended.
fn load_document(path: &Path) -> Result<Document> {
    let bytes = fs::read(path)?;

    let modified_at = fs::metadata(path)?
        .modified()
        .map(DateTime::<Utc>::from)
        .unwrap_or_else(|_| Utc::now());

    let content_hash = format!("{:x}", Sha256::digest(&bytes));

    let content = decode_text(&bytes).ok_or_else(|| {
        PsearchError::IndexingFailed(format!("Skipping non-text content in {path:?}"))
    })?;

    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let parent = path
        .parent()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_default();

    let text = format!("{}{}", Document::header(&filename, &parent), content);

    Ok(Document {
        path: path.to_path_buf(),
        text,
        metadata: ChunkMetadata {
            source: path.to_path_buf(),
            filename,
            modified_at,
            content_hash,
        },
    })
}

/// Decode file bytes as UTF-8, falling back to a permissive
/// Latin-1 decode. NUL bytes mark the content as non-text.
fn decode_text(bytes: &[u8]) -> Option<String> {
    if bytes.contains(&0) {
        return None;
    }
    match std::str::from_utf8(bytes) {
        Ok(s) => Some(s.to_string()),
        Err(_) => Some(bytes.iter().map(|&b| b as char).collect()),
    }
}
