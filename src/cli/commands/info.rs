//! Info command - show configuration and index status

use crate::cli::output::colors;
use crate::cli::OutputFormat;
use crate::core::embedding::EmbeddingProvider;
use crate::core::services::Services;
use crate::core::storage::VectorIndex;
use clap::Args;
use serde::Serialize;

/// Arguments for the info command
#[derive(Args, Debug)]
pub struct InfoArgs {}

/// Configuration info response
#[derive(Debug, Serialize)]
pub struct InfoResponse {
    pub version: String,
    pub notes_directory: String,
    pub index_directory: String,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub top_k: usize,
    pub embedding_model: String,
    pub use_local_embeddings: bool,
    pub rerank_enabled: bool,
    pub index_exists: bool,
}

/// Execute the info command
pub async fn execute(
    _args: InfoArgs,
    services: &Services,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = &services.config;

    let output = InfoResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        notes_directory: config.notes.directory.display().to_string(),
        index_directory: config.storage.index_dir.display().to_string(),
        chunk_size: config.indexing.chunk_size,
        chunk_overlap: config.indexing.chunk_overlap,
        top_k: config.search.top_k,
        embedding_model: services.embedder.model().to_string(),
        use_local_embeddings: config.embedding.use_local,
        rerank_enabled: services.scorer.is_some(),
        index_exists: VectorIndex::exists(&config.storage.index_dir),
    };

    match format {
        OutputFormat::Human => {
            println!("{}\n", colors::label("Personal Search Engine - Configuration"));
            println!("Version:           {}", output.version);
            println!("Notes directory:   {}", colors::file_path(&output.notes_directory));
            println!("Index directory:   {}", colors::file_path(&output.index_directory));
            println!("Chunk size:        {}", colors::number(&output.chunk_size.to_string()));
            println!("Chunk overlap:     {}", colors::number(&output.chunk_overlap.to_string()));
            println!("Default top k:     {}", colors::number(&output.top_k.to_string()));
            println!(
                "Embedding model:   {} ({})",
                output.embedding_model,
                if output.use_local_embeddings {
                    "local"
                } else {
                    "remote"
                }
            );
            println!(
                "Re-ranking:        {}",
                if output.rerank_enabled {
                    colors::success("enabled")
                } else {
                    colors::dim("disabled")
                }
            );
            println!(
                "Index exists:      {}",
                if output.index_exists {
                    colors::success("✓")
                } else {
                    colors::dim("✗")
                }
            );
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
