//! Index command - index notes into the vector store

use crate::cli::output::{colors, format_duration};
use crate::cli::OutputFormat;
use crate::core::services::Services;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

/// Arguments for the index command
#[derive(Args, Debug)]
pub struct IndexArgs {
    /// Notes directory to index (defaults to the configured one)
    #[arg(long, short = 'p')]
    pub path: Option<PathBuf>,

    /// Force reindex: destroy all existing entries first
    #[arg(long, short = 'f')]
    pub force: bool,
}

/// Indexing result response
#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub notes_dir: String,
    pub index_dir: String,
    pub files_loaded: usize,
    pub files_skipped: usize,
    pub chunks_indexed: usize,
    pub duration_secs: f64,
}

/// Execute the index command
pub async fn execute(
    args: IndexArgs,
    services: &Services,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    // A one-off --path overrides the configured notes directory
    let overridden;
    let services = match args.path {
        Some(path) => {
            if !path.is_dir() {
                return Err(format!(
                    "Notes directory '{}' does not exist. Create it first or check the path.",
                    path.display()
                )
                .into());
            }
            let mut config = (*services.config).clone();
            config.notes.directory = path;
            overridden = Services::new(config)?;
            &overridden
        }
        None => services,
    };

    let notes_dir = services.config.notes.directory.clone();
    let index_dir = services.config.storage.index_dir.clone();

    if format == OutputFormat::Human {
        println!("{}", colors::label("Personal Search Engine - Indexer"));
        println!("Notes directory: {}", colors::file_path(&notes_dir.display().to_string()));
        println!("Index directory: {}", colors::file_path(&index_dir.display().to_string()));
    }

    let stats = services.pipeline().run(args.force).await?;

    let output = IndexResponse {
        notes_dir: notes_dir.display().to_string(),
        index_dir: index_dir.display().to_string(),
        files_loaded: stats.files_loaded,
        files_skipped: stats.files_skipped,
        chunks_indexed: stats.chunks_indexed,
        duration_secs: stats.duration_ms as f64 / 1000.0,
    };

    match format {
        OutputFormat::Human => {
            if output.chunks_indexed == 0 {
                println!("{}", colors::warning("No documents found to index"));
            } else {
                println!(
                    "{} Indexed {} chunks from {} files in {}",
                    colors::success("✓"),
                    colors::number(&output.chunks_indexed.to_string()),
                    colors::number(&output.files_loaded.to_string()),
                    format_duration(output.duration_secs)
                );
            }
            if output.files_skipped > 0 {
                println!(
                    "{}",
                    colors::warning(&format!("{} files skipped", output.files_skipped))
                );
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
