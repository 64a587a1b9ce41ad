//! Clear command - delete the search index

use crate::cli::output::colors;
use crate::cli::OutputFormat;
use crate::core::services::Services;
use crate::core::storage::VectorIndex;
use clap::Args;
use serde::Serialize;
use std::io::{self, BufRead, Write};

/// Arguments for the clear command
#[derive(Args, Debug)]
pub struct ClearArgs {
    /// Skip confirmation
    #[arg(long, short = 'y')]
    pub yes: bool,
}

/// Clear result response
#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub index_directory: String,
    pub cleared: bool,
}

/// Execute the clear command
pub async fn execute(
    args: ClearArgs,
    services: &Services,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let index_dir = &services.config.storage.index_dir;

    if !index_dir.exists() {
        match format {
            OutputFormat::Human => println!("{}", colors::warning("No index to clear")),
            OutputFormat::Json => println!(
                "{}",
                serde_json::to_string_pretty(&ClearResponse {
                    index_directory: index_dir.display().to_string(),
                    cleared: false,
                })?
            ),
        }
        return Ok(());
    }

    if !args.yes && format == OutputFormat::Human {
        print!("Clear index at {}? [y/N] ", index_dir.display());
        io::stdout().flush()?;
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        if !matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes") {
            println!("{}", colors::warning("Cancelled"));
            return Ok(());
        }
    }

    VectorIndex::rebuild(index_dir)?;

    let output = ClearResponse {
        index_directory: index_dir.display().to_string(),
        cleared: true,
    };

    match format {
        OutputFormat::Human => {
            println!("{} Index cleared", colors::success("✓"));
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
