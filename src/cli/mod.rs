//! CLI adapter for psearch
//!
//! Provides the command-line interface over the core engine. This
//! module is presentation glue only: it parses arguments, calls
//! into `core/` and renders results. Display options never affect
//! search semantics.

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};

/// psearch - Personal Search Engine
///
/// Search through your notes and code snippets with semantic
/// vector retrieval and optional LLM re-ranking.
#[derive(Parser, Debug)]
#[command(name = "psearch")]
#[command(version)]
#[command(about = "Semantic search for personal notes", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "human")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output for scripting
    Json,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::Human
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Index notes into the vector store
    Index(commands::IndexArgs),

    /// Search through indexed notes
    Search(commands::SearchArgs),

    /// Interactive search mode
    Interactive(commands::InteractiveArgs),

    /// Show configuration and index status
    Info(commands::InfoArgs),

    /// Clear the search index
    Clear(commands::ClearArgs),
}

/// Run the CLI with the provided arguments
pub async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    use crate::core::config::Config;
    use crate::core::services::Services;

    // Load configuration
    let config = Config::load()?;

    // Create services (validates provider configuration up front)
    let services = Services::new(config)?;

    // Execute command
    match cli.command {
        Commands::Index(args) => commands::index::execute(args, &services, cli.format).await,
        Commands::Search(args) => commands::search::execute(args, &services, cli.format).await,
        Commands::Interactive(args) => {
            commands::interactive::execute(args, &services, cli.format).await
        }
        Commands::Info(args) => commands::info::execute(args, &services, cli.format).await,
        Commands::Clear(args) => commands::clear::execute(args, &services, cli.format).await,
    }
}
