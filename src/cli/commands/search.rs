//! Search command - query the indexed notes

use crate::cli::output::{colors, truncate_chars};
use crate::cli::OutputFormat;
use crate::core::services::Services;
use crate::core::types::SearchResult;
use clap::Args;
use serde::Serialize;

/// Arguments for the search command
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Search query (multiple words are joined)
    #[arg(required = true)]
    pub query: Vec<String>,

    /// Number of results to return
    #[arg(long, short = 'k')]
    pub top_k: Option<usize>,

    /// Show full content of results
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Skip LLM re-ranking for this query
    #[arg(long)]
    pub no_rerank: bool,
}

/// Search result item for output
#[derive(Debug, Serialize)]
pub struct SearchResultItem {
    pub rank: usize,
    pub file: String,
    pub source: String,
    pub score: f32,
    pub modified_at: String,
    pub content: String,
}

/// Search response for output
#[derive(Debug, Serialize)]
pub struct SearchResponseOutput {
    pub query: String,
    pub total_results: usize,
    pub results: Vec<SearchResultItem>,
}

/// Execute the search command
pub async fn execute(
    args: SearchArgs,
    services: &Services,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let query = args.query.join(" ");

    // Display options never change search semantics; disabling the
    // scorer does, and is an explicit flag.
    let services = if args.no_rerank {
        let mut stripped = services.clone();
        stripped.scorer = None;
        stripped
    } else {
        services.clone()
    };

    let Some(engine) = services.open_engine()? else {
        println!(
            "{}",
            colors::warning("No index found. Please run 'psearch index' first.")
        );
        return Ok(());
    };

    let results = engine.search(&query, args.top_k).await?;
    render_results(&query, &results, args.verbose, format)
}

/// Render a result list in the requested format. Shared with the
/// interactive command.
pub fn render_results(
    query: &str,
    results: &[SearchResult],
    verbose: bool,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let output = SearchResponseOutput {
        query: query.to_string(),
        total_results: results.len(),
        results: results
            .iter()
            .enumerate()
            .map(|(i, r)| SearchResultItem {
                rank: i + 1,
                file: r.filename.clone(),
                source: r.source.display().to_string(),
                score: r.score,
                modified_at: r.modified_at.to_rfc3339(),
                content: r.content.clone(),
            })
            .collect(),
    };

    match format {
        OutputFormat::Human => {
            if output.results.is_empty() {
                println!("{}", colors::warning("No results found."));
                return Ok(());
            }

            println!(
                "\nFound {} result(s) for: {}\n",
                colors::number(&output.total_results.to_string()),
                colors::label(query)
            );

            for result in &output.results {
                println!(
                    "[{}] {} {}",
                    colors::rank(&result.rank.to_string()),
                    colors::file_path(&result.file),
                    colors::dim(&format!("(score: {:.3})", result.score))
                );
                println!(
                    "    {}",
                    colors::dim(&format!(
                        "{} · modified {}",
                        result.source, result.modified_at
                    ))
                );

                let content = if verbose {
                    result.content.clone()
                } else {
                    truncate_chars(&result.content, 500)
                };
                for line in content.lines().take(if verbose { usize::MAX } else { 8 }) {
                    println!("    {}", truncate_chars(line, 100));
                }
                println!();
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
