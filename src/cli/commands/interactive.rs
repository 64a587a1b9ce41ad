//! Interactive command - search in a read-eval loop

use crate::cli::commands::search::render_results;
use crate::cli::output::colors;
use crate::cli::OutputFormat;
use crate::core::services::Services;
use clap::Args;
use std::io::{self, BufRead, Write};

/// Arguments for the interactive command
#[derive(Args, Debug)]
pub struct InteractiveArgs {
    /// Show full content of results
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

/// Execute the interactive command
pub async fn execute(
    args: InteractiveArgs,
    services: &Services,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some(engine) = services.open_engine()? else {
        println!(
            "{}",
            colors::warning("No index found. Please run 'psearch index' first.")
        );
        return Ok(());
    };

    println!("{}", colors::label("Personal Search Engine - Interactive Mode"));
    println!("Type 'quit' or 'exit' to leave\n");

    let stdin = io::stdin();
    loop {
        print!("{} ", colors::label("Search>"));
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        let query = line.trim();

        if query.is_empty() {
            continue;
        }
        if matches!(query, "quit" | "exit" | "q") {
            break;
        }

        match engine.search(query, None).await {
            Ok(results) => render_results(query, &results, args.verbose, format)?,
            Err(e) => eprintln!("{} {}", colors::error("Error:"), e),
        }
    }

    println!("{}", colors::dim("Goodbye!"));
    Ok(())
}
