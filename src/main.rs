//! psearch CLI entry point
//!
//! # Examples
//!
//! ```bash
//! # Index the configured notes directory
//! psearch index
//!
//! # Index a specific directory from scratch
//! psearch index --path ~/notes --force
//!
//! # Search
//! psearch search "rust borrow checker"
//!
//! # Show configuration
//! psearch info
//! ```

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use psearch::cli::{run, Cli};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "psearch=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
