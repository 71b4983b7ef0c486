//! specsift - submittal product extraction pipeline.
//!
//! A tool for sifting construction submittal PDFs into product schedules:
//! pages are pre-filtered by text heuristics, classified with a vision
//! language model, and the extracted products are aggregated into CSV.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use specsift::cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (before anything else)
    let _ = dotenvy::dotenv();

    // Initialize logging based on verbosity
    let default_filter = if cli::is_verbose() {
        "specsift=info"
    } else {
        "specsift=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Run CLI
    cli::run().await
}
