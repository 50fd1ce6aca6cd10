//! Standalone learnrec MCP Server
//!
//! Serves the recommendation engine over MCP stdio. The dataset comes from a
//! JSON file, or the bundled sample catalog when none is given.

use anyhow::Context;
use clap::Parser;
use learnrec::{Dataset, LearnRecServer, MemoryStore};
use rmcp::{transport::stdio, ServiceExt};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "learnrec-server")]
#[command(about = "Learning content recommendation engine - MCP Server")]
struct Args {
    /// JSON dataset with people, items and interactions (defaults to the bundled sample)
    #[arg(long)]
    dataset: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging; stdout carries the MCP transport
    let log_level = if args.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("learnrec={log_level},rmcp=warn")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    tracing::info!("Starting learnrec MCP Server");
    tracing::info!("learnrec version: {}", learnrec::VERSION);

    let store = match &args.dataset {
        Some(path) => MemoryStore::load(path)
            .await
            .with_context(|| format!("Failed to load dataset from {}", path.display()))?,
        None => {
            tracing::info!("No dataset given, using the bundled sample catalog");
            let dataset = Dataset::sample().context("Failed to parse bundled sample catalog")?;
            MemoryStore::new(dataset).context("Bundled sample catalog is invalid")?
        }
    };

    let service = LearnRecServer::new(store)
        .serve(stdio())
        .await
        .inspect_err(|e| tracing::error!("Failed to start MCP service: {e:?}"))?;

    service.waiting().await?;
    tracing::info!("learnrec MCP Server stopped");

    Ok(())
}
