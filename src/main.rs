mod cli;
mod config;
mod corpus;
mod error;
mod export;
mod graph;
mod render;
mod session;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing - only show warnings by default, use RUST_LOG=info for more detail
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();
    let global = &cli.global;

    match cli.command {
        Commands::Init { force } => {
            cli::commands::init::run(force, global.config.clone()).await?;
        }
        Commands::Titles { filter } => {
            cli::commands::titles::run(global, filter).await?;
        }
        Commands::Read {
            title,
            highlight,
            output,
        } => {
            cli::commands::read::run(global, title, highlight, output).await?;
        }
        Commands::Graph {
            document_id,
            sentence_id,
            format,
            output,
        } => {
            cli::commands::graph::run(global, document_id, sentence_id, format, output).await?;
        }
        Commands::Excerpt { node_key } => {
            cli::commands::excerpt::run(global, node_key).await?;
        }
        Commands::Viz {
            document_id,
            sentence_id,
            output,
            no_open,
        } => {
            cli::commands::viz::run(global, document_id, sentence_id, output, no_open).await?;
        }
        Commands::Explore { html } => {
            cli::commands::explore::run(global, html).await?;
        }
        Commands::Stats => {
            cli::commands::stats::run(global).await?;
        }
    }

    Ok(())
}
