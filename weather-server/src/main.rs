//! Binary crate for the `weather-server` service.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Serving the HTTP endpoints
//! - Interactive configuration

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod app;
mod cli;
mod page;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cmd = cli::Cli::parse();
    cmd.run().await
}
