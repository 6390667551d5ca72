//! rubrica-cli: command-line client for the records API
//! Reuses the shared api-types crate for request/response shapes.
#![deny(clippy::all, clippy::pedantic)]

mod api;
mod args;
mod client;
mod handlers;
mod print;
mod state;


use clap::Parser;

use args::{Cli, Commands};
use client::{CliError, build_ctx_from_cli};
use handlers::{cache, health, posts, tasks, users, watch};

#[tokio::main]
async fn main() -> Result<(), CliError> {
    init_tracing();
    let cli = Cli::parse();
    let ctx = build_ctx_from_cli(&cli)?;

    match cli.command {
        Commands::Users(cmd) => users::handle(&ctx, cmd.action).await?,
        Commands::Tasks(cmd) => tasks::handle(&ctx, cmd.action).await?,
        Commands::Posts(cmd) => posts::handle(&ctx, cmd.action).await?,
        Commands::Cache(cmd) => cache::handle(&ctx, cmd.action).await?,
        Commands::Health => health::handle(&ctx).await?,
        Commands::WatchCache { interval } => watch::run(&ctx, interval).await?,
    }

    Ok(())
}

/// Diagnostics go to stderr so JSON output on stdout stays pipeable.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_env("RUBRICA_CLI_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
