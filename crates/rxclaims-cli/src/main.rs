//! rxclaims CLI
//!
//! Ask grounded questions about pharmacy claims.

use anyhow::Result;
use clap::Parser;
use rxclaims_core::error::exit_codes;
use rxclaims_core::RxClaimsError;

mod app;
mod commands;
mod output;

use app::{Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so answers stay pipeable
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(exit_code(&e));
    }
}

async fn run(cli: Cli) -> Result<()> {
    match &cli.command {
        Commands::Ask(args) => commands::ask::run(args, &cli).await,
        Commands::Chat => commands::chat::run(&cli).await,
        Commands::Inspect(args) => commands::inspect::run(args, &cli).await,
        Commands::Status => commands::status::run(&cli).await,
    }
}

fn exit_code(error: &anyhow::Error) -> i32 {
    error
        .downcast_ref::<RxClaimsError>()
        .map_or(exit_codes::GENERAL_ERROR, RxClaimsError::exit_code)
}
