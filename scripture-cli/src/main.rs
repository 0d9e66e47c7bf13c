use std::io;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod commands;

#[derive(Parser)]
#[command(
    name = "scripture-cli",
    about = "Normalize scripture chapter payloads into display blocks",
    long_about = "A CLI tool that turns tagged JSON, legacy HTML or verse array chapter payloads into ordered content blocks"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize one chapter payload and print the result
    Normalize(commands::normalize::Normalize),
    /// List accepted source format identifiers
    Formats(commands::formats::Formats),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over the verbosity flag when set
    let filter = if cli.verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(io::stderr),
        )
        .with(env_filter)
        .init();

    match &cli.command {
        Commands::Normalize(cmd) => cmd.execute(),
        Commands::Formats(cmd) => cmd.execute(),
    }
}
