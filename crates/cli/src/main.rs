//! NextShop CLI - Catalog database tools.
//!
//! # Usage
//!
//! ```bash
//! # Check that the configured MongoDB deployment answers
//! nextshop-cli ping
//!
//! # Insert products from a YAML file
//! nextshop-cli seed products.yaml
//! ```
//!
//! Connection settings come from the same environment variables as the API
//! (`MONGO_URI`, or `DB_USER`/`DB_PASS`, plus `DB_NAME`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "nextshop-cli")]
#[command(author, version, about = "NextShop catalog CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect to MongoDB and run a ping
    Ping,
    /// Insert products from a YAML file
    Seed {
        /// Path to a YAML list of products
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Ping => commands::ping::run().await,
        Commands::Seed { file } => commands::seed::run(&file).await,
    }
}
