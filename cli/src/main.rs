// Copyright (c) 2026 YES INDIA Foundation
// SPDX-License-Identifier: AGPL-3.0

//! # Alumni Connect CLI
//!
//! The `alumni` binary runs the YES INDIA alumni registry.
//!
//! ## Commands
//!
//! - `alumni serve` - Run the registration and dashboard HTTP server
//! - `alumni export` - Write the alumni directory to a CSV file
//!
//! Firebase settings are read from `ALUMNI_*` environment variables (a
//! `.env` file is honored); `--offline` swaps in the in-memory backend
//! for local development.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

mod commands;

use commands::{ExportArgs, ServeArgs};

/// YES INDIA Alumni Connect - registration and dashboard backend
#[derive(Parser)]
#[command(name = "alumni")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "ALUMNI_LOG_LEVEL", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the registration and dashboard HTTP server
    Serve(ServeArgs),

    /// Write the (optionally filtered) alumni directory to a CSV file
    Export(ExportArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine; a malformed one is not.
    match dotenvy::dotenv() {
        Ok(_) => {}
        Err(err) if err.not_found() => {}
        Err(err) => return Err(err).context("Failed to load .env file"),
    }

    let cli = Cli::parse();
    init_logging(&cli.log_level)?;

    match cli.command {
        Commands::Serve(args) => commands::serve::execute(args).await,
        Commands::Export(args) => commands::export::execute(args).await,
    }
}

/// Initialize tracing subscriber for logging
fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("Failed to create log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    Ok(())
}
