// Copyright (c) 2026 YES INDIA Foundation
// SPDX-License-Identifier: AGPL-3.0
//! Export Command
//!
//! Fetches the alumni directory and writes it to a CSV file, with the
//! same batch filter and free-text search the dashboard offers.
//!
//! # Architecture
//!
//! - **Layer:** CLI/Presentation
//! - **Purpose:** One-shot directory export without a running server
//!
//! # Usage
//!
//! ```bash
//! # Everything, into a dated file in the current directory
//! alumni export
//!
//! # One graduation batch, into a chosen file
//! alumni export --batch 2019 --output batch-2019.csv
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;
use colored::Colorize;

use alumni_connect_core::application::dashboard::{filter_alumni, sort_newest_first, DirectoryFilter};
use alumni_connect_core::application::export::{export_csv, export_filename};
use alumni_connect_core::infrastructure::firebase::RealtimeDbClient;
use alumni_connect_core::presentation::api::EXPORT_PREFIX;

use super::BackendArgs;

#[derive(Args)]
pub struct ExportArgs {
    /// Output file (default: a dated name in the current directory)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Keep only one graduation batch (exact match)
    #[arg(long, value_name = "YEAR")]
    batch: Option<String>,

    /// Case-insensitive search over name, school, job, company, place,
    /// qualification, and mobile number
    #[arg(long, value_name = "TERM")]
    search: Option<String>,

    #[command(flatten)]
    backend: BackendArgs,
}

pub async fn execute(args: ExportArgs) -> Result<()> {
    println!("{}", "Alumni Directory Export".bold().green());

    let database = RealtimeDbClient::new(args.backend.require_database_url()?);
    let snapshot = database
        .fetch_snapshot()
        .await
        .context("Failed to fetch the alumni directory")?;

    let mut rows = snapshot.alumni;
    sort_newest_first(&mut rows);
    let rows = filter_alumni(
        &rows,
        &DirectoryFilter {
            batch: args.batch,
            search: args.search,
        },
    );

    let path = args.output.unwrap_or_else(default_output);
    std::fs::write(&path, export_csv(&rows))
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!(
        "{} {} rows written to {}",
        "✓".green(),
        rows.len(),
        path.display().to_string().cyan()
    );
    Ok(())
}

fn default_output() -> PathBuf {
    PathBuf::from(export_filename(EXPORT_PREFIX, Utc::now().date_naive()))
}
