// Copyright (c) 2026 YES INDIA Foundation
// SPDX-License-Identifier: AGPL-3.0

//! Command implementations for the alumni CLI

pub mod export;
pub mod serve;

pub use self::export::ExportArgs;
pub use self::serve::ServeArgs;

use anyhow::{Context, Result};
use clap::Args;

use alumni_connect_core::infrastructure::firebase::FirebaseConfig;
use alumni_connect_core::infrastructure::RegistryBackend;

/// Backend selection shared by the subcommands.
#[derive(Args)]
pub struct BackendArgs {
    /// Run against in-memory stores instead of Firebase (nothing persists)
    #[arg(long)]
    pub offline: bool,

    /// Realtime Database root URL
    #[arg(long, env = "ALUMNI_DATABASE_URL", value_name = "URL")]
    pub database_url: Option<String>,

    /// Cloud Storage bucket for alumni photos
    #[arg(long, env = "ALUMNI_STORAGE_BUCKET", value_name = "BUCKET")]
    pub storage_bucket: Option<String>,

    /// Firebase web API key (Identity Toolkit)
    #[arg(long, env = "ALUMNI_API_KEY", value_name = "KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Server-side reCAPTCHA secret
    #[arg(
        long,
        env = "ALUMNI_RECAPTCHA_SECRET",
        value_name = "SECRET",
        hide_env_values = true
    )]
    pub recaptcha_secret: Option<String>,
}

impl BackendArgs {
    pub fn resolve(&self) -> Result<RegistryBackend> {
        if self.offline {
            return Ok(RegistryBackend::InMemory);
        }
        Ok(RegistryBackend::Firebase(FirebaseConfig::new(
            self.require("--database-url", "ALUMNI_DATABASE_URL", &self.database_url)?,
            self.require("--storage-bucket", "ALUMNI_STORAGE_BUCKET", &self.storage_bucket)?,
            self.require("--api-key", "ALUMNI_API_KEY", &self.api_key)?,
            self.require(
                "--recaptcha-secret",
                "ALUMNI_RECAPTCHA_SECRET",
                &self.recaptcha_secret,
            )?,
        )))
    }

    fn require(&self, flag: &str, env: &str, value: &Option<String>) -> Result<String> {
        value
            .clone()
            .with_context(|| format!("{flag} (or {env}) is required unless --offline is set"))
    }

    /// The database URL alone, for read-only commands.
    pub fn require_database_url(&self) -> Result<String> {
        self.require("--database-url", "ALUMNI_DATABASE_URL", &self.database_url)
    }
}
