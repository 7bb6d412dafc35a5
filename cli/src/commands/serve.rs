// Copyright (c) 2026 YES INDIA Foundation
// SPDX-License-Identifier: AGPL-3.0
//! Serve Command
//!
//! Runs the registration and dashboard HTTP server: wires the chosen
//! backend into the application services, mounts the REST API, and
//! shuts the live-feed mirror down with the listener.
//!
//! # Architecture
//!
//! - **Layer:** CLI/Presentation
//! - **Purpose:** Process entry point for the registry server
//!
//! # Usage
//!
//! ```bash
//! # Against the Firebase project configured in the environment
//! alumni serve
//!
//! # Local development without any external services
//! alumni serve --offline
//! ```

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use alumni_connect_core::application::auth::AuthService;
use alumni_connect_core::application::dashboard::DashboardService;
use alumni_connect_core::application::registration::RegistrationService;
use alumni_connect_core::infrastructure::create_backend;
use alumni_connect_core::presentation::api::{app, AppState};

use super::BackendArgs;

#[derive(Args)]
pub struct ServeArgs {
    /// Address to listen on
    #[arg(long, env = "ALUMNI_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(long, env = "ALUMNI_PORT", default_value = "8000")]
    port: u16,

    #[command(flatten)]
    backend: BackendArgs,
}

pub async fn execute(args: ServeArgs) -> Result<()> {
    println!("{}", "Alumni Connect Server".bold().green());

    let handles = create_backend(args.backend.resolve()?);
    let registration = Arc::new(RegistrationService::new(handles.gateway));
    let dashboard = Arc::new(
        DashboardService::spawn(handles.feed)
            .await
            .context("Failed to subscribe to the alumni directory feed")?,
    );
    let auth = Arc::new(AuthService::new(handles.captcha, handles.credentials));

    let router = app(AppState {
        registration,
        dashboard: Arc::clone(&dashboard),
        auth,
    })
    .layer(TraceLayer::new_for_http())
    .layer(CorsLayer::permissive());

    let addr = listen_addr(&args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(%addr, "registry server listening");
    println!("Listening on {}", addr.cyan());

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // The mirror's feed subscription must not outlive the listener.
    dashboard.shutdown();
    info!("registry server stopped");
    Ok(())
}

fn listen_addr(host: &str, port: u16) -> String {
    format!("{host}:{port}")
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to install the Ctrl+C handler");
        return;
    }
    info!("shutdown requested");
}
