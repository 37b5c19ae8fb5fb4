// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Dorman Server - backoffice HTTP API entry point.
//!
//! Owns the process lifecycle: configuration, pool construction, serving,
//! and teardown. Nothing else in the codebase initializes shared resources.

use tracing::{info, warn};

use dorman_core::config::Config;
use dorman_core::db;
use dorman_server::{AppState, app};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dorman_server=info,dorman_core=info".into()),
        )
        .init();

    // Load .env file if present
    if let Err(e) = dotenvy::dotenv() {
        warn!("No .env file loaded: {}", e);
    }

    // Load configuration
    let config = Config::from_env()?;

    info!(
        http_addr = %config.http_addr,
        environment = %config.environment,
        "Starting Dorman Backoffice API"
    );

    // Connect to database (eager: a bad URL fails here, not on first request)
    let pool = db::connect(&config).await?;

    let state = AppState::new(pool.clone(), config.environment.clone());
    let router = app(state, &config.cors_allowed_origins);

    let listener = tokio::net::TcpListener::bind(config.http_addr).await?;
    info!(addr = %config.http_addr, "Backoffice API ready");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutdown signal received");

    // Graceful teardown: drain the pool we constructed.
    pool.close().await;

    info!("Dorman Backoffice API shut down");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
    }
}
