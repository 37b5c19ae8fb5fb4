// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! PostgreSQL pool construction and connectivity probes.
//!
//! The pool is built exactly once by the process entry point and handed to
//! whoever needs it; nothing in this crate lazily initializes a global.

use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use crate::config::Config;

/// Build the connection pool described by the configuration.
///
/// Connects eagerly so a bad database URL fails at startup, not on the
/// first request.
pub async fn connect(config: &Config) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .min_connections(config.pool_min)
        .max_connections(config.pool_max)
        .acquire_timeout(Duration::from_secs(config.pool_acquire_timeout_secs))
        .connect(&config.database_url)
        .await?;

    info!(
        pool_min = config.pool_min,
        pool_max = config.pool_max,
        "Connected to database"
    );

    Ok(pool)
}

/// Cheap connectivity probe used by the integrations health check.
pub async fn ping(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(pool)
        .await?;
    Ok(())
}

/// Point-in-time pool counters reported by the health endpoint.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolStats {
    /// Configured pool ceiling.
    pub max: u32,
    /// Connections currently open.
    pub open: u32,
    /// Open connections currently idle in the pool.
    pub idle: usize,
}

/// Snapshot the pool's counters.
pub fn pool_stats(pool: &PgPool) -> PoolStats {
    PoolStats {
        max: pool.options().get_max_connections(),
        open: pool.size(),
        idle: pool.num_idle(),
    }
}
