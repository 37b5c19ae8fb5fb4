// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Shared handler state.

use std::time::Instant;

use dorman_core::procedures::ProcedureRunner;
use sqlx::PgPool;

/// State injected into every handler.
///
/// Owns a handle to the one pool the process constructs at startup; cloning
/// is cheap (the pool is internally reference-counted).
#[derive(Clone)]
pub struct AppState {
    /// Connection pool for read queries and health probes.
    pub pool: PgPool,
    /// Coordinated batch procedure runner.
    pub runner: ProcedureRunner,
    /// Environment label reported by the health endpoints.
    pub environment: String,
    /// Process start, for uptime reporting.
    pub started_at: Instant,
}

impl AppState {
    /// Build state around an already-connected pool.
    pub fn new(pool: PgPool, environment: impl Into<String>) -> Self {
        Self {
            runner: ProcedureRunner::new(pool.clone()),
            pool,
            environment: environment.into(),
            started_at: Instant::now(),
        }
    }
}
