// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Health endpoints.

use axum::Json;
use axum::extract::State;
use chrono::Utc;
use serde_json::{Value, json};

use dorman_core::db;

use crate::state::AppState;

/// `GET /health`
///
/// Liveness probe; never touches the database.
pub async fn liveness(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "UP",
        "timestamp": Utc::now().to_rfc3339(),
        "uptime": state.started_at.elapsed().as_secs(),
        "environment": state.environment,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// `GET /api/v1/health/integrations`
///
/// Runs a cheap probe query through the pool and reports pool counters.
/// Always HTTP 200; `success: false` signals a failing integration.
pub async fn integrations(State(state): State<AppState>) -> Json<Value> {
    let stats = db::pool_stats(&state.pool);

    match db::ping(&state.pool).await {
        Ok(()) => Json(json!({
            "success": true,
            "database": {
                "driver": "sqlx-postgres",
                "ok": true,
                "pool": stats,
            },
        })),
        Err(err) => {
            tracing::warn!(error = %err, "database probe failed");
            Json(json!({
                "success": false,
                "database": {
                    "driver": "sqlx-postgres",
                    "ok": false,
                    "pool": stats,
                    "error": "probe query failed",
                },
            }))
        }
    }
}
