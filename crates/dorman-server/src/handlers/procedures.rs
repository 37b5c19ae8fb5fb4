// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Administrative batch-procedure endpoints.

use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;
use tracing::info;

use dorman_core::procedures::{self, ProcedureOutcome};

use crate::api_error::{ApiError, ApiResult};
use crate::state::AppState;

/// Largest accepted lock wait, in seconds.
const TIMEOUT_MAX_SECS: i64 = 3600;

/// Optional `timeout` in the query string.
#[derive(Debug, Default, Deserialize)]
pub struct TimeoutQuery {
    /// Lock wait bound in seconds.
    pub timeout: Option<i64>,
}

/// Optional `timeout` in the JSON body.
#[derive(Debug, Default, Deserialize)]
pub struct TimeoutBody {
    /// Lock wait bound in seconds.
    pub timeout: Option<i64>,
}

/// `POST /api/v1/procedures/dormant-orchestrator`
///
/// Runs the dormant orchestrator, serialized through its advisory lock.
/// `timeout` (query or body, query wins) bounds only the wait for the lock,
/// never the batch job's execution time.
pub async fn run_dormant_orchestrator(
    State(state): State<AppState>,
    Query(query): Query<TimeoutQuery>,
    body: Option<Json<TimeoutBody>>,
) -> ApiResult<Json<ProcedureOutcome>> {
    let requested = query
        .timeout
        .or(body.as_ref().and_then(|b| b.timeout))
        .unwrap_or(i64::from(procedures::DEFAULT_TIMEOUT_SECS));

    if !(0..=TIMEOUT_MAX_SECS).contains(&requested) {
        return Err(ApiError::validation(
            "timeout must be between 0 and 3600 seconds",
        ));
    }

    info!(timeout_secs = requested, "dormant orchestrator requested");

    let outcome =
        procedures::run_dormant_orchestrator(&state.runner, requested as u32).await?;

    Ok(Json(outcome))
}
