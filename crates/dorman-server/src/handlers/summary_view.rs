// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Per-year rollup view endpoint.

use axum::Json;
use axum::extract::State;
use serde_json::{Value, json};

use dorman_core::repo::summary_view;

use crate::api_error::ApiResult;
use crate::state::AppState;

/// `GET /api/v1/summary-view`
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let rows = summary_view::list(&state.pool).await?;
    Ok(Json(json!({
        "success": true,
        "data": rows,
        "count": rows.len(),
    })))
}
