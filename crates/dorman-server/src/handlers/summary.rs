// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Monthly summary endpoints.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use serde_json::{Value, json};

use dorman_core::repo::summary;

use super::{YEAR_MAX, YEAR_MIN};
use crate::api_error::{ApiError, ApiResult};
use crate::state::AppState;

/// Query accepted by the summary collection.
#[derive(Debug, Default, Deserialize)]
pub struct SummaryQuery {
    /// Restrict to one summary year.
    pub year: Option<i32>,
}

/// `GET /api/v1/summary`
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<SummaryQuery>,
) -> ApiResult<Json<Value>> {
    if let Some(year) = query.year {
        validate_year(year)?;
    }

    let rows = summary::list(&state.pool, query.year).await?;
    Ok(Json(json!({
        "success": true,
        "data": rows,
        "count": rows.len(),
    })))
}

/// `GET /api/v1/summary/latest/{year}`
pub async fn latest_by_year(
    State(state): State<AppState>,
    Path(year): Path<i32>,
) -> ApiResult<Json<Value>> {
    validate_year(year)?;

    let rows = summary::latest_by_year(&state.pool, year).await?;
    Ok(Json(json!({
        "success": true,
        "data": rows,
        "count": rows.len(),
    })))
}

fn validate_year(year: i32) -> Result<(), ApiError> {
    if (YEAR_MIN..=YEAR_MAX).contains(&year) {
        Ok(())
    } else {
        Err(ApiError::validation(
            "year must be a 4-digit integer within range (1900-2100)",
        ))
    }
}
