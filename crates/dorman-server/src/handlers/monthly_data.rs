// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Client monthly-data endpoints.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use serde_json::{Value, json};

use dorman_core::repo::monthly_data::{self, MonthlyDataFilter};
use dorman_core::repo::{Page, Sort};

use super::{YEAR_MAX, YEAR_MIN};
use crate::api_error::{ApiError, ApiResult};
use crate::state::AppState;

/// Query accepted by the monthly-data collection.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyDataQuery {
    /// Restrict to rows whose inactivity ends in this year.
    pub year: Option<i32>,
    /// Restrict to one analysis month (yyyymm).
    pub month: Option<i32>,
    /// Free-text search across profile, name, and unified code.
    pub q: Option<String>,
    /// Page size.
    pub limit: Option<i64>,
    /// Page offset.
    pub offset: Option<i64>,
    /// `field:DIR` sort request.
    pub order_by: Option<String>,
}

/// `GET /api/v1/client-monthly-data`
///
/// Always paginated.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<MonthlyDataQuery>,
) -> ApiResult<Json<Value>> {
    if let Some(year) = query.year {
        if !(YEAR_MIN..=YEAR_MAX).contains(&year) {
            return Err(ApiError::validation(
                "year must be a 4-digit integer within range (1900-2100)",
            ));
        }
    }

    if let Some(q) = query.q.as_deref() {
        if q.trim().is_empty() || q.len() > 200 {
            return Err(ApiError::validation(
                "q must be a non-empty string with max 200 characters",
            ));
        }
    }

    let filter = MonthlyDataFilter {
        year: query.year,
        month: query.month,
        q: query.q.clone(),
    };
    let sort = query.order_by.as_deref().and_then(Sort::parse);
    let page = Page::new(query.limit, query.offset);

    let result = monthly_data::list(&state.pool, &filter, sort.as_ref(), &page).await?;

    Ok(Json(json!({
        "success": true,
        "data": result.rows,
        "pagination": {
            "limit": page.limit,
            "offset": page.offset,
            "count": result.rows.len(),
            "total": result.total,
        },
    })))
}

/// `GET /api/v1/client-monthly-data/{profile_id}`
pub async fn get_by_profile_id(
    State(state): State<AppState>,
    Path(profile_id): Path<String>,
) -> ApiResult<Json<Value>> {
    let profile_id = profile_id.trim();
    if profile_id.is_empty() {
        return Err(ApiError::validation("profileId is required"));
    }

    let row = monthly_data::get_by_profile_id(&state.pool, profile_id)
        .await?
        .ok_or_else(|| {
            ApiError::not_found(format!("Record with profileId {profile_id} not found"))
        })?;

    Ok(Json(json!({
        "success": true,
        "data": row,
    })))
}
