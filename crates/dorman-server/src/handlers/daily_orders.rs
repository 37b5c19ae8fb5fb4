// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Daily-orders endpoints.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use serde_json::{Value, json};

use dorman_core::repo::daily_orders::{self, DailyOrdersFilter};
use dorman_core::repo::{Page, Sort};

use crate::api_error::{ApiError, ApiResult};
use crate::state::AppState;

/// Inclusive yyyymmdd bounds accepted by the date filters.
const DATE_MIN: i32 = 19000101;
/// Upper yyyymmdd bound.
const DATE_MAX: i32 = 21001231;

/// Query accepted by the daily-orders collection.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyOrdersQuery {
    /// Restrict to one client profile.
    pub profile_id: Option<i64>,
    /// Inclusive invoice-date lower bound (yyyymmdd).
    pub from: Option<i32>,
    /// Inclusive invoice-date upper bound (yyyymmdd).
    pub to: Option<i32>,
    /// Page size.
    pub limit: Option<i64>,
    /// Page offset.
    pub offset: Option<i64>,
    /// `field:DIR` sort request.
    pub order_by: Option<String>,
}

/// `GET /api/v1/client-emp-daily-orders`
///
/// Always paginated.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<DailyOrdersQuery>,
) -> ApiResult<Json<Value>> {
    for date in [query.from, query.to].into_iter().flatten() {
        if !(DATE_MIN..=DATE_MAX).contains(&date) {
            return Err(ApiError::validation(
                "date bounds must be in yyyymmdd form between 19000101 and 21001231",
            ));
        }
    }

    if let (Some(from), Some(to)) = (query.from, query.to) {
        if from > to {
            return Err(ApiError::validation("from must not be after to"));
        }
    }

    let filter = DailyOrdersFilter {
        profile_id: query.profile_id,
        from: query.from,
        to: query.to,
    };
    let sort = query.order_by.as_deref().and_then(Sort::parse);
    let page = Page::new(query.limit, query.offset);

    let result = daily_orders::list(&state.pool, &filter, sort.as_ref(), &page).await?;

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

/// `GET /api/v1/client-emp-daily-orders/invoice/{invoice_no}`
pub async fn by_invoice_no(
    State(state): State<AppState>,
    Path(invoice_no): Path<i64>,
) -> ApiResult<Json<Value>> {
    let rows = daily_orders::by_invoice_no(&state.pool, invoice_no).await?;
    if rows.is_empty() {
        return Err(ApiError::not_found(format!(
            "Orders for invoice {invoice_no} not found"
        )));
    }

    Ok(Json(json!({
        "success": true,
        "data": rows,
        "count": rows.len(),
    })))
}
