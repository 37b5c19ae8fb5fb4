// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Per-year rollup view (`cmp_dorman_view_summary`).

use serde::Serialize;
use sqlx::PgPool;

/// One per-year rollup row from the engine-side view.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SummaryViewRow {
    /// Summary year.
    pub summary_year: i32,
    /// Month with the most dormant clients.
    pub max_dormant_clients_month: Option<i32>,
    /// Months with dormant clients counted.
    pub count_dormant_clients_month: Option<i32>,
    /// Months with placeholder records.
    pub count_placeholder_month: Option<i32>,
}

/// All rollup rows, newest year first.
pub async fn list(pool: &PgPool) -> Result<Vec<SummaryViewRow>, sqlx::Error> {
    sqlx::query_as::<_, SummaryViewRow>(
        "SELECT summary_year, max_dormant_clients_month, \
                count_dormant_clients_month, count_placeholder_month \
         FROM cmp_dorman_view_summary \
         ORDER BY summary_year DESC",
    )
    .fetch_all(pool)
    .await
}
