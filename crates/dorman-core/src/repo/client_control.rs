// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Batch-run watermark table (`cmp_dorman_tbl_client_control`).

use serde::Serialize;
use sqlx::PgPool;

/// Processing watermark for one year.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ClientControlRow {
    /// Year the watermark applies to.
    pub processing_year: i32,
    /// Last month the orchestrator finished for that year (1-12).
    pub last_processed_month: i32,
}

/// All watermarks, newest year first.
pub async fn list(pool: &PgPool) -> Result<Vec<ClientControlRow>, sqlx::Error> {
    sqlx::query_as::<_, ClientControlRow>(
        "SELECT processing_year, last_processed_month \
         FROM cmp_dorman_tbl_client_control \
         ORDER BY processing_year DESC",
    )
    .fetch_all(pool)
    .await
}
