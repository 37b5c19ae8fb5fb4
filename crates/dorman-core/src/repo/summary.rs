// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Monthly dormant-client summary history (`cmp_dorman_tbl_summary`).

use serde::Serialize;
use sqlx::PgPool;

/// One monthly summary row produced by the batch orchestrator.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRow {
    /// Surrogate history key.
    pub history_id: i32,
    /// Summary year.
    pub summary_year: i32,
    /// Summary month (1-12).
    pub summary_month: i32,
    /// Dormant clients counted for the month.
    pub total_dormant_clients: Option<i32>,
    /// Placeholder records created for the month.
    pub placeholder_records: Option<i32>,
    /// Processing date in yyyymmdd form.
    pub processing_date: Option<i32>,
    /// Quality score assigned by the batch run.
    pub data_quality_score: Option<i32>,
    /// Free-form operator notes.
    pub notes: Option<String>,
}

const COLUMNS: &str = "history_id, summary_year, summary_month, total_dormant_clients, \
     placeholder_records, processing_date, data_quality_score, notes";

/// All summary rows, newest first, optionally restricted to one year.
pub async fn list(pool: &PgPool, year: Option<i32>) -> Result<Vec<SummaryRow>, sqlx::Error> {
    match year {
        Some(year) => {
            sqlx::query_as::<_, SummaryRow>(&format!(
                "SELECT {COLUMNS} FROM cmp_dorman_tbl_summary \
                 WHERE summary_year = $1 \
                 ORDER BY summary_year DESC, summary_month DESC"
            ))
            .bind(year)
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as::<_, SummaryRow>(&format!(
                "SELECT {COLUMNS} FROM cmp_dorman_tbl_summary \
                 ORDER BY summary_year DESC, summary_month DESC"
            ))
            .fetch_all(pool)
            .await
        }
    }
}

/// The year's rows, latest month first.
pub async fn latest_by_year(pool: &PgPool, year: i32) -> Result<Vec<SummaryRow>, sqlx::Error> {
    sqlx::query_as::<_, SummaryRow>(&format!(
        "SELECT {COLUMNS} FROM cmp_dorman_tbl_summary \
         WHERE summary_year = $1 \
         ORDER BY summary_month DESC"
    ))
    .bind(year)
    .fetch_all(pool)
    .await
}
