// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Per-client monthly analysis rows (`cmp_dorman_tbl_client_monthly_data`).

use serde::Serialize;
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::{Page, PageResult, Sort, order_clause};

/// One client's monthly dormancy analysis row.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ClientMonthlyDataRow {
    /// Client profile identifier.
    pub profile_id: String,
    /// Client name (English).
    pub client_name_en: Option<String>,
    /// Unified client code.
    pub unified_code: Option<String>,
    /// Analysis window start in yyyymmdd form.
    pub analysis_period_from: Option<i32>,
    /// Analysis window end in yyyymmdd form.
    pub analysis_period_to: Option<i32>,
    /// Analysis month in yyyymm form.
    pub analysis_month: Option<i32>,
    /// First year of inactivity.
    pub inactivity_from_year: Option<i32>,
    /// Last year of inactivity.
    pub inactivity_to_year: Option<i32>,
}

/// Filters accepted by the collection endpoint.
#[derive(Debug, Clone, Default)]
pub struct MonthlyDataFilter {
    /// Restrict to rows whose inactivity ends in this year.
    pub year: Option<i32>,
    /// Restrict to one analysis month (yyyymm).
    pub month: Option<i32>,
    /// Free-text search across profile, name, and unified code.
    pub q: Option<String>,
}

const COLUMNS: &str = "profile_id, client_name_en, unified_code, analysis_period_from, \
     analysis_period_to, analysis_month, inactivity_from_year, inactivity_to_year";

const TABLE: &str = "cmp_dorman_tbl_client_monthly_data";

const SORTABLE: &[(&str, &str)] = &[
    ("profileId", "profile_id"),
    ("clientNameEn", "client_name_en"),
    ("analysisPeriodFrom", "analysis_period_from"),
    ("analysisPeriodTo", "analysis_period_to"),
    ("analysisMonth", "analysis_month"),
    ("inactivityFromYear", "inactivity_from_year"),
    ("inactivityToYear", "inactivity_to_year"),
];

const DEFAULT_ORDER: &str = "analysis_period_from DESC, profile_id ASC";

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &MonthlyDataFilter) {
    let mut prefix = " WHERE ";

    if let Some(year) = filter.year {
        builder.push(prefix).push("inactivity_to_year = ").push_bind(year);
        prefix = " AND ";
    }

    if let Some(month) = filter.month {
        builder.push(prefix).push("analysis_month = ").push_bind(month);
        prefix = " AND ";
    }

    if let Some(q) = filter.q.as_deref() {
        let pattern = format!("%{}%", q.trim());
        builder
            .push(prefix)
            .push("(profile_id ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR client_name_en ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR unified_code ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

/// Paginated collection query with filters and whitelisted sorting.
pub async fn list(
    pool: &PgPool,
    filter: &MonthlyDataFilter,
    sort: Option<&Sort>,
    page: &Page,
) -> Result<PageResult<ClientMonthlyDataRow>, sqlx::Error> {
    let mut count = QueryBuilder::<Postgres>::new(format!("SELECT COUNT(*) FROM {TABLE}"));
    push_filters(&mut count, filter);
    let total: i64 = count.build_query_scalar().fetch_one(pool).await?;

    let mut query = QueryBuilder::<Postgres>::new(format!("SELECT {COLUMNS} FROM {TABLE}"));
    push_filters(&mut query, filter);
    query
        .push(" ORDER BY ")
        .push(order_clause(sort, SORTABLE, DEFAULT_ORDER))
        .push(" LIMIT ")
        .push_bind(page.limit)
        .push(" OFFSET ")
        .push_bind(page.offset);

    let rows = query
        .build_query_as::<ClientMonthlyDataRow>()
        .fetch_all(pool)
        .await?;

    Ok(PageResult { rows, total })
}

/// Single-record lookup by profile id.
pub async fn get_by_profile_id(
    pool: &PgPool,
    profile_id: &str,
) -> Result<Option<ClientMonthlyDataRow>, sqlx::Error> {
    sqlx::query_as::<_, ClientMonthlyDataRow>(&format!(
        "SELECT {COLUMNS} FROM {TABLE} WHERE profile_id = $1"
    ))
    .bind(profile_id)
    .fetch_optional(pool)
    .await
}
