// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Per-employee daily order rows (`cmp_emp_tbl_daily_orders`).

use serde::Serialize;
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::{Page, PageResult, Sort, order_clause};

/// One daily order row.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DailyOrderRow {
    /// Client profile identifier.
    pub profile_id: i64,
    /// Customer name (English).
    pub customer_name_en: Option<String>,
    /// Invoice date in yyyymmdd form.
    pub invoice_date: i32,
    /// Invoice number.
    pub invoice_no: i64,
    /// Executing employee identifier.
    pub exec_id: Option<String>,
    /// Traded stock identifier.
    pub stock_id: Option<i64>,
    /// Order quantity.
    pub qty: Option<i32>,
    /// Secondary profile, when the order spans two.
    pub second_profile: Option<i64>,
}

/// Filters accepted by the collection endpoint.
#[derive(Debug, Clone, Default)]
pub struct DailyOrdersFilter {
    /// Restrict to one client profile.
    pub profile_id: Option<i64>,
    /// Inclusive invoice-date lower bound (yyyymmdd).
    pub from: Option<i32>,
    /// Inclusive invoice-date upper bound (yyyymmdd).
    pub to: Option<i32>,
}

const COLUMNS: &str = "profile_id, customer_name_en, invoice_date, invoice_no, exec_id, \
     stock_id, qty, second_profile";

const TABLE: &str = "cmp_emp_tbl_daily_orders";

const SORTABLE: &[(&str, &str)] = &[
    ("profileId", "profile_id"),
    ("customerNameEn", "customer_name_en"),
    ("invoiceDate", "invoice_date"),
    ("invoiceNo", "invoice_no"),
    ("stockId", "stock_id"),
];

const DEFAULT_ORDER: &str = "invoice_date DESC, invoice_no ASC";

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &DailyOrdersFilter) {
    let mut prefix = " WHERE ";

    if let Some(profile_id) = filter.profile_id {
        builder.push(prefix).push("profile_id = ").push_bind(profile_id);
        prefix = " AND ";
    }

    if let Some(from) = filter.from {
        builder.push(prefix).push("invoice_date >= ").push_bind(from);
        prefix = " AND ";
    }

    if let Some(to) = filter.to {
        builder.push(prefix).push("invoice_date <= ").push_bind(to);
    }
}

/// Paginated collection query with filters and whitelisted sorting.
pub async fn list(
    pool: &PgPool,
    filter: &DailyOrdersFilter,
    sort: Option<&Sort>,
    page: &Page,
) -> Result<PageResult<DailyOrderRow>, sqlx::Error> {
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
        .build_query_as::<DailyOrderRow>()
        .fetch_all(pool)
        .await?;

    Ok(PageResult { rows, total })
}

/// All rows for one invoice number, in execution order.
pub async fn by_invoice_no(
    pool: &PgPool,
    invoice_no: i64,
) -> Result<Vec<DailyOrderRow>, sqlx::Error> {
    sqlx::query_as::<_, DailyOrderRow>(&format!(
        "SELECT {COLUMNS} FROM {TABLE} WHERE invoice_no = $1 ORDER BY invoice_date ASC"
    ))
    .bind(invoice_no)
    .fetch_all(pool)
    .await
}
