// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Read-only repositories over the dormant-client analytics tables.
//!
//! The tables (and the view) are owned by the upstream batch platform; this
//! API only reads them. Each submodule holds one table's row struct and
//! query functions over an injected [`sqlx::PgPool`].

pub mod client_control;
pub mod daily_orders;
pub mod monthly_data;
pub mod summary;
pub mod summary_view;

/// Pagination window for collection queries.
#[derive(Debug, Clone, Copy)]
pub struct Page {
    /// Maximum rows returned.
    pub limit: i64,
    /// Rows skipped before the window.
    pub offset: i64,
}

/// Default page size when the caller does not supply one.
pub const DEFAULT_LIMIT: i64 = 100;

/// Hard ceiling on a single page.
pub const MAX_LIMIT: i64 = 1000;

impl Page {
    /// Build a page window, clamping the limit to `1..=MAX_LIMIT` and the
    /// offset to non-negative.
    pub fn new(limit: Option<i64>, offset: Option<i64>) -> Self {
        Self {
            limit: limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT),
            offset: offset.unwrap_or(0).max(0),
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// One page of rows plus the unpaginated total.
#[derive(Debug, Clone)]
pub struct PageResult<T> {
    /// Rows inside the window.
    pub rows: Vec<T>,
    /// Total matching rows regardless of the window.
    pub total: i64,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    /// Ascending.
    Asc,
    /// Descending.
    Desc,
}

impl SortDirection {
    fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// A caller-requested sort, parsed from `orderBy=field:DIR`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    /// API-level field name (camelCase), resolved against a per-table
    /// whitelist before it ever reaches SQL.
    pub field: String,
    /// Requested direction; defaults to ascending.
    pub direction: SortDirection,
}

impl Sort {
    /// Parse the `field:DIR` syntax. Unknown directions default to `ASC`;
    /// an empty field yields `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut parts = raw.splitn(2, ':');
        let field = parts.next().unwrap_or("").trim();
        if field.is_empty() {
            return None;
        }
        let direction = match parts.next().map(str::trim) {
            Some(d) if d.eq_ignore_ascii_case("desc") => SortDirection::Desc,
            _ => SortDirection::Asc,
        };
        Some(Self {
            field: field.to_string(),
            direction,
        })
    }

    /// Resolve this sort against a `(api field, column)` whitelist.
    ///
    /// Returns an ORDER BY fragment built only from whitelisted column
    /// names: raw caller input never reaches the SQL text.
    fn resolve(&self, allowed: &[(&str, &str)]) -> Option<String> {
        allowed
            .iter()
            .find(|(field, _)| *field == self.field)
            .map(|(_, column)| format!("{} {}", column, self.direction.as_sql()))
    }
}

/// ORDER BY fragment for an optional caller sort, falling back to the
/// table's default ordering when the sort is absent or not whitelisted.
pub(crate) fn order_clause(
    sort: Option<&Sort>,
    allowed: &[(&str, &str)],
    default: &str,
) -> String {
    sort.and_then(|s| s.resolve(allowed))
        .unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_defaults_and_clamping() {
        let page = Page::default();
        assert_eq!(page.limit, DEFAULT_LIMIT);
        assert_eq!(page.offset, 0);

        let page = Page::new(Some(5000), Some(-3));
        assert_eq!(page.limit, MAX_LIMIT);
        assert_eq!(page.offset, 0);

        let page = Page::new(Some(0), Some(40));
        assert_eq!(page.limit, 1);
        assert_eq!(page.offset, 40);
    }

    #[test]
    fn test_sort_parse() {
        assert_eq!(
            Sort::parse("summaryYear:desc"),
            Some(Sort {
                field: "summaryYear".to_string(),
                direction: SortDirection::Desc,
            })
        );
        assert_eq!(
            Sort::parse("profileId"),
            Some(Sort {
                field: "profileId".to_string(),
                direction: SortDirection::Asc,
            })
        );
        assert_eq!(Sort::parse(":desc"), None);
        assert_eq!(Sort::parse(""), None);
    }

    #[test]
    fn test_order_clause_enforces_whitelist() {
        let allowed = [("summaryYear", "summary_year")];

        let sort = Sort::parse("summaryYear:desc").unwrap();
        assert_eq!(
            order_clause(Some(&sort), &allowed, "summary_year DESC"),
            "summary_year DESC"
        );

        // Non-whitelisted fields fall back to the default, they are never
        // spliced into SQL.
        let sort = Sort::parse("notes; DROP TABLE x").unwrap();
        assert_eq!(
            order_clause(Some(&sort), &allowed, "summary_year DESC"),
            "summary_year DESC"
        );

        assert_eq!(
            order_clause(None, &allowed, "summary_year DESC"),
            "summary_year DESC"
        );
    }
}
