// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Request handlers.

pub mod client_control;
pub mod daily_orders;
pub mod health;
pub mod monthly_data;
pub mod procedures;
pub mod summary;
pub mod summary_view;

/// Bounds used by the year path/query validators.
pub(crate) const YEAR_MIN: i32 = 1900;
/// Upper bound for year validators.
pub(crate) const YEAR_MAX: i32 = 2100;
