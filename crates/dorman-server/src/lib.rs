// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Dorman Server - backoffice HTTP API
//!
//! Exposes the dormant-client analytics tables read-only and the
//! administrative endpoint that triggers the dormant orchestrator batch job.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Liveness (no database touch) |
//! | GET | `/api/v1/health/integrations` | Database/pool probe |
//! | GET | `/api/v1/summary` | Monthly summary history |
//! | GET | `/api/v1/summary/latest/{year}` | One year, latest month first |
//! | GET | `/api/v1/summary-view` | Per-year rollup view |
//! | GET | `/api/v1/client-control` | Batch-run watermarks |
//! | GET | `/api/v1/client-monthly-data` | Paginated client analysis rows |
//! | GET | `/api/v1/client-monthly-data/{profile_id}` | Single client record |
//! | GET | `/api/v1/client-emp-daily-orders` | Paginated daily orders |
//! | GET | `/api/v1/client-emp-daily-orders/invoice/{invoice_no}` | One invoice |
//! | POST | `/api/v1/procedures/dormant-orchestrator` | Run the batch job |
//!
//! The procedure endpoint serializes runs through a database advisory lock;
//! concurrent calls resolve to HTTP 200 (completed), 409 (already running),
//! 423 (lock wait timed out), or 500 (execution failure). Error bodies are
//! always `{success: false, code, message, timestamp}` with an optional
//! `number` carrying the engine-native error code.

pub mod api_error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::app;
pub use state::AppState;
