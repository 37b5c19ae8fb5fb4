// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Dorman Core - dormant-client backoffice domain library
//!
//! This crate provides everything below the HTTP boundary of the dorman
//! backoffice: configuration, the connection pool, read-only repositories
//! over the dormant-client analytics tables, and the lock-coordinated
//! procedure runner that drives the server-side batch jobs.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               dorman-server                  │
//! │        (axum HTTP API, status mapping)       │
//! └─────────────────────┬───────────────────────┘
//!                       │
//!          ┌────────────┴─────────────┐
//!          ▼                          ▼
//! ┌─────────────────┐      ┌────────────────────┐
//! │      repo       │      │     procedures     │
//! │ (read queries)  │      │ (lock-coordinated  │
//! │                 │      │  batch execution)  │
//! └────────┬────────┘      └─────────┬──────────┘
//!          │                         │
//!          └──────────┬──────────────┘
//!                     ▼
//!          ┌────────────────────┐
//!          │     PostgreSQL     │
//!          │ (analytics tables, │
//!          │  stored procedures,│
//!          │  advisory locks)   │
//!          └────────────────────┘
//! ```
//!
//! # Procedure coordination
//!
//! The [`procedures`] module is the heart of the crate. A batch job is
//! invoked through [`procedures::ProcedureRunner`], optionally serialized
//! through a named advisory lock so that at most one execution runs at a
//! time across every API instance. Each invocation resolves to exactly one
//! outcome:
//!
//! | Outcome | Meaning |
//! |---------|---------|
//! | `Completed` | Lock acquired (or no lock requested), call executed, committed |
//! | `AlreadyRunning` | Another session holds the lock; nothing executed |
//! | `LockTimeout` | Lock not acquired within the caller's wait bound; nothing executed |
//! | `Execution` | The call itself (or the engine) failed; transaction rolled back |
//!
//! The lock acquisition and the protected call run in a single transaction,
//! so a crash can never leave the lock held without the work committed or
//! vice versa. The caller's timeout bounds only the wait for the lock, not
//! the execution time of the batch call.
//!
//! # Configuration
//!
//! | Variable | Required | Default | Description |
//! |----------|----------|---------|-------------|
//! | `DORMAN_DATABASE_URL` (or `DATABASE_URL`) | Yes | - | PostgreSQL connection string |
//! | `DORMAN_HTTP_PORT` | No | `8080` | HTTP listen port |
//! | `DORMAN_POOL_MIN` | No | `2` | Minimum pooled connections |
//! | `DORMAN_POOL_MAX` | No | `10` | Maximum pooled connections |
//! | `DORMAN_POOL_ACQUIRE_TIMEOUT_SECS` | No | `60` | Pool lease wait bound |
//! | `DORMAN_CORS_ALLOWED_ORIGINS` | No | - | Comma-separated origin allowlist |
//! | `DORMAN_ENV` | No | `development` | Environment label for logs/health |
//!
//! # Modules
//!
//! - [`config`]: Configuration from environment variables
//! - [`db`]: Pool construction and connectivity probes
//! - [`error`]: Error taxonomy shared with the HTTP boundary
//! - [`procedures`]: Lock-coordinated batch procedure execution
//! - [`repo`]: Read-only repositories over the analytics tables

#![deny(missing_docs)]

/// Configuration loaded from environment variables.
pub mod config;

/// PostgreSQL pool construction and connectivity probes.
pub mod db;

/// Error taxonomy for procedures, queries, and configuration.
pub mod error;

/// Lock-coordinated batch procedure execution.
pub mod procedures;

/// Read-only repositories over the dormant-client analytics tables.
pub mod repo;

pub use error::{CoreError, ProcedureError, Result};
