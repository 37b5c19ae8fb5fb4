// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Lock-coordinated batch procedure execution.
//!
//! A batch job is an opaque server-side call (`CALL some_procedure(...)`)
//! executed through a pooled connection. When a [`LockRequest`] is supplied,
//! the call is serialized through a named Postgres advisory lock so at most
//! one execution runs at a time across every API process; the lock
//! acquisition and the protected call share one transaction and commit as a
//! single unit of work.
//!
//! Failures collapse into the closed
//! [`ProcedureError`](crate::error::ProcedureError) taxonomy inside
//! [`classify`]: the only place in the codebase that inspects
//! engine-specific SQLSTATEs and message markers.

pub mod classify;
mod dormant;
mod lock;
mod runner;

pub use dormant::{
    DEFAULT_TIMEOUT_SECS, DORMANT_ORCHESTRATOR_LOCK, run_dormant_orchestrator,
};
pub use lock::{LockRequest, lock_key};
pub use runner::{ProcedureCall, ProcedureOutcome, ProcedureRunner};
