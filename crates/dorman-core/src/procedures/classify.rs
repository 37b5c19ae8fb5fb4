// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Classification of engine failures into the closed procedure taxonomy.
//!
//! This is the only module allowed to inspect SQLSTATEs or search failure
//! message text. Engine-specific formats change here and nowhere else.

use crate::error::ProcedureError;

/// SQLSTATE raised when `lock_timeout` expires while waiting for a lock.
const SQLSTATE_LOCK_NOT_AVAILABLE: &str = "55P03";

/// SQLSTATE raised when the engine aborts a waiter to break a deadlock.
const SQLSTATE_DEADLOCK_DETECTED: &str = "40P01";

/// Marker raised by batch procedures that detect a concurrent run themselves.
const MARKER_ALREADY_RUNNING: &str = "PROCESS_ALREADY_RUNNING";

/// Marker raised by batch procedures that give up on a lock wait themselves.
const MARKER_LOCK_TIMEOUT: &str = "LOCK_TIMEOUT";

/// Collapse a driver failure into exactly one [`ProcedureError`] variant.
pub fn classify_failure(err: sqlx::Error) -> ProcedureError {
    match err {
        sqlx::Error::Database(db) => {
            let code = db.code().map(|c| c.to_string());
            classify_database(code.as_deref(), db.message())
        }
        other => ProcedureError::execution(other.to_string(), None),
    }
}

/// Pure classification over the engine-reported `(SQLSTATE, message)` pair.
///
/// Unmatched conditions default to
/// [`Execution`](ProcedureError::Execution): nothing leaves this function
/// unclassified.
pub fn classify_database(code: Option<&str>, message: &str) -> ProcedureError {
    match code {
        Some(SQLSTATE_LOCK_NOT_AVAILABLE) => return ProcedureError::LockTimeout,
        Some(SQLSTATE_DEADLOCK_DETECTED) => return ProcedureError::AlreadyRunning,
        _ => {}
    }

    if message.contains(MARKER_ALREADY_RUNNING) {
        return ProcedureError::AlreadyRunning;
    }
    if message.contains(MARKER_LOCK_TIMEOUT) {
        return ProcedureError::LockTimeout;
    }

    ProcedureError::execution(message, code.map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_wait_sqlstate_maps_to_timeout() {
        let err = classify_database(Some("55P03"), "canceling statement due to lock timeout");
        assert_eq!(err, ProcedureError::LockTimeout);
    }

    #[test]
    fn test_deadlock_sqlstate_maps_to_already_running() {
        let err = classify_database(Some("40P01"), "deadlock detected");
        assert_eq!(err, ProcedureError::AlreadyRunning);
    }

    #[test]
    fn test_procedure_raised_markers() {
        assert_eq!(
            classify_database(Some("P0001"), "ERROR: PROCESS_ALREADY_RUNNING"),
            ProcedureError::AlreadyRunning
        );
        assert_eq!(
            classify_database(Some("P0001"), "ERROR: LOCK_TIMEOUT"),
            ProcedureError::LockTimeout
        );
    }

    #[test]
    fn test_unmatched_failure_defaults_to_execution_with_native_code() {
        let err = classify_database(Some("42P01"), "relation \"cmp_dorman_tbl_summary\" does not exist");
        match err {
            ProcedureError::Execution { native_code, .. } => {
                assert_eq!(native_code.as_deref(), Some("42P01"));
            }
            other => panic!("expected Execution, got {other:?}"),
        }
    }

    #[test]
    fn test_failure_without_sqlstate_defaults_to_execution() {
        let err = classify_database(None, "connection reset by peer");
        match err {
            ProcedureError::Execution {
                message,
                native_code,
            } => {
                assert_eq!(message, "connection reset by peer");
                assert_eq!(native_code, None);
            }
            other => panic!("expected Execution, got {other:?}"),
        }
    }

    #[test]
    fn test_classification_is_idempotent() {
        // Same raw input always yields the same taxonomy member.
        for _ in 0..3 {
            assert_eq!(
                classify_database(Some("55P03"), "lock timeout"),
                ProcedureError::LockTimeout
            );
            assert_eq!(
                classify_database(None, "PROCESS_ALREADY_RUNNING"),
                ProcedureError::AlreadyRunning
            );
        }
    }

    #[test]
    fn test_pool_level_failures_are_execution_errors() {
        let err = classify_failure(sqlx::Error::PoolTimedOut);
        assert_eq!(err.error_code(), "PROC_ERROR");
    }
}
