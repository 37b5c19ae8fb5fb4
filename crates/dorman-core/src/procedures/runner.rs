// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! The lock-coordinated procedure runner.

use serde::Serialize;
use sqlx::postgres::PgArguments;
use sqlx::query::Query;
use sqlx::{PgPool, Postgres};
use tracing::{debug, info, warn};

use super::classify::classify_failure;
use super::lock::{LockRequest, lock_key};
use crate::error::ProcedureError;

/// Driver identifier reported on the success path.
const DRIVER: &str = "sqlx-postgres";

/// A bound parameter for a procedure call.
#[derive(Debug, Clone)]
enum ProcedureParam {
    Int(i64),
    Text(String),
}

/// An opaque batch/procedure invocation.
///
/// The call text is trusted (it comes from entry-point constants, never from
/// callers); parameters are always bound, never interpolated.
#[derive(Debug, Clone)]
pub struct ProcedureCall {
    sql: String,
    params: Vec<ProcedureParam>,
}

impl ProcedureCall {
    /// Build a call from engine call syntax, e.g. `CALL refresh_summary($1)`.
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// Append an integer bind value.
    pub fn bind_int(mut self, value: i64) -> Self {
        self.params.push(ProcedureParam::Int(value));
        self
    }

    /// Append a text bind value.
    pub fn bind_text(mut self, value: impl Into<String>) -> Self {
        self.params.push(ProcedureParam::Text(value.into()));
        self
    }

    /// Number of bound parameters.
    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    fn build<'q>(&'q self) -> Query<'q, Postgres, PgArguments> {
        let mut query = sqlx::query(self.sql.as_str());
        for param in &self.params {
            query = match param {
                ProcedureParam::Int(value) => query.bind(*value),
                ProcedureParam::Text(value) => query.bind(value.as_str()),
            };
        }
        query
    }
}

/// The one success shape a procedure invocation can produce.
#[derive(Debug, Clone, Serialize)]
pub struct ProcedureOutcome {
    /// Always `true`; failures are raised as [`ProcedureError`], never
    /// returned inline.
    pub success: bool,
    /// Always `"COMPLETED"`.
    pub status: &'static str,
    /// Always `"OK"`.
    pub code: &'static str,
    /// Human-readable completion message.
    pub message: &'static str,
    /// Driver identifier for operator diagnosis.
    pub driver: &'static str,
}

impl ProcedureOutcome {
    fn completed() -> Self {
        Self {
            success: true,
            status: "COMPLETED",
            code: "OK",
            message: "Procedure completed successfully",
            driver: DRIVER,
        }
    }
}

/// Executes batch calls against the storage engine, optionally serialized
/// through a named advisory lock.
///
/// The runner owns nothing but a handle to the injected pool; it is cheap to
/// clone and safe to call concurrently: concurrent calls are exactly the
/// scenario the lock exists to serialize.
#[derive(Debug, Clone)]
pub struct ProcedureRunner {
    pool: PgPool,
}

impl ProcedureRunner {
    /// Build a runner over an already-constructed pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Execute `call`, serialized through `lock` when one is supplied.
    ///
    /// With a lock, the lock acquisition and the call run in one
    /// transaction and commit together; the lock is released by the commit
    /// (or by the rollback that every failure path takes). Without a lock
    /// the call runs with auto-commit semantics and no serialization
    /// guarantee.
    ///
    /// The lock request's timeout bounds only the wait to acquire the lock.
    /// Once the call is executing it runs to completion or engine-side
    /// failure; there is no external cancellation.
    pub async fn run_with_optional_lock(
        &self,
        call: &ProcedureCall,
        lock: Option<&LockRequest>,
    ) -> Result<ProcedureOutcome, ProcedureError> {
        match lock {
            Some(lock) => self.run_locked(call, lock).await,
            None => self.run_unguarded(call).await,
        }
    }

    async fn run_locked(
        &self,
        call: &ProcedureCall,
        lock: &LockRequest,
    ) -> Result<ProcedureOutcome, ProcedureError> {
        // Leases one connection; the transaction guard rolls back and the
        // connection returns to the pool on drop, on every exit path.
        let mut tx = self.pool.begin().await.map_err(classify_failure)?;

        let key = lock_key(&lock.name);

        if lock.is_immediate() {
            let acquired: bool = sqlx::query_scalar("SELECT pg_try_advisory_xact_lock($1)")
                .bind(key)
                .fetch_one(&mut *tx)
                .await
                .map_err(classify_failure)?;

            if !acquired {
                debug!(lock = %lock.name, "advisory lock held elsewhere, failing fast");
                return Err(ProcedureError::AlreadyRunning);
            }
        } else {
            // SET does not take bind parameters; the value is our own
            // integer, not caller input.
            let bound_wait = format!(
                "SET LOCAL lock_timeout = '{}ms'",
                u64::from(lock.timeout_secs) * 1000
            );
            sqlx::query(&bound_wait)
                .execute(&mut *tx)
                .await
                .map_err(classify_failure)?;

            sqlx::query("SELECT pg_advisory_xact_lock($1)")
                .bind(key)
                .execute(&mut *tx)
                .await
                .map_err(|err| {
                    let classified = classify_failure(err);
                    if classified == ProcedureError::LockTimeout {
                        debug!(
                            lock = %lock.name,
                            timeout_secs = lock.timeout_secs,
                            "advisory lock wait exceeded"
                        );
                    }
                    classified
                })?;

            // The wait bound applies to the lock only; the batch call must
            // not inherit it.
            sqlx::query("SET LOCAL lock_timeout = DEFAULT")
                .execute(&mut *tx)
                .await
                .map_err(classify_failure)?;
        }

        debug!(lock = %lock.name, "advisory lock acquired, executing call");

        call.build()
            .execute(&mut *tx)
            .await
            .map_err(|err| {
                let classified = classify_failure(err);
                warn!(
                    lock = %lock.name,
                    code = classified.error_code(),
                    error = %classified,
                    "batch call failed, rolling back"
                );
                classified
            })?;

        // One atomic unit of work: lock acquisition + call commit together.
        tx.commit().await.map_err(classify_failure)?;

        info!(lock = %lock.name, "batch call completed");
        Ok(ProcedureOutcome::completed())
    }

    async fn run_unguarded(&self, call: &ProcedureCall) -> Result<ProcedureOutcome, ProcedureError> {
        let mut conn = self.pool.acquire().await.map_err(classify_failure)?;

        // Auto-commit semantics; the connection returns to the pool on drop.
        call.build()
            .execute(&mut *conn)
            .await
            .map_err(classify_failure)?;

        info!("unguarded batch call completed");
        Ok(ProcedureOutcome::completed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_builder_tracks_params() {
        let call = ProcedureCall::new("CALL refresh_summary($1, $2)")
            .bind_int(2025)
            .bind_text("full");
        assert_eq!(call.param_count(), 2);
    }

    #[test]
    fn test_outcome_wire_shape() {
        let json = serde_json::to_value(ProcedureOutcome::completed()).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["status"], "COMPLETED");
        assert_eq!(json["code"], "OK");
        assert_eq!(json["driver"], "sqlx-postgres");
        assert!(json["message"].as_str().unwrap().contains("completed"));
    }
}
