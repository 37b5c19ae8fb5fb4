// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Procedure runner coordination tests.
//!
//! These run against a real PostgreSQL instance and verify the advisory-lock
//! guarantees: mutual exclusion, bounded lock waits, fail-fast zero-wait
//! acquisition, connection release on every path, and rollback of partial
//! effects.

use std::time::{Duration, Instant};

use dorman_core::ProcedureError;
use dorman_core::procedures::{LockRequest, ProcedureCall, ProcedureRunner, lock_key};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

/// Skip test if database URL is not set
macro_rules! skip_if_no_db {
    () => {
        if std::env::var("TEST_DORMAN_DATABASE_URL").is_err()
            && std::env::var("DORMAN_DATABASE_URL").is_err()
        {
            eprintln!(
                "Skipping test: TEST_DORMAN_DATABASE_URL or DORMAN_DATABASE_URL not set"
            );
            return;
        }
    };
}

async fn get_pool(max_connections: u32) -> Option<PgPool> {
    let database_url = std::env::var("TEST_DORMAN_DATABASE_URL")
        .or_else(|_| std::env::var("DORMAN_DATABASE_URL"))
        .ok()?;
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(&database_url)
        .await
        .ok()
}

fn sleep_call(seconds: f64) -> ProcedureCall {
    ProcedureCall::new(format!("SELECT pg_sleep({seconds})"))
}

#[tokio::test]
async fn test_second_caller_fails_fast_while_first_runs() {
    skip_if_no_db!();
    let pool = get_pool(5).await.expect("Failed to connect to database");
    let runner = ProcedureRunner::new(pool);

    let slow_runner = runner.clone();
    let slow = tokio::spawn(async move {
        let lock = LockRequest::new("test_fail_fast_lock", 10);
        slow_runner
            .run_with_optional_lock(&sleep_call(2.0), Some(&lock))
            .await
    });

    // Let the first caller take the lock.
    tokio::time::sleep(Duration::from_millis(500)).await;

    let started = Instant::now();
    let lock = LockRequest::new("test_fail_fast_lock", 0);
    let second = runner
        .run_with_optional_lock(&sleep_call(0.1), Some(&lock))
        .await;

    assert_eq!(second.unwrap_err(), ProcedureError::AlreadyRunning);
    assert!(
        started.elapsed() < Duration::from_millis(500),
        "zero-wait acquisition must not block"
    );

    let first = slow.await.unwrap().expect("first caller should complete");
    assert_eq!(first.status, "COMPLETED");
    assert_eq!(first.code, "OK");
}

#[tokio::test]
async fn test_waiting_caller_completes_after_holder_finishes() {
    skip_if_no_db!();
    let pool = get_pool(5).await.expect("Failed to connect to database");
    let runner = ProcedureRunner::new(pool);

    let slow_runner = runner.clone();
    let slow = tokio::spawn(async move {
        let lock = LockRequest::new("test_serialized_lock", 10);
        slow_runner
            .run_with_optional_lock(&sleep_call(1.0), Some(&lock))
            .await
    });

    tokio::time::sleep(Duration::from_millis(300)).await;

    // Generous timeout: waits for the holder, then completes.
    let lock = LockRequest::new("test_serialized_lock", 10);
    let second = runner
        .run_with_optional_lock(&sleep_call(0.1), Some(&lock))
        .await
        .expect("waiting caller should eventually complete");
    assert!(second.success);

    assert!(slow.await.unwrap().is_ok());
}

#[tokio::test]
async fn test_lock_wait_timeout_is_honored() {
    skip_if_no_db!();
    let pool = get_pool(5).await.expect("Failed to connect to database");
    let runner = ProcedureRunner::new(pool.clone());

    // Hold the lock from a plain transaction so the runner has to wait.
    let mut holder = pool.begin().await.unwrap();
    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(lock_key("test_wait_timeout_lock"))
        .execute(&mut *holder)
        .await
        .unwrap();

    let started = Instant::now();
    let lock = LockRequest::new("test_wait_timeout_lock", 1);
    let result = runner
        .run_with_optional_lock(&sleep_call(0.1), Some(&lock))
        .await;
    let elapsed = started.elapsed();

    assert_eq!(result.unwrap_err(), ProcedureError::LockTimeout);
    assert!(elapsed >= Duration::from_millis(900), "returned before the wait bound");
    assert!(
        elapsed < Duration::from_secs(5),
        "LockTimeout must arrive within a bounded margin of the wait"
    );

    holder.rollback().await.unwrap();
}

#[tokio::test]
async fn test_connection_released_on_every_path() {
    skip_if_no_db!();
    let pool = get_pool(2).await.expect("Failed to connect to database");
    let runner = ProcedureRunner::new(pool.clone());

    // Success path.
    let lock = LockRequest::new("test_release_lock", 5);
    runner
        .run_with_optional_lock(&sleep_call(0.05), Some(&lock))
        .await
        .unwrap();

    // Execution-error path.
    let bad = ProcedureCall::new("CALL no_such_procedure_anywhere()");
    let lock = LockRequest::new("test_release_lock", 5);
    assert!(matches!(
        runner.run_with_optional_lock(&bad, Some(&lock)).await,
        Err(ProcedureError::Execution { .. })
    ));

    // Already-running path.
    let mut holder = pool.begin().await.unwrap();
    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(lock_key("test_release_lock"))
        .execute(&mut *holder)
        .await
        .unwrap();
    let lock = LockRequest::new("test_release_lock", 0);
    assert_eq!(
        runner
            .run_with_optional_lock(&sleep_call(0.05), Some(&lock))
            .await
            .unwrap_err(),
        ProcedureError::AlreadyRunning
    );
    holder.rollback().await.unwrap();

    // Every leased connection must be back in the pool. The holder
    // transaction used one of the two slots, so a fully drained pool here
    // proves the runner never leaked its lease.
    let deadline = Instant::now() + Duration::from_secs(2);
    loop {
        if pool.num_idle() as u32 == pool.size() {
            break;
        }
        assert!(Instant::now() < deadline, "pool did not return to baseline");
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}

#[tokio::test]
async fn test_failed_call_leaves_no_partial_effect() {
    skip_if_no_db!();
    let pool = get_pool(5).await.expect("Failed to connect to database");
    let runner = ProcedureRunner::new(pool.clone());

    sqlx::query("DROP TABLE IF EXISTS proc_effect_probe")
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query("CREATE TABLE proc_effect_probe (n INT)")
        .execute(&pool)
        .await
        .unwrap();

    // Inserts, then fails mid-call. The insert shares the lock's
    // transaction and must roll back with it.
    let call = ProcedureCall::new(
        "DO $$ BEGIN \
            INSERT INTO proc_effect_probe VALUES (1); \
            RAISE EXCEPTION 'mid-call failure'; \
         END $$",
    );
    let lock = LockRequest::new("test_partial_effect_lock", 5);
    let err = runner
        .run_with_optional_lock(&call, Some(&lock))
        .await
        .unwrap_err();
    assert!(matches!(err, ProcedureError::Execution { .. }));

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM proc_effect_probe")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0, "rolled-back call must leave no rows behind");

    sqlx::query("DROP TABLE proc_effect_probe")
        .execute(&pool)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_unguarded_calls_run_concurrently() {
    skip_if_no_db!();
    let pool = get_pool(5).await.expect("Failed to connect to database");
    let runner = ProcedureRunner::new(pool);

    let started = Instant::now();
    let a = {
        let runner = runner.clone();
        tokio::spawn(async move { runner.run_with_optional_lock(&sleep_call(1.0), None).await })
    };
    let b = {
        let runner = runner.clone();
        tokio::spawn(async move { runner.run_with_optional_lock(&sleep_call(1.0), None).await })
    };

    assert!(a.await.unwrap().is_ok());
    assert!(b.await.unwrap().is_ok());

    // Two one-second unguarded calls overlapping, not serialized.
    assert!(
        started.elapsed() < Duration::from_millis(1900),
        "unguarded calls must not serialize"
    );
}
