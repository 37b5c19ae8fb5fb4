// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Entry point for the dormant-client orchestrator batch job.

use super::lock::LockRequest;
use super::runner::{ProcedureCall, ProcedureOutcome, ProcedureRunner};
use crate::error::ProcedureError;

/// Advisory lock name for the dormant orchestrator.
///
/// One constant per batch-job type: every API instance contends on the same
/// name, and the name is never derived from caller input.
pub const DORMANT_ORCHESTRATOR_LOCK: &str = "cmp_dormant_orch_lock";

/// Lock wait bound applied when the caller does not supply one.
pub const DEFAULT_TIMEOUT_SECS: u32 = 30;

/// The orchestrator procedure owned by the upstream batch platform.
const DORMANT_ORCHESTRATOR_CALL: &str = "CALL cmp_dormant_pro_orchestrator()";

/// Run the dormant-client orchestrator, serialized on
/// [`DORMANT_ORCHESTRATOR_LOCK`].
///
/// Delegates entirely to the runner; outcomes and errors pass through
/// unmodified. Stateless and safe to call concurrently: among N
/// simultaneous callers at most one executes, the rest resolve to
/// `AlreadyRunning` or `LockTimeout`.
pub async fn run_dormant_orchestrator(
    runner: &ProcedureRunner,
    timeout_secs: u32,
) -> Result<ProcedureOutcome, ProcedureError> {
    let call = ProcedureCall::new(DORMANT_ORCHESTRATOR_CALL);
    let lock = LockRequest::new(DORMANT_ORCHESTRATOR_LOCK, timeout_secs);
    runner.run_with_optional_lock(&call, Some(&lock)).await
}
