// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Named advisory-lock requests and key derivation.

use sha2::{Digest, Sha256};

/// Request to serialize a procedure call through a named advisory lock.
///
/// The name is a stable identifier for one serialization domain: one per
/// distinct batch-job type, fixed at compile time by the job's entry point
/// and never derived from caller input.
#[derive(Debug, Clone)]
pub struct LockRequest {
    /// Lock name identifying the serialization domain.
    pub name: String,
    /// How long to wait for the lock before giving up; 0 means fail fast.
    pub timeout_secs: u32,
}

impl LockRequest {
    /// Build a lock request with the given wait bound.
    pub fn new(name: impl Into<String>, timeout_secs: u32) -> Self {
        Self {
            name: name.into(),
            timeout_secs,
        }
    }

    /// Whether this request is a zero-wait try-acquire.
    pub fn is_immediate(&self) -> bool {
        self.timeout_secs == 0
    }
}

/// Derive the 64-bit advisory-lock key for a lock name.
///
/// Postgres advisory locks are keyed by integers, not strings, so names are
/// mapped through the first eight bytes of their SHA-256 digest. Every
/// process deriving a key from the same name lands on the same 64-bit
/// value, which is all the cross-instance contention needs.
pub fn lock_key(name: &str) -> i64 {
    let digest = Sha256::digest(name.as_bytes());
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    i64::from_be_bytes(prefix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_key_is_stable() {
        assert_eq!(lock_key("cmp_dormant_orch_lock"), lock_key("cmp_dormant_orch_lock"));
    }

    #[test]
    fn test_lock_key_distinguishes_names() {
        assert_ne!(lock_key("cmp_dormant_orch_lock"), lock_key("cmp_monthly_rollup_lock"));
        assert_ne!(lock_key("job_a"), lock_key("job_b"));
    }

    #[test]
    fn test_lock_key_is_case_sensitive() {
        assert_ne!(lock_key("JOB_X"), lock_key("job_x"));
    }

    #[test]
    fn test_immediate_request() {
        assert!(LockRequest::new("job", 0).is_immediate());
        assert!(!LockRequest::new("job", 30).is_immediate());
    }
}
