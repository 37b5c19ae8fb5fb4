// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error taxonomy shared between the core and the HTTP boundary.
//!
//! [`ProcedureError`] is the closed three-variant taxonomy produced by the
//! procedure runner; no other failure shape escapes it. [`CoreError`] wraps
//! everything the rest of the crate can raise so the server maps errors to
//! HTTP statuses in exactly one place.

use thiserror::Error;

/// Result type using [`CoreError`].
pub type Result<T> = std::result::Result<T, CoreError>;

/// Outcome taxonomy for a coordinated batch procedure invocation.
///
/// Closed set: classification never produces anything outside these three
/// variants, and unmatched engine failures collapse into [`Execution`].
///
/// [`Execution`]: ProcedureError::Execution
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProcedureError {
    /// Another session already holds the procedure's advisory lock.
    #[error("A run is already in progress")]
    AlreadyRunning,

    /// The advisory lock could not be acquired within the caller's wait bound.
    #[error("Could not obtain lock within timeout")]
    LockTimeout,

    /// The batch call itself, or the engine, failed.
    #[error("{message}")]
    Execution {
        /// Sanitized failure description, safe for server-side logs.
        message: String,
        /// Engine-native error code (Postgres SQLSTATE) when reported.
        native_code: Option<String>,
    },
}

impl ProcedureError {
    /// Build an execution error from a low-level driver failure.
    pub fn execution(message: impl Into<String>, native_code: Option<String>) -> Self {
        Self::Execution {
            message: message.into(),
            native_code,
        }
    }

    /// Machine-readable code for the HTTP boundary.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::AlreadyRunning => "ALREADY_RUNNING",
            Self::LockTimeout => "TIMEOUT",
            Self::Execution { .. } => "PROC_ERROR",
        }
    }

    /// Engine-native error code, when one was reported.
    pub fn native_code(&self) -> Option<&str> {
        match self {
            Self::Execution { native_code, .. } => native_code.as_deref(),
            _ => None,
        }
    }
}

/// Errors raised by the core library.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CoreError {
    /// Configuration loading failed.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// A read query against the analytics tables failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A requested record does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// A coordinated procedure invocation failed.
    #[error(transparent)]
    Procedure(#[from] ProcedureError),
}

impl CoreError {
    /// Machine-readable code for the HTTP boundary.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Procedure(p) => p.error_code(),
        }
    }
}
