// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! HTTP error mapping.
//!
//! The only layer that turns the typed core taxonomy into status codes and
//! response bodies. Engine internals stay in server-side logs; response
//! bodies carry a machine-readable `code` and a human-readable `message`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use serde_json::json;
use tracing::{error, warn};

use dorman_core::{CoreError, ProcedureError};

/// Result type used by handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// A renderable API error.
#[derive(Debug)]
pub struct ApiError {
    /// HTTP status.
    pub status: StatusCode,
    /// Machine-readable code, e.g. `ALREADY_RUNNING`.
    pub code: &'static str,
    /// Human-readable message, safe for clients.
    pub message: String,
    /// Engine-native error code when one was reported.
    pub number: Option<String>,
}

impl ApiError {
    /// 400 with code `VALIDATION_ERROR`.
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: "VALIDATION_ERROR",
            message: message.into(),
            number: None,
        }
    }

    /// 404 with code `NOT_FOUND`.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            code: "NOT_FOUND",
            message: message.into(),
            number: None,
        }
    }

    /// 500 with code `INTERNAL_ERROR`.
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: "INTERNAL_ERROR",
            message: message.into(),
            number: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = json!({
            "success": false,
            "code": self.code,
            "message": self.message,
            "timestamp": Utc::now().to_rfc3339(),
        });
        if let Some(number) = &self.number {
            body["number"] = json!(number);
        }
        (self.status, Json(body)).into_response()
    }
}

impl From<ProcedureError> for ApiError {
    fn from(err: ProcedureError) -> Self {
        match err {
            ProcedureError::AlreadyRunning => Self {
                status: StatusCode::CONFLICT,
                code: "ALREADY_RUNNING",
                message: "A run is already in progress".to_string(),
                number: None,
            },
            ProcedureError::LockTimeout => Self {
                status: StatusCode::LOCKED,
                code: "TIMEOUT",
                message: "Could not obtain lock within timeout".to_string(),
                number: None,
            },
            ProcedureError::Execution {
                message,
                native_code,
            } => {
                // Detail goes to the log, not the client.
                error!(
                    native_code = native_code.as_deref().unwrap_or("-"),
                    error = %message,
                    "procedure execution failed"
                );
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    code: "PROC_ERROR",
                    message: "Procedure execution failed".to_string(),
                    number: native_code,
                }
            }
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Procedure(p) => p.into(),
            CoreError::NotFound(what) => Self::not_found(format!("{what} not found")),
            CoreError::Database(db) => {
                error!(error = %db, "database query failed");
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    code: "DATABASE_ERROR",
                    message: "Database error".to_string(),
                    number: None,
                }
            }
            CoreError::Config(cfg) => {
                warn!(error = %cfg, "configuration error surfaced at request time");
                Self::internal("Server misconfiguration")
            }
            other => {
                error!(error = %other, "unexpected core error");
                Self::internal("Unexpected server error")
            }
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        CoreError::from(err).into()
    }
}
