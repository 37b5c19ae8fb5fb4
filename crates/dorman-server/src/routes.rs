// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Router assembly.

use axum::Router;
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::api_error::ApiError;
use crate::handlers::{
    client_control, daily_orders, health, monthly_data, procedures, summary, summary_view,
};
use crate::state::AppState;

/// Build the full application router.
///
/// `allowed_origins` empty means a permissive CORS policy (internal
/// deployments behind a gateway); otherwise only the listed origins are
/// accepted.
pub fn app(state: AppState, allowed_origins: &[String]) -> Router {
    let v1 = Router::new()
        .route("/summary", get(summary::list))
        .route("/summary/latest/{year}", get(summary::latest_by_year))
        .route("/summary-view", get(summary_view::list))
        .route("/client-control", get(client_control::list))
        .route("/client-monthly-data", get(monthly_data::list))
        .route(
            "/client-monthly-data/{profile_id}",
            get(monthly_data::get_by_profile_id),
        )
        .route("/client-emp-daily-orders", get(daily_orders::list))
        .route(
            "/client-emp-daily-orders/invoice/{invoice_no}",
            get(daily_orders::by_invoice_no),
        )
        .route("/health/integrations", get(health::integrations))
        .route(
            "/procedures/dormant-orchestrator",
            post(procedures::run_dormant_orchestrator),
        );

    Router::new()
        .route("/health", get(health::liveness))
        .nest("/api/v1", v1)
        .fallback(fallback)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(allowed_origins))
        .with_state(state)
}

async fn fallback() -> ApiError {
    ApiError::not_found("Resource not found")
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin, "ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any)
}
