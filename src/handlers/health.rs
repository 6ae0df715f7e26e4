//! Health check endpoint for load balancers and monitoring.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    store: bool,
}

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let store_ok = state
        .stores
        .submissions
        .health_check()
        .await
        .unwrap_or(false);

    let response = HealthResponse {
        status: if store_ok { "ok" } else { "unhealthy" },
        store: store_ok,
    };

    let status = if store_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}
