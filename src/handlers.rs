//! HTTP endpoint handlers.
//!
//! One fixed dispatch surface:
//!
//! - `OPTIONS *` - preflight, answered by the CORS middleware
//! - `GET /availability` - booked slots, public
//! - `POST /pin-auth` - exchange PIN for a session token
//! - `GET /admin-data` - list submissions, privileged
//! - `DELETE /delete-submission` - delete by id, privileged
//! - `POST /` - form submission, API-key gated
//! - `GET /health` - store connectivity

pub mod admin;
pub mod availability;
pub mod health;
pub mod pin_auth;
pub mod submit;

use axum::{
    http::HeaderMap,
    middleware,
    routing::{delete, get, post},
    Router,
};

use crate::{cors, state::AppState};

/// Build the full application router, CORS middleware included.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", post(submit::submit))
        .route("/availability", get(availability::availability))
        .route("/pin-auth", post(pin_auth::pin_auth))
        .route("/admin-data", get(admin::admin_data))
        .route("/delete-submission", delete(admin::delete_submission))
        .route("/health", get(health::health_check))
        .with_state(state.clone())
        .layer(middleware::from_fn_with_state(state, cors::apply))
}

/// Client IP as reported by the fronting proxy, or "unknown".
pub(crate) fn client_ip(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}
