//! PIN exchange: a correct PIN mints a short-lived session token.

use axum::{body::Bytes, extract::State, response::IntoResponse, Json};

use crate::{error::AppError, models::PinAuthPayload, state::AppState};

pub async fn pin_auth(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let payload: PinAuthPayload = serde_json::from_slice(&body)
        .map_err(|_| AppError::Validation("Please check your request data".to_string()))?;

    if payload.pin.is_empty() || payload.pin != state.config.admin_pin {
        tracing::warn!("PIN authentication failed");
        return Err(AppError::Auth("Invalid PIN"));
    }

    let (token, expires_in) = state.pin_session.issue()?;
    tracing::info!("PIN authentication succeeded, session token issued");

    Ok(Json(serde_json::json!({
        "success": true,
        "sessionToken": token,
        "expiresIn": expires_in,
    })))
}
