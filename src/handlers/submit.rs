//! Form-submission write path.
//!
//! Pipeline: API key → size check → rate limit → field validation →
//! sanitization → slot claim → persist → best-effort notify. The rate
//! limiter and the slot claim both fail open on infrastructure errors
//! (policy-flagged in config): the form keeps working when the defense
//! subsystems are down.

use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    response::IntoResponse,
    Json,
};
use chrono::Utc;

use crate::{
    error::AppError,
    models::{Submission, SubmitPayload},
    sanitize::sanitize,
    state::AppState,
    validate,
};

const NAME_MAX: usize = 100;
const TEXT_MAX: usize = 2000;
const META_MAX: usize = 500;

pub async fn submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let config = &state.config;

    let api_key = headers.get("x-api-key").and_then(|v| v.to_str().ok());
    if api_key != Some(config.api_key.as_str()) {
        return Err(AppError::Auth("Invalid API key"));
    }

    if body.len() > config.max_body_bytes {
        return Err(AppError::PayloadTooLarge);
    }

    let payload: SubmitPayload = serde_json::from_slice(&body)
        .map_err(|_| AppError::Validation("Please check your form data".to_string()))?;

    let client_ip = super::client_ip(&headers);
    check_rate_limit(&state, &client_ip).await?;

    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("Missing required field: name".to_string()));
    }
    if payload.communication.trim().is_empty() {
        return Err(AppError::Validation(
            "Missing required field: communication".to_string(),
        ));
    }

    validate::validate_name(&payload.name).map_err(AppError::Validation)?;
    let communication =
        validate::validate_communication(&payload.communication).map_err(AppError::Validation)?;
    validate::validate_time_slot(payload.time_slot.as_deref(), &config.booking_window())
        .map_err(AppError::Validation)?;

    let id = uuid::Uuid::new_v4().to_string();
    let created_at = Utc::now().to_rfc3339();

    let submission = Submission {
        id: id.clone(),
        name: sanitize(&payload.name, NAME_MAX),
        communication,
        info: sanitize(&payload.info, TEXT_MAX),
        comments: sanitize(&payload.comments, TEXT_MAX),
        time_slot: payload.time_slot.clone(),
        timestamp: payload.timestamp.unwrap_or_else(|| created_at.clone()),
        user_agent: sanitize(&payload.user_agent, META_MAX),
        referrer: sanitize(&payload.referrer, META_MAX),
        ip_address: client_ip,
        created_at: created_at.clone(),
        status: "new".to_string(),
    };

    let claimed_slot = claim_slot(&state, &submission).await?;

    if let Err(err) = state
        .stores
        .submissions
        .put(&submission, config.submission_ttl_secs)
        .await
    {
        // Give the slot back so the failed write doesn't block rebooking
        if let Some(slot) = claimed_slot {
            if let Err(release_err) = state.stores.submissions.release_slot(&slot).await {
                tracing::warn!("failed to release slot after write error: {release_err:#}");
            }
        }
        return Err(AppError::Internal(err));
    }

    tracing::info!(submission_id = %id, "form submission stored");

    let notifier = state.notifier.clone();
    let record = submission.clone();
    tokio::spawn(async move {
        if let Err(err) = notifier.submission_received(&record).await {
            tracing::warn!("submission notification failed: {err:#}");
        }
    });

    Ok(Json(serde_json::json!({
        "message": "Form submitted successfully",
        "submissionId": id,
        "timestamp": created_at,
    })))
}

async fn check_rate_limit(state: &AppState, client_ip: &str) -> Result<(), AppError> {
    let config = &state.config;
    let result = state
        .stores
        .rate_limiter
        .check(
            client_ip,
            config.rate_limit_max,
            config.rate_limit_window_secs,
            Utc::now().timestamp(),
        )
        .await;

    match result {
        Ok(r) if r.is_allowed() => Ok(()),
        Ok(_) => {
            tracing::warn!(client = %client_ip, "rate limit exceeded");
            Err(AppError::RateLimited)
        }
        Err(err) if config.rate_limit_fail_open => {
            tracing::warn!("rate limiter unavailable, admitting request: {err:#}");
            Ok(())
        }
        Err(err) => Err(AppError::Internal(err)),
    }
}

/// Claim the requested slot, if any. Returns the slot string when a claim
/// was actually recorded, so the caller can release it on a later failure.
async fn claim_slot(state: &AppState, submission: &Submission) -> Result<Option<String>, AppError> {
    let Some(slot) = &submission.time_slot else {
        return Ok(None);
    };

    match state
        .stores
        .submissions
        .claim_slot(slot, &submission.id, state.config.submission_ttl_secs)
        .await
    {
        Ok(true) => Ok(Some(slot.clone())),
        Ok(false) => Err(AppError::SlotConflict),
        Err(err) if state.config.slot_check_fail_open => {
            tracing::warn!("slot check unavailable, proceeding without conflict data: {err:#}");
            Ok(None)
        }
        Err(err) => Err(AppError::Internal(err)),
    }
}
