//! Privileged admin surface: list and delete submissions.

use std::collections::HashMap;

use axum::{
    body::Bytes,
    extract::{Query, State},
    response::IntoResponse,
    Json,
};

use crate::{
    error::AppError, middleware::auth::AdminUser, models::DeletePayload, state::AppState,
};

pub async fn admin_data(
    user: AdminUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let mut submissions = state.stores.submissions.list().await?;
    submissions.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    tracing::debug!(subject = %user.subject, count = submissions.len(), "admin data listed");

    Ok(Json(serde_json::json!({ "submissions": submissions })))
}

/// Delete by id, taken from `?id=` or the request body - the browser
/// client sends DELETE without a body to dodge preflight.
pub async fn delete_submission(
    user: AdminUser,
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let body_id = serde_json::from_slice::<DeletePayload>(&body)
        .ok()
        .and_then(|p| p.id);
    let id = query
        .get("id")
        .cloned()
        .or(body_id)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::Validation("Missing submission id".to_string()))?;

    // Free the slot claim before dropping the record itself
    if let Ok(Some(submission)) = state.stores.submissions.get(&id).await {
        if let Some(slot) = &submission.time_slot {
            if let Err(err) = state.stores.submissions.release_slot(slot).await {
                tracing::warn!("failed to release slot for deleted submission: {err:#}");
            }
        }
    }

    if !state.stores.submissions.delete(&id).await? {
        return Err(AppError::NotFound("Submission"));
    }

    tracing::info!(subject = %user.subject, submission_id = %id, "submission deleted");

    Ok(Json(serde_json::json!({ "message": "Submission deleted" })))
}
