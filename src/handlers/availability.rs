//! Public availability read: which slots are already taken.

use axum::{extract::State, response::IntoResponse, Json};

use crate::{error::AppError, state::AppState};

pub async fn availability(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let submissions = state.stores.submissions.list().await?;

    let mut booked: Vec<String> = submissions
        .into_iter()
        .filter_map(|s| s.time_slot)
        .collect();
    booked.sort();
    booked.dedup();

    Ok(Json(serde_json::json!({ "bookedSlots": booked })))
}
