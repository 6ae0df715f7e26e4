use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

/// Request-level error taxonomy. Every handler path returns one of these;
/// nothing escapes to the transport uncaught.
#[derive(Debug)]
pub enum AppError {
    /// Internal errors - logged but return generic 500 to user.
    Internal(anyhow::Error),
    /// Field validation failure - message is safe to show.
    Validation(String),
    /// Authentication failure - always the same generic message, never
    /// revealing which credential scheme was attempted.
    Auth(&'static str),
    /// Client exceeded the request ceiling for the current window.
    RateLimited,
    /// Request body over the configured byte limit.
    PayloadTooLarge,
    /// Requested time slot is already booked.
    SlotConflict,
    /// Referenced record does not exist.
    NotFound(&'static str),
}

impl AppError {
    fn status_and_body(&self) -> (StatusCode, &str, String) {
        match self {
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error",
                "Something went wrong. Please try again later.".to_string(),
            ),
            AppError::Validation(reason) => (
                StatusCode::BAD_REQUEST,
                "Validation failed",
                reason.clone(),
            ),
            AppError::Auth(reason) => (StatusCode::UNAUTHORIZED, "Unauthorized", reason.to_string()),
            AppError::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                "Rate limit exceeded",
                "Too many requests. Try again later.".to_string(),
            ),
            AppError::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "Payload too large",
                "Request body exceeds the allowed size.".to_string(),
            ),
            AppError::SlotConflict => (
                StatusCode::CONFLICT,
                "Slot unavailable",
                "That time slot has already been booked.".to_string(),
            ),
            AppError::NotFound(what) => (
                StatusCode::NOT_FOUND,
                "Not found",
                format!("{what} not found"),
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Internal(err) = &self {
            tracing::error!("internal error: {:?}", err);
            sentry::capture_error(err.as_ref() as &(dyn std::error::Error + Send + Sync + 'static));
        }

        let (status, error, message) = self.status_and_body();
        let body = serde_json::json!({ "error": error, "message": message });
        (status, Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self::Internal(err.into())
    }
}
