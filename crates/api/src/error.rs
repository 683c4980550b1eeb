use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use vidgen_tracker::TrackerError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`TrackerError`] and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A job tracking error from `vidgen_tracker`.
    #[error(transparent)]
    Tracker(#[from] TrackerError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The request body exceeded the configured size limit.
    #[error("Request body too large")]
    PayloadTooLarge,
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- Tracker errors ---
            AppError::Tracker(err) => classify_tracker_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "PAYLOAD_TOO_LARGE",
                "Request body is too large".to_string(),
            ),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a tracker error into an HTTP status, error code, and message.
///
/// Input problems map to 400 and unknown tasks to 404. Vendor and storage
/// failures map to 500 with a sanitized message; the detail is only logged.
fn classify_tracker_error(err: &TrackerError) -> (StatusCode, &'static str, String) {
    match err {
        TrackerError::InvalidInput(msg) => {
            (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
        }
        TrackerError::NotFound(id) => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("Task with id {id} not found"),
        ),
        TrackerError::RemoteSubmissionFailed(_)
        | TrackerError::RemoteLookupFailed(_)
        | TrackerError::Store(_)
        | TrackerError::Internal(_) => internal(&err.to_string()),
    }
}

fn internal(detail: &str) -> (StatusCode, &'static str, String) {
    tracing::error!(error = %detail, "Internal error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}
