//! Tests for `AppError` → HTTP response mapping.
//!
//! These call `IntoResponse` directly on `AppError` values; no server is
//! involved.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;
use vidgen_api::error::AppError;
use vidgen_core::error::CoreError;
use vidgen_remote::RemoteError;
use vidgen_store::StoreError;
use vidgen_tracker::TrackerError;

/// Helper: convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

// ---------------------------------------------------------------------------
// Test: TrackerError variants
// ---------------------------------------------------------------------------

#[tokio::test]
async fn core_validation_converts_to_400() {
    let err = AppError::from(TrackerError::from(CoreError::Validation("url is required".into())));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "url is required");
}

#[tokio::test]
async fn tracker_invalid_input_returns_400() {
    let err = AppError::from(TrackerError::InvalidInput("task id is required".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "task id is required");
}

#[tokio::test]
async fn tracker_not_found_returns_404() {
    let (status, json) =
        error_to_response(AppError::from(TrackerError::NotFound("t-1".into()))).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Task with id t-1 not found");
}

#[tokio::test]
async fn tracker_remote_failures_are_sanitized() {
    let errors = [
        TrackerError::RemoteSubmissionFailed(RemoteError::ApiError {
            status: 401,
            body: "bad key sk-123".into(),
        }),
        TrackerError::RemoteLookupFailed(RemoteError::NotFound("gone".into())),
        TrackerError::Store(StoreError::InvalidKey("../etc".into())),
        TrackerError::Internal("job admission task panicked".into()),
    ];

    for err in errors {
        let (status, json) = error_to_response(AppError::from(err)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["code"], "INTERNAL_ERROR");
        assert_eq!(json["error"], "An internal error occurred");
    }
}

// ---------------------------------------------------------------------------
// Test: HTTP-specific variants
// ---------------------------------------------------------------------------

#[tokio::test]
async fn bad_request_returns_400() {
    let (status, json) = error_to_response(AppError::BadRequest("nope".into())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
    assert_eq!(json["error"], "nope");
}

#[tokio::test]
async fn payload_too_large_returns_413() {
    let (status, json) = error_to_response(AppError::PayloadTooLarge).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(json["code"], "PAYLOAD_TOO_LARGE");
}
