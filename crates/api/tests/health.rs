//! Integration tests for the health endpoint.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::json;
use vidgen_core::job::JobStatus;

use common::{body_json, build_test_app, get, post_json, FakeGeneration};

// ---------------------------------------------------------------------------
// Test: health reports version and zero polls on an idle server
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_returns_ok_when_idle() {
    let app = build_test_app(Arc::new(FakeGeneration::new(JobStatus::Succeeded)));

    let json = body_json(get(&app.router, "/health").await, StatusCode::OK).await;

    assert_eq!(json["status"], "ok");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(json["active_polls"], 0);
}

// ---------------------------------------------------------------------------
// Test: an in-progress job shows up as an active poll
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_counts_active_polls() {
    let app = build_test_app(Arc::new(FakeGeneration::new(JobStatus::Running)));

    let response = post_json(
        &app.router,
        "/api/v1/tasks",
        json!({ "url": "https://img.test/cat.png" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(get(&app.router, "/health").await, StatusCode::OK).await;
    assert_eq!(json["active_polls"], 1);

    app.tracker.shutdown().await;
}

// ---------------------------------------------------------------------------
// Test: health is not nested under /api/v1
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_is_mounted_at_root_only() {
    let app = build_test_app(Arc::new(FakeGeneration::new(JobStatus::Succeeded)));

    let response = get(&app.router, "/api/v1/health").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
