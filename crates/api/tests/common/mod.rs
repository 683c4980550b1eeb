//! Shared helpers for the API integration tests.
//!
//! The generation service is replaced by [`FakeGeneration`] and the store
//! by a [`MemoryStore`], so tests run without network access or disk.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use vidgen_api::config::ServerConfig;
use vidgen_api::router::build_app_router;
use vidgen_api::state::AppState;
use vidgen_core::generation::{GenerationParams, GenerationRequest};
use vidgen_core::job::{JobStatus, TaskSnapshot};
use vidgen_remote::{GenerationService, RemoteConfig, RemoteError, SubmittedTask};
use vidgen_store::{MemoryStore, StoreBackendKind};
use vidgen_tracker::{JobTracker, PollConfig};

// ---------------------------------------------------------------------------
// Fake generation service
// ---------------------------------------------------------------------------

/// Hands out ids `task-1`, `task-2`, ... and reports whatever status the
/// test last set for each id. Unknown ids are `NotFound`.
pub struct FakeGeneration {
    initial: JobStatus,
    next_id: AtomicUsize,
    statuses: Mutex<HashMap<String, JobStatus>>,
    submissions: AtomicUsize,
    fail_submit: bool,
    fail_lookup: bool,
    read_delay: Duration,
}

impl FakeGeneration {
    /// New jobs start in `initial`.
    pub fn new(initial: JobStatus) -> Self {
        Self {
            initial,
            next_id: AtomicUsize::new(1),
            statuses: Mutex::new(HashMap::new()),
            submissions: AtomicUsize::new(0),
            fail_submit: false,
            fail_lookup: false,
            read_delay: Duration::ZERO,
        }
    }

    /// Every submission is rejected by the vendor.
    pub fn failing_submit(mut self) -> Self {
        self.fail_submit = true;
        self
    }

    /// Every status read fails with a vendor error.
    pub fn failing_lookup(mut self) -> Self {
        self.fail_lookup = true;
        self
    }

    /// Every status read takes `delay` before answering.
    pub fn with_read_delay(mut self, delay: Duration) -> Self {
        self.read_delay = delay;
        self
    }

    pub fn set_status(&self, id: &str, status: JobStatus) {
        self.statuses
            .lock()
            .unwrap()
            .insert(id.to_string(), status);
    }

    pub fn submission_count(&self) -> usize {
        self.submissions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GenerationService for FakeGeneration {
    async fn submit(&self, _request: &GenerationRequest) -> Result<SubmittedTask, RemoteError> {
        if self.fail_submit {
            return Err(RemoteError::ApiError {
                status: 401,
                body: "secret vendor detail".into(),
            });
        }
        self.submissions.fetch_add(1, Ordering::SeqCst);
        let id = format!("task-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        self.set_status(&id, self.initial);
        Ok(SubmittedTask { id })
    }

    async fn fetch_status(&self, task_id: &str) -> Result<TaskSnapshot, RemoteError> {
        if !self.read_delay.is_zero() {
            tokio::time::sleep(self.read_delay).await;
        }
        if self.fail_lookup {
            return Err(RemoteError::ApiError {
                status: 502,
                body: "upstream unavailable".into(),
            });
        }
        let status = self
            .statuses
            .lock()
            .unwrap()
            .get(task_id)
            .copied()
            .ok_or_else(|| RemoteError::NotFound(task_id.to_string()))?;

        let mut snapshot = TaskSnapshot::pending(task_id);
        snapshot.status = status;
        if status == JobStatus::Succeeded {
            snapshot.output = vec![format!("https://cdn.test/{task_id}.mp4")];
        }
        Ok(snapshot)
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Build a test `ServerConfig` with safe defaults and a fast poll interval.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        max_body_bytes: 64 * 1024,
        store_backend: StoreBackendKind::Memory,
        store_path: PathBuf::new(),
        remote: RemoteConfig::new("key_test"),
        generation: GenerationParams::default(),
        poll: PollConfig {
            interval: Duration::from_millis(5),
            max_consecutive_failures: 3,
        },
    }
}

/// A router wired exactly like production plus a handle on its tracker.
pub struct TestApp {
    pub router: Router,
    pub tracker: Arc<JobTracker>,
}

pub fn build_test_app(remote: Arc<FakeGeneration>) -> TestApp {
    build_test_app_with(remote, test_config())
}

pub fn build_test_app_with(remote: Arc<FakeGeneration>, config: ServerConfig) -> TestApp {
    let tracker = Arc::new(JobTracker::new(
        Arc::new(MemoryStore::new()),
        remote,
        config.generation.clone(),
        config.poll,
    ));

    let state = AppState {
        config: Arc::new(config.clone()),
        tracker: Arc::clone(&tracker),
    };

    TestApp {
        router: build_app_router(state, &config),
        tracker,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: &Router, uri: &str) -> axum::response::Response {
    app.clone()
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn post_json(
    app: &Router,
    uri: &str,
    body: serde_json::Value,
) -> axum::response::Response {
    app.clone()
        .oneshot(
            Request::post(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

/// Assert the status code and parse the body as JSON.
pub async fn body_json(
    response: axum::response::Response,
    expected: StatusCode,
) -> serde_json::Value {
    assert_eq!(response.status(), expected);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
