//! Handlers for the `/tasks` resource.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use vidgen_core::job::{JobRecord, TaskSnapshot};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Request body for [`submit_task`].
#[derive(Debug, Deserialize)]
pub struct SubmitTask {
    /// Public URL or `data:` URI of the source image.
    pub url: Option<String>,
}

/// POST /api/v1/tasks
///
/// Submit one image for video generation. Returns 201 with the first
/// persisted record; progress is picked up by background polling.
/// A body that is not a JSON object is a 400 `BAD_REQUEST`; one over
/// `MAX_BODY_BYTES` is a 413.
pub async fn submit_task(
    State(state): State<AppState>,
    input: Result<Json<SubmitTask>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = input.map_err(|rejection| match rejection.status() {
        StatusCode::PAYLOAD_TOO_LARGE => AppError::PayloadTooLarge,
        _ => AppError::BadRequest(rejection.body_text()),
    })?;
    let record = state.tracker.submit(input.url.as_deref()).await?;

    Ok((StatusCode::CREATED, Json(record)))
}

/// GET /api/v1/tasks
///
/// Every tracked job, oldest first.
pub async fn list_tasks(State(state): State<AppState>) -> AppResult<Json<Vec<JobRecord>>> {
    let records = state.tracker.list().await?;
    Ok(Json(records))
}

/// GET /api/v1/tasks/{id}
///
/// Live status straight from the generation service. Does not touch the
/// stored record.
pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<TaskSnapshot>> {
    let snapshot = state.tracker.lookup(&id).await?;

    tracing::debug!(job_id = %snapshot.id, status = %snapshot.status, "Task looked up");

    Ok(Json(snapshot))
}
