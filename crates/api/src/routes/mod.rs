pub mod health;
pub mod tasks;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /tasks                 submit (POST), list (GET)
/// /tasks/{id}            live status from the generation service (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/tasks", tasks::router())
}
