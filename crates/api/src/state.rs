use std::sync::Arc;

use vidgen_tracker::JobTracker;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Submits jobs and owns their background poll tasks.
    pub tracker: Arc<JobTracker>,
}
