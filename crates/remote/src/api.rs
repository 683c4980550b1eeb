use async_trait::async_trait;
use serde::Deserialize;
use vidgen_core::generation::GenerationRequest;
use vidgen_core::job::TaskSnapshot;

/// Response to a successful submission.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SubmittedTask {
    /// Vendor-assigned task id.
    pub id: String,
}

/// Errors from the generation service layer.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout, decode).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The configured API URL cannot carry a request path.
    #[error("Invalid generation API URL: {0}")]
    InvalidUrl(String),

    /// The vendor does not know this task id.
    #[error("Task {0} not found")]
    NotFound(String),

    /// The vendor returned a non-2xx status code.
    #[error("Generation API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

/// Submission and status lookup against the generation service.
///
/// Implementations apply no retry policy; every call is a single attempt.
#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Queue one image-to-video job.
    async fn submit(&self, request: &GenerationRequest) -> Result<SubmittedTask, RemoteError>;

    /// Read the current state of a previously submitted job.
    async fn fetch_status(&self, task_id: &str) -> Result<TaskSnapshot, RemoteError>;
}
