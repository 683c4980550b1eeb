use vidgen_core::error::CoreError;
use vidgen_remote::RemoteError;
use vidgen_store::StoreError;

/// Errors returned to callers of [`crate::JobTracker`].
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    /// A required field is missing or malformed. Nothing was submitted.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The generation service rejected or failed the submission.
    #[error("Remote submission failed: {0}")]
    RemoteSubmissionFailed(#[source] RemoteError),

    /// A direct status lookup against the generation service failed.
    #[error("Remote lookup failed: {0}")]
    RemoteLookupFailed(#[source] RemoteError),

    #[error("Task {0} not found")]
    NotFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// The background step that records an accepted job did not complete.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<CoreError> for TrackerError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(msg) => Self::InvalidInput(msg),
        }
    }
}

/// A single failed poll iteration. Never surfaced to HTTP callers; the poll
/// loop counts these and gives up after too many in a row.
#[derive(Debug, thiserror::Error)]
pub enum PollError {
    #[error("status fetch failed: {0}")]
    Remote(#[from] RemoteError),

    #[error("persisting status failed: {0}")]
    Store(#[from] StoreError),
}
