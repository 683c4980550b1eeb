//! Job lifecycle types.
//!
//! A [`TaskSnapshot`] is one observation of a job as reported by the
//! generation service. A [`JobRecord`] is what we persist: the latest
//! snapshot folded onto the record, with `created_at` pinned at first
//! persistence.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{JobId, Timestamp};

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Lifecycle status of a generation job.
///
/// Every variant except [`JobStatus::Error`] is assigned by the generation
/// service. `Error` is assigned locally when the poll loop gives up on a job
/// after repeated failures to observe it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
    Cancelled,
    /// Queued by the vendor because of rate limits. Not terminal.
    Throttled,
    Error,
}

/// Statuses after which a job is never polled again.
pub const TERMINAL_STATUSES: [JobStatus; 4] = [
    JobStatus::Succeeded,
    JobStatus::Failed,
    JobStatus::Cancelled,
    JobStatus::Error,
];

impl JobStatus {
    /// Whether no further status change is expected.
    pub fn is_terminal(self) -> bool {
        TERMINAL_STATUSES.contains(&self)
    }

    /// Wire name, e.g. `"SUCCEEDED"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Running => "RUNNING",
            Self::Succeeded => "SUCCEEDED",
            Self::Failed => "FAILED",
            Self::Cancelled => "CANCELLED",
            Self::Throttled => "THROTTLED",
            Self::Error => "ERROR",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Require a job id to be non-blank and made only of `[A-Za-z0-9_-]`.
///
/// Vendor ids are UUIDs; anything else would not survive being embedded in
/// a URL path or a storage key.
pub fn validate_job_id(id: &str) -> Result<&str, CoreError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(CoreError::Validation("task id is required".into()));
    }
    if !id.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-')) {
        return Err(CoreError::Validation(format!("invalid task id '{id}'")));
    }
    Ok(id)
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// A single status observation returned by the generation service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSnapshot {
    pub id: JobId,
    pub status: JobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    #[serde(default)]
    pub output: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<f32>,
}

impl TaskSnapshot {
    /// A bare `PENDING` observation for a job we know exists but could not
    /// read back yet.
    pub fn pending(id: impl Into<JobId>) -> Self {
        Self {
            id: id.into(),
            status: JobStatus::Pending,
            created_at: None,
            output: Vec::new(),
            failure: None,
            progress: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// The persisted representation of a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    pub id: JobId,
    pub status: JobStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    /// Result media locators. Only non-empty once the job has succeeded.
    #[serde(default)]
    pub output: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<f32>,
}

impl JobRecord {
    /// Build the first record for a job from its first observation.
    ///
    /// `created_at` comes from the vendor when it reports one, otherwise
    /// from `now`.
    pub fn from_snapshot(snapshot: TaskSnapshot, now: Timestamp) -> Self {
        let mut record = Self {
            id: snapshot.id.clone(),
            status: snapshot.status,
            created_at: snapshot.created_at.unwrap_or(now),
            updated_at: now,
            output: Vec::new(),
            failure: None,
            progress: None,
        };
        record.apply(snapshot, now);
        record
    }

    /// Fold a newer observation onto this record.
    ///
    /// `id` and `created_at` are never touched. Output is kept only for
    /// succeeded jobs.
    pub fn apply(&mut self, snapshot: TaskSnapshot, now: Timestamp) {
        self.status = snapshot.status;
        self.output = if snapshot.status == JobStatus::Succeeded {
            snapshot.output
        } else {
            Vec::new()
        };
        self.failure = snapshot.failure;
        self.progress = snapshot.progress;
        self.updated_at = now;
    }

    /// Mark the record as abandoned by the poll loop.
    pub fn mark_error(&mut self, message: impl Into<String>, now: Timestamp) {
        self.status = JobStatus::Error;
        self.failure = Some(message.into());
        self.updated_at = now;
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;

    fn at(secs: i64) -> Timestamp {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn snapshot(status: JobStatus) -> TaskSnapshot {
        TaskSnapshot {
            status,
            ..TaskSnapshot::pending("task-1")
        }
    }

    #[test]
    fn terminal_set() {
        assert!(JobStatus::Succeeded.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
        assert!(JobStatus::Cancelled.is_terminal());
        assert!(JobStatus::Error.is_terminal());
        assert!(!JobStatus::Pending.is_terminal());
        assert!(!JobStatus::Running.is_terminal());
        assert!(!JobStatus::Throttled.is_terminal());
    }

    #[test]
    fn job_id_validation() {
        assert_eq!(validate_job_id(" 3f2a-b9_c ").unwrap(), "3f2a-b9_c");
        assert!(validate_job_id("").is_err());
        assert!(validate_job_id("   ").is_err());
        assert!(validate_job_id("../tasks").is_err());
        assert!(validate_job_id("a/b").is_err());
    }

    #[test]
    fn status_serializes_screaming_snake_case() {
        let json = serde_json::to_value(JobStatus::Throttled).unwrap();
        assert_eq!(json, "THROTTLED");

        let parsed: JobStatus = serde_json::from_value(serde_json::json!("SUCCEEDED")).unwrap();
        assert_eq!(parsed, JobStatus::Succeeded);
        assert_eq!(parsed.to_string(), "SUCCEEDED");
    }

    #[test]
    fn from_snapshot_prefers_vendor_created_at() {
        let mut snap = snapshot(JobStatus::Running);
        snap.created_at = Some(at(-30));

        let record = JobRecord::from_snapshot(snap, at(0));
        assert_eq!(record.created_at, at(-30));
        assert_eq!(record.updated_at, at(0));
    }

    #[test]
    fn from_snapshot_falls_back_to_now() {
        let record = JobRecord::from_snapshot(snapshot(JobStatus::Pending), at(5));
        assert_eq!(record.created_at, at(5));
    }

    #[test]
    fn apply_never_moves_created_at() {
        let mut record = JobRecord::from_snapshot(snapshot(JobStatus::Pending), at(0));

        let mut later = snapshot(JobStatus::Succeeded);
        later.created_at = Some(at(0) + Duration::hours(1));
        later.output = vec!["https://cdn.example/video.mp4".into()];
        record.apply(later, at(10));

        assert_eq!(record.created_at, at(0));
        assert_eq!(record.updated_at, at(10));
        assert_eq!(record.status, JobStatus::Succeeded);
        assert_eq!(record.output.len(), 1);
    }

    #[test]
    fn output_dropped_unless_succeeded() {
        let mut snap = snapshot(JobStatus::Running);
        snap.output = vec!["https://cdn.example/partial.mp4".into()];

        let record = JobRecord::from_snapshot(snap, at(0));
        assert!(record.output.is_empty());
    }

    #[test]
    fn mark_error_sets_failure() {
        let mut record = JobRecord::from_snapshot(snapshot(JobStatus::Running), at(0));
        record.mark_error("connection refused", at(3));

        assert_eq!(record.status, JobStatus::Error);
        assert_eq!(record.failure.as_deref(), Some("connection refused"));
        assert!(record.is_terminal());
    }

    #[test]
    fn record_json_uses_camel_case() {
        let record = JobRecord::from_snapshot(snapshot(JobStatus::Pending), at(0));
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["id"], "task-1");
        assert_eq!(json["status"], "PENDING");
        assert!(json["createdAt"].is_string());
        assert!(json["output"].as_array().unwrap().is_empty());
        assert!(json.get("failure").is_none());
    }

    #[test]
    fn snapshot_parses_minimal_vendor_payload() {
        let snap: TaskSnapshot =
            serde_json::from_value(serde_json::json!({ "id": "abc", "status": "RUNNING" }))
                .unwrap();
        assert_eq!(snap.status, JobStatus::Running);
        assert!(snap.output.is_empty());
        assert!(snap.created_at.is_none());
    }
}
