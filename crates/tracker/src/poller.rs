//! The per-job background poll loop.
//!
//! Each iteration sleeps for the configured interval, reads the job's status
//! from the generation service, and upserts it. Iterations never overlap for
//! the same job. The loop ends on a terminal status, after too many
//! consecutive failures, or when its [`CancellationToken`] fires.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use vidgen_core::job::{JobRecord, JobStatus};
use vidgen_core::types::JobId;
use vidgen_remote::GenerationService;
use vidgen_store::{JobRepo, KeyValueStore};

use crate::config::PollConfig;
use crate::error::PollError;

/// How a poll loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// The job reached a terminal status.
    Settled(JobStatus),
    /// Too many consecutive failures; the record was marked `ERROR`.
    GaveUp,
    /// Stopped by shutdown before the job settled.
    Cancelled,
}

/// Everything a poll task owns.
pub(crate) struct PollContext {
    pub job_id: JobId,
    pub store: Arc<dyn KeyValueStore>,
    pub remote: Arc<dyn GenerationService>,
    pub config: PollConfig,
}

/// Poll `ctx.job_id` until it settles, gives up, or `cancel` fires.
pub(crate) async fn poll_until_settled(ctx: PollContext, cancel: CancellationToken) -> PollOutcome {
    let max_failures = ctx.config.max_consecutive_failures.max(1);
    let mut failures = 0u32;

    tracing::debug!(
        job_id = %ctx.job_id,
        interval_ms = ctx.config.interval.as_millis() as u64,
        "Poll loop started",
    );

    loop {
        tokio::select! {
            _ = cancel.cancelled() => return cancelled(&ctx.job_id),
            _ = tokio::time::sleep(ctx.config.interval) => {}
        }

        let observed = tokio::select! {
            _ = cancel.cancelled() => return cancelled(&ctx.job_id),
            result = observe_once(&ctx) => result,
        };

        match observed {
            Ok(record) if record.is_terminal() => {
                tracing::info!(
                    job_id = %ctx.job_id,
                    status = %record.status,
                    outputs = record.output.len(),
                    "Job settled",
                );
                return PollOutcome::Settled(record.status);
            }
            Ok(record) => {
                failures = 0;
                tracing::debug!(job_id = %ctx.job_id, status = %record.status, "Job still in progress");
            }
            Err(e) => {
                failures += 1;
                tracing::warn!(
                    job_id = %ctx.job_id,
                    failures,
                    max_failures,
                    error = %e,
                    "Poll iteration failed",
                );

                if failures >= max_failures {
                    return give_up(&ctx, &e).await;
                }
            }
        }
    }
}

/// One fetch-then-persist step.
async fn observe_once(ctx: &PollContext) -> Result<JobRecord, PollError> {
    let mut snapshot = ctx.remote.fetch_status(&ctx.job_id).await?;
    // The key is owned by this task; never let the payload redirect the write.
    snapshot.id = ctx.job_id.clone();
    Ok(JobRepo::upsert(ctx.store.as_ref(), snapshot).await?)
}

async fn give_up(ctx: &PollContext, last_error: &PollError) -> PollOutcome {
    tracing::error!(
        job_id = %ctx.job_id,
        error = %last_error,
        "Giving up on job after repeated poll failures",
    );

    let message = format!("status polling abandoned: {last_error}");
    if let Err(e) = JobRepo::mark_error(ctx.store.as_ref(), &ctx.job_id, &message).await {
        tracing::error!(job_id = %ctx.job_id, error = %e, "Failed to mark job as errored");
    }

    PollOutcome::GaveUp
}

fn cancelled(job_id: &str) -> PollOutcome {
    tracing::info!(job_id, "Poll loop cancelled");
    PollOutcome::Cancelled
}
