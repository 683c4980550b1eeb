use std::sync::Arc;

use vidgen_core::generation::{validate_image_reference, GenerationParams};
use vidgen_core::job::{validate_job_id, JobRecord, TaskSnapshot};
use vidgen_core::types::JobId;
use vidgen_remote::{GenerationService, RemoteError};
use vidgen_store::{JobRepo, KeyValueStore};

use crate::config::PollConfig;
use crate::error::TrackerError;
use crate::poller::{poll_until_settled, PollContext, PollOutcome};
use crate::registry::PollRegistry;

/// Submits generation jobs and keeps their persisted records current.
///
/// Created once at startup and shared behind an `Arc`. The store and the
/// generation service are injected so tests can substitute fakes.
pub struct JobTracker {
    store: Arc<dyn KeyValueStore>,
    remote: Arc<dyn GenerationService>,
    params: GenerationParams,
    poll: PollConfig,
    registry: Arc<PollRegistry>,
}

impl JobTracker {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        remote: Arc<dyn GenerationService>,
        params: GenerationParams,
        poll: PollConfig,
    ) -> Self {
        Self {
            store,
            remote,
            params,
            poll,
            registry: Arc::new(PollRegistry::new()),
        }
    }

    /// Submit one image and start tracking the resulting job.
    ///
    /// Returns as soon as the first observation is persisted; completion is
    /// observed later through [`JobTracker::list`]. Once the generation
    /// service has accepted the job, recording it runs on its own task, so a
    /// caller that stops waiting does not lose the job.
    pub async fn submit(&self, image: Option<&str>) -> Result<JobRecord, TrackerError> {
        let image = validate_image_reference(image)?;
        let request = self.params.request_for(image);

        let task = self
            .remote
            .submit(&request)
            .await
            .map_err(TrackerError::RemoteSubmissionFailed)?;

        let admission = Admission {
            store: Arc::clone(&self.store),
            remote: Arc::clone(&self.remote),
            registry: Arc::clone(&self.registry),
            poll: self.poll,
        };

        tokio::spawn(admission.run(task.id))
            .await
            .map_err(|e| TrackerError::Internal(format!("job admission task failed: {e}")))?
    }

    /// Every persisted job record, oldest first.
    pub async fn list(&self) -> Result<Vec<JobRecord>, TrackerError> {
        Ok(JobRepo::list_oldest_first(self.store.as_ref()).await?)
    }

    /// Read a job's status straight from the generation service.
    ///
    /// Bypasses the store and writes nothing back; the job's poll task stays
    /// the single writer for its record.
    pub async fn lookup(&self, id: &str) -> Result<TaskSnapshot, TrackerError> {
        let id = validate_job_id(id)?;

        self.remote.fetch_status(id).await.map_err(|e| match e {
            RemoteError::NotFound(id) => TrackerError::NotFound(id),
            other => TrackerError::RemoteLookupFailed(other),
        })
    }

    /// Number of jobs currently being polled.
    pub async fn active_polls(&self) -> usize {
        self.registry.active_count().await
    }

    pub async fn is_polling(&self, id: &str) -> bool {
        self.registry.is_polling(id).await
    }

    /// Wait until the poll task for `id` ends.
    pub async fn wait_for(&self, id: &str) -> Option<PollOutcome> {
        self.registry.wait(id).await
    }

    /// Stop all background polling. Records keep their last persisted state.
    pub async fn shutdown(&self) {
        tracing::info!("Shutting down job tracker");
        self.registry.shutdown().await;
    }
}

/// Records a job the generation service has accepted and hands it to
/// background polling.
struct Admission {
    store: Arc<dyn KeyValueStore>,
    remote: Arc<dyn GenerationService>,
    registry: Arc<PollRegistry>,
    poll: PollConfig,
}

impl Admission {
    async fn run(self, job_id: JobId) -> Result<JobRecord, TrackerError> {
        let snapshot = match self.remote.fetch_status(&job_id).await {
            Ok(mut snapshot) => {
                snapshot.id = job_id.clone();
                snapshot
            }
            Err(e) => {
                // The job exists remotely; record it so polling can pick it up.
                tracing::warn!(
                    job_id = %job_id,
                    error = %e,
                    "Confirmation read failed; recording job as pending",
                );
                TaskSnapshot::pending(job_id.clone())
            }
        };

        let record = JobRepo::upsert(self.store.as_ref(), snapshot).await?;
        tracing::info!(job_id = %record.id, status = %record.status, "Job submitted");

        if !record.is_terminal() {
            self.start_polling(&record.id).await;
        }

        Ok(record)
    }

    async fn start_polling(&self, job_id: &str) {
        let ctx = PollContext {
            job_id: job_id.to_string(),
            store: Arc::clone(&self.store),
            remote: Arc::clone(&self.remote),
            config: self.poll,
        };

        let spawned = self
            .registry
            .spawn(job_id, move |cancel| poll_until_settled(ctx, cancel))
            .await;

        if spawned {
            tracing::debug!(job_id, "Poll task spawned");
        }
    }
}
