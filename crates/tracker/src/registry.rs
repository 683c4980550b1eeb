//! Process-wide registry of background poll tasks.
//!
//! Every tracked job id maps to at most one live task. Tasks get a child of
//! the registry's master [`CancellationToken`], so [`PollRegistry::shutdown`]
//! stops them all. Finished tasks are pruned lazily on the next spawn or
//! count; their outcomes move to a bounded history so
//! [`PollRegistry::wait`] can still report how a recent job ended.

use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::time::Duration;

use tokio::sync::{watch, Mutex};
use tokio_util::sync::CancellationToken;
use vidgen_core::types::JobId;

use crate::poller::PollOutcome;

/// How long [`PollRegistry::shutdown`] waits for each task to exit.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Outcomes of pruned tasks kept for [`PollRegistry::wait`].
const OUTCOME_HISTORY: usize = 1024;

/// Bookkeeping for one poll task.
struct ManagedPoll {
    task_handle: tokio::task::JoinHandle<()>,
    outcome: watch::Receiver<Option<PollOutcome>>,
}

impl ManagedPoll {
    fn is_finished(&self) -> bool {
        self.task_handle.is_finished()
    }
}

#[derive(Default)]
struct Tasks {
    live: HashMap<JobId, ManagedPoll>,
    finished: VecDeque<(JobId, PollOutcome)>,
}

impl Tasks {
    /// Move finished tasks out of `live`, keeping their outcomes.
    fn prune(&mut self) {
        let Tasks { live, finished } = self;
        live.retain(|job_id, managed| {
            if !managed.is_finished() {
                return true;
            }
            // A panicked task never reported an outcome.
            let outcome = *managed.outcome.borrow();
            if let Some(outcome) = outcome {
                remember(finished, job_id, outcome);
            }
            false
        });
    }

    #[cfg(test)]
    fn remember(&mut self, job_id: &str, outcome: PollOutcome) {
        remember(&mut self.finished, job_id, outcome);
    }

    fn finished_outcome(&self, job_id: &str) -> Option<PollOutcome> {
        self.finished
            .iter()
            .rev()
            .find(|(id, _)| id == job_id)
            .map(|(_, outcome)| *outcome)
    }
}

fn remember(finished: &mut VecDeque<(JobId, PollOutcome)>, job_id: &str, outcome: PollOutcome) {
    finished.retain(|(id, _)| id != job_id);
    finished.push_back((job_id.to_string(), outcome));
    if finished.len() > OUTCOME_HISTORY {
        finished.pop_front();
    }
}

pub struct PollRegistry {
    tasks: Mutex<Tasks>,
    /// Master cancellation token, cancelled during shutdown.
    cancel: CancellationToken,
}

impl PollRegistry {
    pub fn new() -> Self {
        Self {
            tasks: Mutex::new(Tasks::default()),
            cancel: CancellationToken::new(),
        }
    }

    /// Spawn the poll task for `job_id`.
    ///
    /// `make` receives the task's cancellation token. Returns `false` without
    /// spawning when a task for this id is still running or the registry has
    /// been shut down.
    pub async fn spawn<F, Fut>(&self, job_id: &str, make: F) -> bool
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = PollOutcome> + Send + 'static,
    {
        let mut tasks = self.tasks.lock().await;

        if self.cancel.is_cancelled() {
            tracing::warn!(job_id, "Poll registry is shut down; not spawning");
            return false;
        }
        tasks.prune();
        if tasks.live.contains_key(job_id) {
            tracing::debug!(job_id, "Job already has a poll task");
            return false;
        }

        let (outcome_tx, outcome_rx) = watch::channel(None);
        let poll = make(self.cancel.child_token());
        let task_handle = tokio::spawn(async move {
            let outcome = poll.await;
            let _ = outcome_tx.send(Some(outcome));
        });

        tasks.live.insert(
            job_id.to_string(),
            ManagedPoll {
                task_handle,
                outcome: outcome_rx,
            },
        );
        true
    }

    /// Whether a poll task for `job_id` is still running.
    pub async fn is_polling(&self, job_id: &str) -> bool {
        self.tasks
            .lock()
            .await
            .live
            .get(job_id)
            .is_some_and(|managed| !managed.is_finished())
    }

    /// Number of poll tasks still running.
    pub async fn active_count(&self) -> usize {
        let mut tasks = self.tasks.lock().await;
        tasks.prune();
        tasks.live.len()
    }

    /// Wait for the poll task of `job_id` to finish and return its outcome.
    ///
    /// Returns `None` if no task was spawned for the id, if its outcome has
    /// aged out of the history, if the task panicked, or after
    /// [`PollRegistry::shutdown`].
    pub async fn wait(&self, job_id: &str) -> Option<PollOutcome> {
        let mut outcome = {
            let tasks = self.tasks.lock().await;
            match tasks.live.get(job_id) {
                Some(managed) => managed.outcome.clone(),
                None => return tasks.finished_outcome(job_id),
            }
        };

        let settled = *outcome.wait_for(Option::is_some).await.ok()?;
        settled
    }

    /// Cancel every poll task and wait for each to exit.
    pub async fn shutdown(&self) {
        self.cancel.cancel();

        let mut tasks = self.tasks.lock().await;
        let count = tasks.live.len();
        for (job_id, managed) in tasks.live.drain() {
            if tokio::time::timeout(SHUTDOWN_GRACE, managed.task_handle).await.is_err() {
                tracing::warn!(job_id = %job_id, "Poll task did not stop within grace period");
            }
        }
        tasks.finished.clear();

        tracing::info!(count, "Poll registry shut down");
    }

    /// Entries held for live or not yet pruned tasks.
    #[cfg(test)]
    async fn tracked_len(&self) -> usize {
        self.tasks.lock().await.live.len()
    }
}

impl Default for PollRegistry {
    fn default() -> Self {
        Self::new()
    }
}
