//! Re-read the job list until nothing is left in flight.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use vidgen_core::job::JobRecord;

use crate::api::{ApiClient, ClientError};

/// How a watch ended.
#[derive(Debug, Clone, PartialEq)]
pub enum WatchOutcome {
    /// Every job is terminal. Carries the final listing.
    Settled(Vec<JobRecord>),
    /// The token fired first.
    Cancelled,
}

/// Number of records that have not reached a terminal status.
pub fn pending_count(records: &[JobRecord]) -> usize {
    records.iter().filter(|r| !r.is_terminal()).count()
}

/// Fetch the job list now and then every `interval`, handing each listing
/// to `on_update`, until no record is pending or `cancel` fires.
///
/// An empty listing counts as settled. A failed list request ends the watch
/// with the error.
pub async fn watch_until_settled<F>(
    client: &ApiClient,
    interval: Duration,
    cancel: &CancellationToken,
    mut on_update: F,
) -> Result<WatchOutcome, ClientError>
where
    F: FnMut(&[JobRecord]),
{
    loop {
        let records = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Ok(WatchOutcome::Cancelled),
            result = client.list() => result?,
        };

        on_update(&records);

        let pending = pending_count(&records);
        if pending == 0 {
            tracing::debug!(jobs = records.len(), "All jobs settled");
            return Ok(WatchOutcome::Settled(records));
        }
        tracing::debug!(pending, "Jobs still in flight");

        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Ok(WatchOutcome::Cancelled),
            _ = tokio::time::sleep(interval) => {}
        }
    }
}
