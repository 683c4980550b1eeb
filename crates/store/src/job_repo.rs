//! Job-record persistence on top of a [`KeyValueStore`].
//!
//! Each job lives under its own key (`job-<id>`). Because every id has a
//! single writer (its poll task), the read-modify-write in [`JobRepo::upsert`]
//! cannot lose another job's update.

use chrono::Utc;
use futures::future::join_all;
use vidgen_core::job::{JobRecord, TaskSnapshot};

use crate::{KeyValueStore, StoreError};

/// Prefix shared by every job-record key.
pub const KEY_PREFIX: &str = "job-";

/// Provides record-level operations for generation jobs.
pub struct JobRepo;

impl JobRepo {
    /// Storage key for a job id.
    pub fn key_for(id: &str) -> String {
        format!("{KEY_PREFIX}{id}")
    }

    /// Load a single record. `None` if the job was never persisted.
    pub async fn find(store: &dyn KeyValueStore, id: &str) -> Result<Option<JobRecord>, StoreError> {
        match store.get(&Self::key_for(id)).await? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    /// Insert or replace the record for `snapshot.id`.
    ///
    /// An existing record is updated in place and keeps its `created_at`;
    /// otherwise a new record is created. Returns the record as persisted.
    pub async fn upsert(
        store: &dyn KeyValueStore,
        snapshot: TaskSnapshot,
    ) -> Result<JobRecord, StoreError> {
        let now = Utc::now();
        let record = match Self::find(store, &snapshot.id).await? {
            Some(mut existing) => {
                existing.apply(snapshot, now);
                existing
            }
            None => JobRecord::from_snapshot(snapshot, now),
        };

        Self::save(store, &record).await?;
        Ok(record)
    }

    /// Mark a job as abandoned with `message` as its failure reason.
    ///
    /// A job that was never persisted gets a fresh `ERROR` record.
    pub async fn mark_error(
        store: &dyn KeyValueStore,
        id: &str,
        message: &str,
    ) -> Result<JobRecord, StoreError> {
        let now = Utc::now();
        let mut record = match Self::find(store, id).await? {
            Some(existing) => existing,
            None => JobRecord::from_snapshot(TaskSnapshot::pending(id), now),
        };
        record.mark_error(message, now);

        Self::save(store, &record).await?;
        Ok(record)
    }

    /// Every persisted record, oldest `created_at` first.
    ///
    /// Entries that vanish between listing and reading, or that no longer
    /// decode, are skipped with a warning rather than failing the listing.
    pub async fn list_oldest_first(store: &dyn KeyValueStore) -> Result<Vec<JobRecord>, StoreError> {
        let keys: Vec<String> = store
            .list_keys()
            .await?
            .into_iter()
            .filter(|k| k.starts_with(KEY_PREFIX))
            .collect();

        let reads = join_all(keys.iter().map(|key| store.get(key))).await;

        let mut records = Vec::with_capacity(keys.len());
        for (key, read) in keys.iter().zip(reads) {
            match read {
                Ok(Some(value)) => match serde_json::from_value::<JobRecord>(value) {
                    Ok(record) => records.push(record),
                    Err(e) => {
                        tracing::warn!(key = %key, error = %e, "Skipping undecodable job record");
                    }
                },
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "Skipping unreadable job record");
                }
            }
        }

        records.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(records)
    }

    async fn save(store: &dyn KeyValueStore, record: &JobRecord) -> Result<(), StoreError> {
        let value = serde_json::to_value(record)?;
        store.set(&Self::key_for(&record.id), value).await
    }
}
