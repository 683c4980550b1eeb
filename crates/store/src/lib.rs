//! Key-value persistence for job records.
//!
//! [`KeyValueStore`] is the storage seam: anything that can get, set and
//! list JSON values by key. [`MemoryStore`] and [`FsStore`] are the two
//! bundled backends; [`JobRepo`] layers the job-record semantics (one key
//! per job, merge-safe upsert, oldest-first listing) on top of any of them.

pub mod fs;
pub mod job_repo;
pub mod memory;

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

pub use fs::FsStore;
pub use job_repo::JobRepo;
pub use memory::MemoryStore;

/// Errors from a storage backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Stored value could not be encoded or decoded: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid storage key '{0}'")]
    InvalidKey(String),
}

/// A flat map of string keys to JSON values.
///
/// No transactional guarantee spans a `get` followed by a `set`. Callers
/// that read-modify-write must ensure a single writer per key.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, StoreError>;

    async fn set(&self, key: &str, value: serde_json::Value) -> Result<(), StoreError>;

    async fn list_keys(&self) -> Result<Vec<String>, StoreError>;
}

// ---------------------------------------------------------------------------
// Backend selection
// ---------------------------------------------------------------------------

/// Which bundled backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackendKind {
    Memory,
    Fs,
}

impl StoreBackendKind {
    /// Parse from the `STORE_BACKEND` configuration value.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "memory" => Some(Self::Memory),
            "fs" | "file" | "filesystem" => Some(Self::Fs),
            _ => None,
        }
    }

    /// Configuration name value.
    pub fn name(self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Fs => "fs",
        }
    }

    /// Open a backend of this kind. `path` is only used by [`FsStore`].
    pub async fn open(self, path: &Path) -> Result<Arc<dyn KeyValueStore>, StoreError> {
        match self {
            Self::Memory => Ok(Arc::new(MemoryStore::new())),
            Self::Fs => Ok(Arc::new(FsStore::open(path).await?)),
        }
    }
}
