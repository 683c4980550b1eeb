//! Directory-backed store: one JSON file per key.
//!
//! Writes go to `<key>.json.tmp` and are renamed over `<key>.json`, so a
//! concurrent reader sees either the old or the new value, never a torn one.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::{KeyValueStore, StoreError};

const FILE_EXTENSION: &str = ".json";
const TEMP_SUFFIX: &str = ".tmp";

pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub async fn open(root: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root = root.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&root).await?;
        tracing::info!(path = %root.display(), "Opened filesystem job store");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        validate_key(key)?;
        Ok(self.root.join(format!("{key}{FILE_EXTENSION}")))
    }
}

/// Keys become file names, so only `[A-Za-z0-9._-]` is allowed and a key
/// may not start with a dot.
fn validate_key(key: &str) -> Result<(), StoreError> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}

#[async_trait]
impl KeyValueStore for FsStore {
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, StoreError> {
        let path = self.path_for(key)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: serde_json::Value) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        let tmp = self.root.join(format!("{key}{FILE_EXTENSION}{TEMP_SUFFIX}"));

        let bytes = serde_json::to_vec_pretty(&value)?;
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    async fn list_keys(&self) -> Result<Vec<String>, StoreError> {
        let mut keys = Vec::new();
        let mut dir = tokio::fs::read_dir(&self.root).await?;

        while let Some(entry) = dir.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if let Some(key) = name.strip_suffix(FILE_EXTENSION) {
                if validate_key(key).is_ok() {
                    keys.push(key.to_string());
                }
            }
        }

        Ok(keys)
    }
}
