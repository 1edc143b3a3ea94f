//! Local persistent key-value storage
//!
//! Best-effort mirror of confirmed state: one JSON document per key, no
//! transactions, last-write-wins. Per-user keys are partitioned by the
//! resolved user id so concurrent sessions for different users never
//! collide.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::{StateError, StateResult};

/// Storage key for the bearer token
pub const AUTH_TOKEN_KEY: &str = "auth_token";
/// Storage key mirroring the resolved user id
pub const USER_ID_KEY: &str = "user_id";
/// Storage key for the category cache snapshot
pub const CATEGORIES_KEY: &str = "categories_cache";
/// Storage key for recent searches
pub const SEARCH_HISTORY_KEY: &str = "searchHistory";

/// Cart storage key for one user
pub fn cart_key(user_id: &str) -> String {
    format!("cart_items_{}", user_id)
}

/// Wishlist storage key for one user
pub fn wishlist_key(user_id: &str) -> String {
    format!("wishlist_items_{}", user_id)
}

/// Async string key-value store
#[async_trait]
pub trait LocalStore: Send + Sync {
    async fn get(&self, key: &str) -> StateResult<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> StateResult<()>;
    async fn remove(&self, key: &str) -> StateResult<()>;
}

/// File-backed store: one `<key>.json` file per key under a data directory
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at the given data directory
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        // Keys are internal constants plus user ids; keep filenames tame
        let safe: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
            .collect();
        self.dir.join(format!("{}.json", safe))
    }
}

#[async_trait]
impl LocalStore for FileStore {
    async fn get(&self, key: &str) -> StateResult<Option<String>> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StateError::Storage(e.to_string())),
        }
    }

    async fn set(&self, key: &str, value: &str) -> StateResult<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| StateError::Storage(e.to_string()))?;
        tokio::fs::write(self.path_for(key), value)
            .await
            .map_err(|e| StateError::Storage(e.to_string()))
    }

    async fn remove(&self, key: &str) -> StateResult<()> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StateError::Storage(e.to_string())),
        }
    }
}

/// In-memory store for tests
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl LocalStore for MemoryStore {
    async fn get(&self, key: &str) -> StateResult<Option<String>> {
        Ok(self.entries().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> StateResult<()> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> StateResult<()> {
        self.entries().remove(key);
        Ok(())
    }
}
