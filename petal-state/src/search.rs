//! Recent search history
//!
//! Small bounded list persisted best-effort under a single storage key.
//! Repeated terms move to the front instead of duplicating.

use std::sync::Arc;
use tokio::sync::RwLock;

use crate::storage::{LocalStore, SEARCH_HISTORY_KEY};

/// Maximum retained entries
const MAX_ENTRIES: usize = 10;

pub struct SearchHistory {
    store: Arc<dyn LocalStore>,
    entries: RwLock<Vec<String>>,
}

impl SearchHistory {
    pub fn new(store: Arc<dyn LocalStore>) -> Self {
        Self {
            store,
            entries: RwLock::new(Vec::new()),
        }
    }

    /// Create a history preloaded from storage
    pub async fn load(store: Arc<dyn LocalStore>) -> Self {
        let entries = match store.get(SEARCH_HISTORY_KEY).await {
            Ok(Some(json)) => serde_json::from_str(&json).unwrap_or_default(),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load search history");
                Vec::new()
            }
        };
        Self {
            store,
            entries: RwLock::new(entries),
        }
    }

    /// Record a search term; empty terms are ignored
    pub async fn push(&self, term: &str) {
        let term = term.trim();
        if term.is_empty() {
            return;
        }

        {
            let mut entries = self.entries.write().await;
            entries.retain(|e| e != term);
            entries.insert(0, term.to_string());
            entries.truncate(MAX_ENTRIES);
        }
        self.persist().await;
    }

    /// Most recent first
    pub async fn entries(&self) -> Vec<String> {
        self.entries.read().await.clone()
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
        if let Err(e) = self.store.remove(SEARCH_HISTORY_KEY).await {
            tracing::warn!(error = %e, "Failed to clear search history");
        }
    }

    async fn persist(&self) {
        let snapshot = self.entries.read().await.clone();
        match serde_json::to_string(&snapshot) {
            Ok(json) => {
                if let Err(e) = self.store.set(SEARCH_HISTORY_KEY, &json).await {
                    tracing::warn!(error = %e, "Failed to persist search history");
                }
            }
            Err(e) => tracing::warn!(error = %e, "Failed to serialize search history"),
        }
    }
}
