//! Category taxonomy cache
//!
//! Time-boxed snapshot of the category tree with derived views computed
//! once per install and shared via `Arc`. Refresh policy:
//! - fresh snapshot (within the window): no I/O
//! - remote success, non-empty: replace, persist, clear error state
//! - remote success, empty: fall back to the stored snapshot, then the
//!   stale in-memory one (even expired)
//! - remote failure: keep serving the stale in-memory snapshot

use serde::{Deserialize, Serialize};
use shared::models::Category;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::remote::RemoteStore;
use crate::storage::{CATEGORIES_KEY, LocalStore};
use crate::{StateError, StateResult};

/// Default freshness window
pub const CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// Persisted cache entry
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredCategories {
    categories: Vec<Category>,
    fetched_at_ms: i64,
}

/// One immutable snapshot of the taxonomy with precomputed views
#[derive(Debug)]
pub struct CategorySnapshot {
    categories: Vec<Category>,
    fetched_at_ms: i64,
    main: Vec<Category>,
    by_parent: HashMap<i64, Vec<Category>>,
    by_id: HashMap<i64, Category>,
}

impl CategorySnapshot {
    fn build(categories: Vec<Category>, fetched_at_ms: i64) -> Arc<Self> {
        let main = categories.iter().filter(|c| c.is_main()).cloned().collect();

        let mut by_parent: HashMap<i64, Vec<Category>> = HashMap::new();
        let mut by_id = HashMap::with_capacity(categories.len());
        for category in &categories {
            if let Some(parent) = category.parent_id {
                by_parent.entry(parent).or_default().push(category.clone());
            }
            by_id.insert(category.id, category.clone());
        }

        Arc::new(Self {
            categories,
            fetched_at_ms,
            main,
            by_parent,
            by_id,
        })
    }

    /// All categories in backend order
    pub fn all(&self) -> &[Category] {
        &self.categories
    }

    /// When this snapshot was fetched, epoch millis
    pub fn fetched_at_ms(&self) -> i64 {
        self.fetched_at_ms
    }

    /// Categories with no parent
    pub fn main_categories(&self) -> &[Category] {
        &self.main
    }

    /// Subcategories of one parent
    pub fn subcategories(&self, parent_id: i64) -> &[Category] {
        self.by_parent
            .get(&parent_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn category_by_id(&self, id: i64) -> Option<&Category> {
        self.by_id.get(&id)
    }
}

pub struct CategoryCache {
    remote: Arc<dyn RemoteStore>,
    store: Arc<dyn LocalStore>,
    ttl: Duration,
    snapshot: RwLock<Option<Arc<CategorySnapshot>>>,
}

impl CategoryCache {
    pub fn new(remote: Arc<dyn RemoteStore>, store: Arc<dyn LocalStore>) -> Self {
        Self::with_ttl(remote, store, CACHE_TTL)
    }

    /// Cache with a custom freshness window
    pub fn with_ttl(remote: Arc<dyn RemoteStore>, store: Arc<dyn LocalStore>, ttl: Duration) -> Self {
        Self {
            remote,
            store,
            ttl,
            snapshot: RwLock::new(None),
        }
    }

    /// Get the taxonomy, fetching only when the snapshot is stale
    pub async fn get(&self) -> StateResult<Arc<CategorySnapshot>> {
        let now = shared::util::now_millis();

        if let Some(snapshot) = self.snapshot.read().await.as_ref() {
            if now - snapshot.fetched_at_ms() < self.ttl.as_millis() as i64 {
                return Ok(Arc::clone(snapshot));
            }
        }

        match self.remote.categories().await {
            Ok(categories) if !categories.is_empty() => {
                let snapshot = CategorySnapshot::build(categories.clone(), now);
                *self.snapshot.write().await = Some(Arc::clone(&snapshot));
                self.persist(&categories, now).await;
                Ok(snapshot)
            }
            Ok(_empty) => self.stored_fallback().await,
            Err(e) => {
                // Stale-while-error: never clear a populated in-memory cache
                if let Some(stale) = self.snapshot.read().await.as_ref() {
                    tracing::warn!(error = %e, "Category fetch failed, serving stale snapshot");
                    return Ok(Arc::clone(stale));
                }
                Err(e.into())
            }
        }
    }

    /// Empty remote result: any cached snapshot, stored or in-memory,
    /// beats declaring failure
    async fn stored_fallback(&self) -> StateResult<Arc<CategorySnapshot>> {
        let stored = self
            .store
            .get(CATEGORIES_KEY)
            .await
            .ok()
            .flatten()
            .and_then(|json| serde_json::from_str::<StoredCategories>(&json).ok());

        match stored {
            Some(entry) if !entry.categories.is_empty() => {
                tracing::warn!("Empty category response, falling back to stored snapshot");
                let snapshot = CategorySnapshot::build(entry.categories, entry.fetched_at_ms);
                *self.snapshot.write().await = Some(Arc::clone(&snapshot));
                Ok(snapshot)
            }
            _ => {
                if let Some(stale) = self.snapshot.read().await.as_ref() {
                    tracing::warn!("Empty category response, serving stale in-memory snapshot");
                    return Ok(Arc::clone(stale));
                }
                Err(StateError::NoCategoriesAvailable)
            }
        }
    }

    async fn persist(&self, categories: &[Category], fetched_at_ms: i64) {
        let entry = StoredCategories {
            categories: categories.to_vec(),
            fetched_at_ms,
        };
        match serde_json::to_string(&entry) {
            Ok(json) => {
                if let Err(e) = self.store.set(CATEGORIES_KEY, &json).await {
                    tracing::warn!(error = %e, "Failed to persist category cache");
                }
            }
            Err(e) => tracing::warn!(error = %e, "Failed to serialize category cache"),
        }
    }
}
