//! Wishlist state container
//!
//! Same session-keyed lifecycle as the cart, with simpler entries: no
//! quantity, no variant, and the backend keys deletion by product id.
//! Adds run a stricter token pre-check than general identity resolution
//! and treat the backend's duplicate signal as a successful no-op.

use shared::models::{Product, WishlistLine};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{Mutex, RwLock, watch};

use crate::events::{Notice, StateEvent, StateEvents};
use crate::remote::RemoteStore;
use crate::session::SessionTracker;
use crate::storage::{LocalStore, wishlist_key};
use crate::{StateError, StateResult};

pub struct WishlistState {
    remote: Arc<dyn RemoteStore>,
    store: Arc<dyn LocalStore>,
    session: Arc<SessionTracker>,
    events: StateEvents,
    user_id: RwLock<Option<String>>,
    items: RwLock<Vec<WishlistLine>>,
    mutation: Mutex<()>,
    generation: AtomicU64,
}

impl WishlistState {
    pub fn new(
        remote: Arc<dyn RemoteStore>,
        store: Arc<dyn LocalStore>,
        session: Arc<SessionTracker>,
        events: StateEvents,
    ) -> Self {
        Self {
            remote,
            store,
            session,
            events,
            user_id: RwLock::new(None),
            items: RwLock::new(Vec::new()),
            mutation: Mutex::new(()),
            generation: AtomicU64::new(0),
        }
    }

    /// Follow a session identity feed, reloading or clearing on change
    pub fn spawn_session_listener(
        self: &Arc<Self>,
        mut rx: watch::Receiver<Option<String>>,
    ) -> tokio::task::JoinHandle<()> {
        let state = Arc::clone(self);
        tokio::spawn(async move {
            loop {
                let identity = rx.borrow_and_update().clone();
                state.set_identity(identity).await;
                if rx.changed().await.is_err() {
                    break;
                }
            }
        })
    }

    /// Switch the container to a new identity
    pub async fn set_identity(&self, user_id: Option<String>) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let previous = {
            let mut current = self.user_id.write().await;
            std::mem::replace(&mut *current, user_id.clone())
        };

        match user_id {
            None => {
                self.items.write().await.clear();
                if let Some(prev) = previous {
                    if let Err(e) = self.store.remove(&wishlist_key(&prev)).await {
                        tracing::warn!(user_id = %prev, error = %e, "Failed to drop wishlist mirror");
                    }
                }
                self.events.emit(StateEvent::WishlistUpdated);
            }
            Some(uid) => {
                if previous.as_deref() != Some(uid.as_str()) {
                    self.items.write().await.clear();
                }
                self.reload(generation, uid).await;
            }
        }
    }

    async fn reload(&self, generation: u64, user_id: String) {
        let assembled = match self.fetch_items().await {
            Ok(items) => items,
            Err(e) => {
                tracing::error!(user_id = %user_id, error = %e, "Wishlist load failed");
                Vec::new()
            }
        };

        {
            let mut items = self.items.write().await;
            if self.generation.load(Ordering::SeqCst) != generation {
                tracing::debug!(generation, "Discarding stale wishlist reload");
                return;
            }
            *items = assembled;
        }
        self.persist(&user_id).await;
        self.events.emit(StateEvent::WishlistUpdated);
    }

    async fn fetch_items(&self) -> StateResult<Vec<WishlistLine>> {
        let rows = self.remote.list_wishlist().await?;
        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            let product = self.remote.product(row.product_id).await?;
            items.push(WishlistLine::from_product(&product));
        }
        Ok(items)
    }

    /// Add a product to the wishlist.
    ///
    /// Runs the strict token pre-check (decode, require `exp`, reject
    /// expired) before any remote call. Duplicate adds are silent no-ops,
    /// whether detected locally or via the backend's conflict signal.
    pub async fn add_to_wishlist(&self, product: &Product) -> StateResult<()> {
        let user_id = self.require_identity().await?;
        self.session.require_fresh_identity().await?;

        let _guard = self.mutation.lock().await;

        if self.contains(product.id).await {
            return Ok(());
        }

        match self.remote.add_to_wishlist(product.id).await {
            Ok(()) => {}
            Err(e) if e.is_already_in_wishlist() => {
                tracing::debug!(product_id = product.id, "Already in wishlist, no-op");
                return Ok(());
            }
            Err(e) => {
                let err: StateError = e.into();
                self.events.notify(Notice::error("Wishlist", err.to_string()));
                return Err(err);
            }
        }

        // Defensive double-check before appending
        {
            let mut items = self.items.write().await;
            if !items.iter().any(|i| i.product_id == product.id) {
                items.push(WishlistLine::from_product(product));
            }
        }
        self.persist(&user_id).await;
        self.events.emit(StateEvent::WishlistUpdated);
        self.events.notify(Notice::success(
            "Wishlist",
            format!("{} added to wishlist", product.name),
        ));
        Ok(())
    }

    /// Remove a product; the backend keys the row by product id
    pub async fn remove_from_wishlist(&self, product_id: i64) -> StateResult<()> {
        let user_id = self.require_identity().await?;
        let _guard = self.mutation.lock().await;

        self.remote.remove_from_wishlist(product_id).await?;

        self.items
            .write()
            .await
            .retain(|i| i.product_id != product_id);
        self.persist(&user_id).await;
        self.events.emit(StateEvent::WishlistUpdated);
        Ok(())
    }

    /// Pure local membership check; never triggers a fetch
    pub async fn is_in_wishlist(&self, product_id: i64) -> bool {
        self.contains(product_id).await
    }

    async fn contains(&self, product_id: i64) -> bool {
        self.items
            .read()
            .await
            .iter()
            .any(|i| i.product_id == product_id)
    }

    /// Issue per-item remote deletes; local state and mirror always end
    /// empty regardless of how many deletes failed
    pub async fn clear_wishlist(&self) {
        let _guard = self.mutation.lock().await;

        let snapshot = self.items.read().await.clone();
        for item in &snapshot {
            if let Err(e) = self.remote.remove_from_wishlist(item.product_id).await {
                tracing::warn!(product_id = item.product_id, error = %e, "Wishlist delete failed");
            }
        }

        self.items.write().await.clear();
        if let Some(uid) = self.user_id.read().await.clone() {
            if let Err(e) = self.store.remove(&wishlist_key(&uid)).await {
                tracing::warn!(user_id = %uid, error = %e, "Failed to drop wishlist mirror");
            }
        }
        self.events.emit(StateEvent::WishlistUpdated);
    }

    /// Snapshot of the current entries
    pub async fn items(&self) -> Vec<WishlistLine> {
        self.items.read().await.clone()
    }

    pub async fn count(&self) -> usize {
        self.items.read().await.len()
    }

    async fn require_identity(&self) -> StateResult<String> {
        self.user_id
            .read()
            .await
            .clone()
            .ok_or(StateError::AuthenticationRequired)
    }

    async fn persist(&self, user_id: &str) {
        let snapshot = self.items.read().await.clone();
        match serde_json::to_string(&snapshot) {
            Ok(json) => {
                if let Err(e) = self.store.set(&wishlist_key(user_id), &json).await {
                    tracing::warn!(user_id = %user_id, error = %e, "Failed to mirror wishlist");
                }
            }
            Err(e) => tracing::warn!(error = %e, "Failed to serialize wishlist"),
        }
    }
}
