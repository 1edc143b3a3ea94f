//! Cart state container
//!
//! Owns the session's cart lines and the client-only checkout selection.
//! Every mutation is remote-first: the backend call's outcome gates the
//! local change, so a failed call leaves the in-memory list untouched.
//! Confirmed state is mirrored best-effort to local storage under
//! `cart_items_<user_id>`.

use rust_decimal::Decimal;
use shared::models::{CartLine, CartLineCreate, Product};
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{Mutex, RwLock, watch};

use crate::StateResult;
use crate::events::{Notice, StateEvent, StateEvents};
use crate::remote::RemoteStore;
use crate::storage::{LocalStore, cart_key};

pub struct CartState {
    remote: Arc<dyn RemoteStore>,
    store: Arc<dyn LocalStore>,
    events: StateEvents,
    user_id: RwLock<Option<String>>,
    lines: RwLock<Vec<CartLine>>,
    /// Product ids marked for checkout; always a subset of current lines
    selected: RwLock<HashSet<i64>>,
    /// Serializes check-then-create sequences so concurrent duplicate adds
    /// cannot both observe "no existing line"
    mutation: Mutex<()>,
    /// Reload epoch; a reload whose epoch is stale by completion does not apply
    generation: AtomicU64,
}

impl CartState {
    pub fn new(
        remote: Arc<dyn RemoteStore>,
        store: Arc<dyn LocalStore>,
        events: StateEvents,
    ) -> Self {
        Self {
            remote,
            store,
            events,
            user_id: RwLock::new(None),
            lines: RwLock::new(Vec::new()),
            selected: RwLock::new(HashSet::new()),
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

    /// Switch the container to a new identity.
    ///
    /// `None` clears lines and the prior user's storage mirror with no
    /// remote call. A concrete id clears any prior user's lines first and
    /// loads that user's cart from the backend.
    pub async fn set_identity(&self, user_id: Option<String>) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let previous = {
            let mut current = self.user_id.write().await;
            std::mem::replace(&mut *current, user_id.clone())
        };

        match user_id {
            None => {
                self.lines.write().await.clear();
                self.selected.write().await.clear();
                if let Some(prev) = previous {
                    if let Err(e) = self.store.remove(&cart_key(&prev)).await {
                        tracing::warn!(user_id = %prev, error = %e, "Failed to drop cart mirror");
                    }
                }
                self.events.emit(StateEvent::CartUpdated);
            }
            Some(uid) => {
                // A user switch must never show the previous user's lines
                if previous.as_deref() != Some(uid.as_str()) {
                    self.lines.write().await.clear();
                    self.selected.write().await.clear();
                }
                self.reload(generation, uid).await;
            }
        }
    }

    async fn reload(&self, generation: u64, user_id: String) {
        // Load fails closed to an empty cart rather than showing data that
        // may belong to a different or stale session
        let assembled = match self.fetch_lines().await {
            Ok(lines) => lines,
            Err(e) => {
                tracing::error!(user_id = %user_id, error = %e, "Cart load failed");
                Vec::new()
            }
        };

        {
            let mut lines = self.lines.write().await;
            if self.generation.load(Ordering::SeqCst) != generation {
                tracing::debug!(generation, "Discarding stale cart reload");
                return;
            }
            *lines = assembled;
        }
        self.sync_selection().await;
        self.persist_current().await;
        self.events.emit(StateEvent::CartUpdated);
    }

    /// List cart rows and rehydrate display fields from product detail
    async fn fetch_lines(&self) -> StateResult<Vec<CartLine>> {
        let rows = self.remote.list_cart().await?;
        let mut lines = Vec::with_capacity(rows.len());
        for row in rows {
            let product = self.remote.product(row.product_id).await?;
            let mut line = CartLine::from_product(&product, row.id, row.variant, None);
            line.quantity = row.quantity.max(1);
            lines.push(line);
        }
        Ok(lines)
    }

    async fn require_identity(&self) -> StateResult<String> {
        self.user_id
            .read()
            .await
            .clone()
            .ok_or(crate::StateError::AuthenticationRequired)
    }

    /// Add a product at one variant selection.
    ///
    /// An existing `(product, variant)` line delegates to a quantity
    /// increment so no duplicate line is ever created. The outcome is
    /// signalled as a notice on the event channel; callers observe the new
    /// line through the container state, not a return value.
    pub async fn add_item(
        &self,
        product: &Product,
        variant: Option<String>,
        combo_price: Option<Decimal>,
    ) -> StateResult<()> {
        let user_id = self.require_identity().await?;
        let _guard = self.mutation.lock().await;

        let exists = self
            .lines
            .read()
            .await
            .iter()
            .any(|l| l.matches(product.id, variant.as_deref()));

        let result = if exists {
            self.apply_quantity(|l| l.matches(product.id, variant.as_deref()), true)
                .await
        } else {
            self.create_line(&user_id, product, variant, combo_price).await
        };

        match &result {
            Ok(()) => self.events.notify(Notice::success(
                "Cart",
                format!("{} added to cart", product.name),
            )),
            Err(e) => self.events.notify(Notice::error("Cart", e.to_string())),
        }
        result
    }

    async fn create_line(
        &self,
        user_id: &str,
        product: &Product,
        variant: Option<String>,
        combo_price: Option<Decimal>,
    ) -> StateResult<()> {
        let created = self
            .remote
            .create_cart_line(&CartLineCreate {
                product_id: product.id,
                quantity: 1,
                variant: variant.clone(),
            })
            .await?;

        let line = CartLine::from_product(product, created.id, variant, combo_price);
        self.lines.write().await.push(line);
        self.persist(user_id).await;
        self.events.emit(StateEvent::CartUpdated);
        Ok(())
    }

    /// Remove a line by product id.
    ///
    /// Missing identity or a line without a remote id is a logged no-op,
    /// never an error to the caller. A backend failure propagates and
    /// leaves the list untouched.
    pub async fn remove_item(&self, product_id: i64) -> StateResult<()> {
        if self.user_id.read().await.is_none() {
            tracing::warn!(product_id, "Remove ignored: no session identity");
            return Ok(());
        }
        let _guard = self.mutation.lock().await;

        let remote_id = {
            let lines = self.lines.read().await;
            lines
                .iter()
                .find(|l| l.product_id == product_id)
                .and_then(|l| l.remote_line_id)
        };
        let Some(remote_id) = remote_id else {
            tracing::warn!(product_id, "Remove ignored: line not found locally");
            return Ok(());
        };

        self.remote.delete_cart_line(remote_id).await?;

        self.lines
            .write()
            .await
            .retain(|l| l.remote_line_id != Some(remote_id));
        self.sync_selection().await;
        self.persist_current().await;
        self.events.emit(StateEvent::CartUpdated);
        Ok(())
    }

    /// Step a line's quantity up or down. Decrement floors at 1 and still
    /// issues the idempotent remote call re-sending quantity 1.
    pub async fn update_quantity(&self, product_id: i64, increment: bool) -> StateResult<()> {
        self.require_identity().await?;
        let _guard = self.mutation.lock().await;
        self.apply_quantity(|l| l.product_id == product_id, increment)
            .await
    }

    async fn apply_quantity<F>(&self, matches: F, increment: bool) -> StateResult<()>
    where
        F: Fn(&CartLine) -> bool,
    {
        let (remote_id, new_quantity) = {
            let lines = self.lines.read().await;
            let Some(line) = lines.iter().find(|l| matches(l)) else {
                tracing::warn!("Quantity update ignored: line not in cart");
                return Ok(());
            };
            let Some(remote_id) = line.remote_line_id else {
                tracing::warn!(product_id = line.product_id, "Line has no remote id yet");
                return Ok(());
            };
            let q = line.quantity;
            let new_quantity = if increment { q + 1 } else { q.saturating_sub(1).max(1) };
            (remote_id, new_quantity)
        };

        self.remote.update_cart_line(remote_id, new_quantity).await?;

        {
            let mut lines = self.lines.write().await;
            if let Some(line) = lines.iter_mut().find(|l| l.remote_line_id == Some(remote_id)) {
                line.quantity = new_quantity;
            }
        }
        self.persist_current().await;
        self.events.emit(StateEvent::CartUpdated);
        Ok(())
    }

    /// Best-effort remote bulk clear; local list and mirror always end empty
    pub async fn clear_cart(&self) {
        let _guard = self.mutation.lock().await;

        if let Err(e) = self.remote.clear_cart().await {
            tracing::warn!(error = %e, "Remote cart clear failed, clearing locally anyway");
        }

        self.lines.write().await.clear();
        self.selected.write().await.clear();
        if let Some(uid) = self.user_id.read().await.clone() {
            if let Err(e) = self.store.remove(&cart_key(&uid)).await {
                tracing::warn!(user_id = %uid, error = %e, "Failed to drop cart mirror");
            }
        }
        self.events.emit(StateEvent::CartUpdated);
    }

    // ========== Selection ==========

    /// Intersect the selection with current line product ids
    async fn sync_selection(&self) {
        let present: HashSet<i64> = self
            .lines
            .read()
            .await
            .iter()
            .map(|l| l.product_id)
            .collect();
        let mut selected = self.selected.write().await;
        if present.is_empty() {
            selected.clear();
        } else {
            selected.retain(|id| present.contains(id));
        }
    }

    /// Toggle a product's checkout selection; unknown products are ignored
    pub async fn toggle_selection(&self, product_id: i64) {
        let present = self
            .lines
            .read()
            .await
            .iter()
            .any(|l| l.product_id == product_id);
        if !present {
            return;
        }
        let mut selected = self.selected.write().await;
        if !selected.remove(&product_id) {
            selected.insert(product_id);
        }
    }

    /// Replace the selection; ids without a matching line are dropped
    pub async fn set_selection(&self, ids: impl IntoIterator<Item = i64>) {
        let present: HashSet<i64> = self
            .lines
            .read()
            .await
            .iter()
            .map(|l| l.product_id)
            .collect();
        let mut selected = self.selected.write().await;
        *selected = ids.into_iter().filter(|id| present.contains(id)).collect();
    }

    // ========== Derived views ==========

    /// Snapshot of the current lines
    pub async fn lines(&self) -> Vec<CartLine> {
        self.lines.read().await.clone()
    }

    /// Snapshot of the selected product ids
    pub async fn selected(&self) -> HashSet<i64> {
        self.selected.read().await.clone()
    }

    /// Lines currently selected for checkout
    pub async fn selected_lines(&self) -> Vec<CartLine> {
        let selected = self.selected.read().await.clone();
        self.lines
            .read()
            .await
            .iter()
            .filter(|l| selected.contains(&l.product_id))
            .cloned()
            .collect()
    }

    /// Sum of quantities across all lines
    pub async fn item_count(&self) -> u32 {
        self.lines.read().await.iter().map(|l| l.quantity).sum()
    }

    /// Raw total (price x quantity, no discounts); not the checkout total
    pub async fn total(&self) -> Decimal {
        self.lines.read().await.iter().map(|l| l.line_total()).sum()
    }

    /// Checkout total over selected lines, combo- and offer-aware
    pub async fn selected_total(&self) -> Decimal {
        let selected = self.selected.read().await.clone();
        self.lines
            .read()
            .await
            .iter()
            .filter(|l| selected.contains(&l.product_id))
            .map(|l| l.effective_price() * Decimal::from(l.quantity))
            .sum()
    }

    // ========== Persistence mirror ==========

    async fn persist(&self, user_id: &str) {
        let snapshot = self.lines.read().await.clone();
        match serde_json::to_string(&snapshot) {
            Ok(json) => {
                if let Err(e) = self.store.set(&cart_key(user_id), &json).await {
                    tracing::warn!(user_id = %user_id, error = %e, "Failed to mirror cart");
                }
            }
            Err(e) => tracing::warn!(error = %e, "Failed to serialize cart"),
        }
    }

    async fn persist_current(&self) {
        if let Some(uid) = self.user_id.read().await.clone() {
            self.persist(&uid).await;
        }
    }
}
