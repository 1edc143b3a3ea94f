// Shared test fixtures: an in-memory mock backend and token helpers

use async_trait::async_trait;
use petal_client::{ClientError, ClientResult};
use petal_state::RemoteStore;
use rust_decimal::Decimal;
use shared::models::{
    CartLineCreate, Category, Product, RemoteCartLine, RemoteWishlistEntry,
};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use tokio::sync::Notify;

/// Holds one list fetch open mid-flight so tests can interleave a second
/// operation: the fetch signals `started` once its rows are captured and
/// parks until `release` fires.
pub struct FetchGate {
    pub started: Notify,
    pub release: Notify,
}

impl FetchGate {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            started: Notify::new(),
            release: Notify::new(),
        })
    }
}

/// Mock backend with switchable failure mode and call counters
#[derive(Default)]
pub struct MockRemote {
    pub products: Mutex<HashMap<i64, Product>>,
    pub cart: Mutex<Vec<RemoteCartLine>>,
    pub wishlist: Mutex<Vec<RemoteWishlistEntry>>,
    pub categories: Mutex<Vec<Category>>,
    /// When set, every call fails with an internal error
    pub fail: AtomicBool,
    /// Product ids the backend claims are already wishlisted
    pub duplicate_wishlist_ids: Mutex<HashSet<i64>>,
    pub next_line_id: AtomicI64,
    pub category_fetches: AtomicUsize,
    pub wishlist_add_calls: AtomicUsize,
    /// `(line_id, quantity)` pairs sent to the update endpoint
    pub quantity_updates: Mutex<Vec<(i64, u32)>>,
    /// When set, the next list fetch parks on this gate after capturing rows
    pub list_gate: Mutex<Option<Arc<FetchGate>>>,
}

impl MockRemote {
    pub fn new() -> Self {
        Self {
            next_line_id: AtomicI64::new(100),
            ..Self::default()
        }
    }

    pub fn with_product(self, product: Product) -> Self {
        self.products.lock().unwrap().insert(product.id, product);
        self
    }

    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    fn check(&self) -> ClientResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            Err(ClientError::Internal("mock failure".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl RemoteStore for MockRemote {
    async fn list_cart(&self) -> ClientResult<Vec<RemoteCartLine>> {
        self.check()?;
        let rows = self.cart.lock().unwrap().clone();
        let gate = self.list_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            gate.started.notify_one();
            gate.release.notified().await;
        }
        Ok(rows)
    }

    async fn create_cart_line(&self, create: &CartLineCreate) -> ClientResult<RemoteCartLine> {
        self.check()?;
        let line = RemoteCartLine {
            id: self.next_line_id.fetch_add(1, Ordering::SeqCst),
            product_id: create.product_id,
            quantity: create.quantity,
            variant: create.variant.clone(),
        };
        self.cart.lock().unwrap().push(line.clone());
        Ok(line)
    }

    async fn update_cart_line(&self, line_id: i64, quantity: u32) -> ClientResult<()> {
        self.check()?;
        self.quantity_updates.lock().unwrap().push((line_id, quantity));
        if let Some(line) = self.cart.lock().unwrap().iter_mut().find(|l| l.id == line_id) {
            line.quantity = quantity;
        }
        Ok(())
    }

    async fn delete_cart_line(&self, line_id: i64) -> ClientResult<()> {
        self.check()?;
        self.cart.lock().unwrap().retain(|l| l.id != line_id);
        Ok(())
    }

    async fn clear_cart(&self) -> ClientResult<()> {
        self.check()?;
        self.cart.lock().unwrap().clear();
        Ok(())
    }

    async fn list_wishlist(&self) -> ClientResult<Vec<RemoteWishlistEntry>> {
        self.check()?;
        let rows = self.wishlist.lock().unwrap().clone();
        let gate = self.list_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            gate.started.notify_one();
            gate.release.notified().await;
        }
        Ok(rows)
    }

    async fn add_to_wishlist(&self, product_id: i64) -> ClientResult<()> {
        self.check()?;
        self.wishlist_add_calls.fetch_add(1, Ordering::SeqCst);
        if self.duplicate_wishlist_ids.lock().unwrap().contains(&product_id) {
            return Err(ClientError::Remote("Item already in wishlist".to_string()));
        }
        self.wishlist
            .lock()
            .unwrap()
            .push(RemoteWishlistEntry { product_id });
        Ok(())
    }

    async fn remove_from_wishlist(&self, product_id: i64) -> ClientResult<()> {
        self.check()?;
        self.wishlist
            .lock()
            .unwrap()
            .retain(|e| e.product_id != product_id);
        Ok(())
    }

    async fn product(&self, product_id: i64) -> ClientResult<Product> {
        self.check()?;
        self.products
            .lock()
            .unwrap()
            .get(&product_id)
            .cloned()
            .ok_or_else(|| ClientError::NotFound(format!("product {}", product_id)))
    }

    async fn categories(&self) -> ClientResult<Vec<Category>> {
        self.check()?;
        self.category_fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.categories.lock().unwrap().clone())
    }
}

pub fn product(id: i64, price: i64, offer: i64) -> Product {
    Product {
        id,
        name: format!("Product {}", id),
        description: String::new(),
        price: Decimal::from(price),
        category: "Skincare".to_string(),
        image: format!("img-{}", id),
        stock_quantity: 10,
        offer_percentage: Decimal::from(offer),
        benefits: vec![],
        ingredients: vec![],
        sizes: vec![],
        is_active: true,
    }
}

pub fn category(id: i64, name: &str, parent_id: Option<i64>) -> Category {
    Category {
        id,
        name: name.to_string(),
        description: String::new(),
        image: String::new(),
        parent_id,
        product_count: 0,
    }
}

/// Build a 3-segment token whose payload is the given claims object
pub fn token_with_payload(payload: serde_json::Value) -> String {
    use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
    format!("hdr.{}.sig", URL_SAFE_NO_PAD.encode(payload.to_string()))
}
