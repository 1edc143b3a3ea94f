//! Remote store seam consumed by the state containers
//!
//! A trait so tests can substitute a mock backend; the production
//! implementation delegates to [`petal_client::StoreClient`].

use async_trait::async_trait;
use petal_client::{ClientResult, StoreClient};
use shared::models::{CartLineCreate, Category, Product, RemoteCartLine, RemoteWishlistEntry};

/// Backend operations the containers depend on
#[async_trait]
pub trait RemoteStore: Send + Sync {
    async fn list_cart(&self) -> ClientResult<Vec<RemoteCartLine>>;
    async fn create_cart_line(&self, create: &CartLineCreate) -> ClientResult<RemoteCartLine>;
    async fn update_cart_line(&self, line_id: i64, quantity: u32) -> ClientResult<()>;
    async fn delete_cart_line(&self, line_id: i64) -> ClientResult<()>;
    async fn clear_cart(&self) -> ClientResult<()>;

    async fn list_wishlist(&self) -> ClientResult<Vec<RemoteWishlistEntry>>;
    async fn add_to_wishlist(&self, product_id: i64) -> ClientResult<()>;
    async fn remove_from_wishlist(&self, product_id: i64) -> ClientResult<()>;

    async fn product(&self, product_id: i64) -> ClientResult<Product>;
    async fn categories(&self) -> ClientResult<Vec<Category>>;
}

#[async_trait]
impl RemoteStore for StoreClient {
    async fn list_cart(&self) -> ClientResult<Vec<RemoteCartLine>> {
        StoreClient::list_cart(self).await
    }

    async fn create_cart_line(&self, create: &CartLineCreate) -> ClientResult<RemoteCartLine> {
        StoreClient::create_cart_line(self, create).await
    }

    async fn update_cart_line(&self, line_id: i64, quantity: u32) -> ClientResult<()> {
        StoreClient::update_cart_line(self, line_id, quantity).await
    }

    async fn delete_cart_line(&self, line_id: i64) -> ClientResult<()> {
        StoreClient::delete_cart_line(self, line_id).await
    }

    async fn clear_cart(&self) -> ClientResult<()> {
        StoreClient::clear_cart(self).await
    }

    async fn list_wishlist(&self) -> ClientResult<Vec<RemoteWishlistEntry>> {
        StoreClient::list_wishlist(self).await
    }

    async fn add_to_wishlist(&self, product_id: i64) -> ClientResult<()> {
        StoreClient::add_to_wishlist(self, product_id).await
    }

    async fn remove_from_wishlist(&self, product_id: i64) -> ClientResult<()> {
        StoreClient::remove_from_wishlist(self, product_id).await
    }

    async fn product(&self, product_id: i64) -> ClientResult<Product> {
        StoreClient::product(self, product_id).await
    }

    async fn categories(&self) -> ClientResult<Vec<Category>> {
        StoreClient::categories(self).await
    }
}
