//! Catalog endpoints: products, categories, combos, reviews
//!
//! Product create/update/delete cover the admin surface; everything else is
//! read-only browsing.

use super::StoreClient;
use crate::{ClientResult, HttpClient};
use shared::models::{Category, Combo, Product, ProductCreate, ProductUpdate, Review, ReviewCreate};
use shared::response::ApiResponse;

impl StoreClient {
    /// List a page of products
    pub async fn list_products(&self, page: u32, limit: u32) -> ClientResult<Vec<Product>> {
        self.http()
            .get_list(&format!("products?page={}&limit={}", page, limit))
            .await
    }

    /// Fetch one product's detail
    pub async fn product(&self, product_id: i64) -> ClientResult<Product> {
        self.http()
            .get_data(&format!("products/{}", product_id), "product")
            .await
    }

    /// List the category taxonomy
    pub async fn categories(&self) -> ClientResult<Vec<Category>> {
        self.http().get_list("categories").await
    }

    /// List combo bundles
    pub async fn combos(&self) -> ClientResult<Vec<Combo>> {
        self.http().get_list("combos").await
    }

    /// List reviews for a product
    pub async fn reviews(&self, product_id: i64) -> ClientResult<Vec<Review>> {
        self.http()
            .get_list(&format!("products/{}/reviews", product_id))
            .await
    }

    /// Post a review for a product
    pub async fn create_review(&self, create: &ReviewCreate) -> ClientResult<Review> {
        let envelope: ApiResponse<Review> = self
            .http()
            .post(&format!("products/{}/reviews", create.product_id), create)
            .await?;
        HttpClient::unwrap_data(envelope, "review")
    }

    // ========== Admin product management ==========

    /// Create a product
    pub async fn create_product(&self, create: &ProductCreate) -> ClientResult<Product> {
        let envelope: ApiResponse<Product> = self.http().post("products", create).await?;
        HttpClient::unwrap_data(envelope, "product")
    }

    /// Update a product
    pub async fn update_product(
        &self,
        product_id: i64,
        update: &ProductUpdate,
    ) -> ClientResult<Product> {
        let envelope: ApiResponse<Product> = self
            .http()
            .put(&format!("products/{}", product_id), update)
            .await?;
        HttpClient::unwrap_data(envelope, "product")
    }

    /// Delete a product
    pub async fn delete_product(&self, product_id: i64) -> ClientResult<()> {
        let envelope: ApiResponse<serde_json::Value> = self
            .http()
            .delete(&format!("products/{}", product_id))
            .await?;
        HttpClient::unwrap_empty(envelope)
    }
}
