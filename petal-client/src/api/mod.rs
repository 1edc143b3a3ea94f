//! Typed endpoint groups over [`HttpClient`]
//!
//! Split by backend resource: catalog (products, categories, combos,
//! reviews), cart, and wishlist.

mod cart;
mod catalog;
mod wishlist;

use crate::{ClientConfig, HttpClient};

/// Typed storefront API client
#[derive(Debug)]
pub struct StoreClient {
    http: HttpClient,
}

impl StoreClient {
    /// Create a client from configuration
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            http: HttpClient::new(config),
        }
    }

    /// Create a client for a base URL with default configuration
    pub fn for_base_url(base_url: impl Into<String>) -> Self {
        Self::new(&ClientConfig::new(base_url))
    }

    /// Replace the bearer token used for subsequent requests
    pub fn set_token(&self, token: Option<String>) {
        self.http.set_token(token);
    }

    /// Access the underlying HTTP client
    pub fn http(&self) -> &HttpClient {
        &self.http
    }
}
