//! Wishlist line item model and wire DTOs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Product;

/// One wishlist row. No quantity, no variant; at most one entry per product.
/// Remote identity for deletion is the product id itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WishlistLine {
    pub product_id: i64,
    pub name: String,
    pub price: Decimal,
    pub category: String,
    pub image: String,
    #[serde(default)]
    pub offer_percentage: Decimal,
}

impl WishlistLine {
    /// Build a wishlist entry from a product snapshot
    pub fn from_product(product: &Product) -> Self {
        Self {
            product_id: product.id,
            name: product.name.clone(),
            price: product.price,
            category: product.category.clone(),
            image: product.image.clone(),
            offer_percentage: product.offer_percentage,
        }
    }
}

// =============================================================================
// Wishlist API DTOs
// =============================================================================

/// Wishlist row as the backend stores it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteWishlistEntry {
    pub product_id: i64,
}

/// Add to wishlist request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WishlistAdd {
    pub product_id: i64,
}
