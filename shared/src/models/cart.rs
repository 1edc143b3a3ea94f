//! Cart line item model and wire DTOs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Product;

/// One cart row: a product at one variant/size selection.
///
/// Logical key is `(product_id, variant)`; `remote_line_id` is assigned by
/// the backend on creation and is required for update/delete calls.
/// Display fields are denormalized from the product at add-time and are a
/// snapshot: a later product change never rewrites an existing line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: i64,
    /// Backend row id; `None` only before the first successful sync
    pub remote_line_id: Option<i64>,
    pub name: String,
    pub price: Decimal,
    pub category: String,
    pub image: String,
    pub stock_quantity: i32,
    pub offer_percentage: Decimal,
    /// Always >= 1; decrement floors at 1, removal is a separate operation
    pub quantity: u32,
    pub variant: Option<String>,
    #[serde(default)]
    pub benefits: Vec<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub sizes: Vec<String>,
    /// Set when the line was added from a combo bundle
    #[serde(default)]
    pub from_combo: bool,
    /// Combo unit price, takes precedence over the offer discount
    #[serde(default)]
    pub combo_price: Option<Decimal>,
}

impl CartLine {
    /// Build a quantity-1 line from a product snapshot
    pub fn from_product(
        product: &Product,
        remote_line_id: i64,
        variant: Option<String>,
        combo_price: Option<Decimal>,
    ) -> Self {
        Self {
            product_id: product.id,
            remote_line_id: Some(remote_line_id),
            name: product.name.clone(),
            price: product.price,
            category: product.category.clone(),
            image: product.image.clone(),
            stock_quantity: product.stock_quantity,
            offer_percentage: product.offer_percentage,
            quantity: 1,
            variant,
            benefits: product.benefits.clone(),
            ingredients: product.ingredients.clone(),
            sizes: product.sizes.clone(),
            from_combo: combo_price.is_some(),
            combo_price,
        }
    }

    /// Whether this line is the `(product_id, variant)` entry for the pair
    pub fn matches(&self, product_id: i64, variant: Option<&str>) -> bool {
        self.product_id == product_id && self.variant.as_deref() == variant
    }

    /// Unit price after the line's remembered offer
    pub fn discounted_price(&self) -> Decimal {
        self.price * (Decimal::ONE_HUNDRED - self.offer_percentage) / Decimal::ONE_HUNDRED
    }

    /// Unit price used for checkout totals: combo price when combo-sourced,
    /// otherwise the offer-discounted price
    pub fn effective_price(&self) -> Decimal {
        if self.from_combo {
            self.combo_price.unwrap_or_else(|| self.discounted_price())
        } else {
            self.discounted_price()
        }
    }

    /// Raw line total (non-discounted), used only as a generic total
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

// =============================================================================
// Cart API DTOs
// =============================================================================

/// Cart row as the backend stores it (no display fields)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteCartLine {
    pub id: i64,
    pub product_id: i64,
    pub quantity: u32,
    #[serde(default)]
    pub variant: Option<String>,
}

/// Create cart line request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLineCreate {
    pub product_id: i64,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
}

/// Update cart line request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLineUpdate {
    pub quantity: u32,
}
