//! Product Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Product entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    /// Category name the product is listed under
    pub category: String,
    /// Image reference (URL or content hash)
    pub image: String,
    pub stock_quantity: i32,
    /// Discount in percentage (e.g. 10 = 10% off)
    #[serde(default)]
    pub offer_percentage: Decimal,
    /// Display-only marketing copy, denormalized onto cart lines at add-time
    #[serde(default)]
    pub benefits: Vec<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    /// Available variant/size selections
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl Product {
    /// Unit price after the product's own offer is applied
    pub fn discounted_price(&self) -> Decimal {
        self.price * (Decimal::ONE_HUNDRED - self.offer_percentage) / Decimal::ONE_HUNDRED
    }
}

/// Create product payload (admin surface)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub category: String,
    pub image: Option<String>,
    pub stock_quantity: Option<i32>,
    pub offer_percentage: Option<Decimal>,
    pub benefits: Option<Vec<String>>,
    pub ingredients: Option<Vec<String>>,
    pub sizes: Option<Vec<String>>,
}

/// Update product payload (admin surface)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub category: Option<String>,
    pub image: Option<String>,
    pub stock_quantity: Option<i32>,
    pub offer_percentage: Option<Decimal>,
    pub benefits: Option<Vec<String>>,
    pub ingredients: Option<Vec<String>>,
    pub sizes: Option<Vec<String>>,
    pub is_active: Option<bool>,
}
