//! Combo Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Combo entity - a bundle of products sold at a single price
///
/// Cart lines added from a combo carry the combo unit price, which takes
/// precedence over the product's own offer when computing checkout totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Combo {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    pub combo_price: Decimal,
    /// Products included in the bundle
    #[serde(default)]
    pub product_ids: Vec<i64>,
}
