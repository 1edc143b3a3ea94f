//! Review Model

use serde::{Deserialize, Serialize};

/// Product review entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: i64,
    pub product_id: i64,
    pub user_id: i64,
    /// Star rating, 1-5
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Create review payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewCreate {
    pub product_id: i64,
    pub rating: u8,
    pub comment: Option<String>,
}
