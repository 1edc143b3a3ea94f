//! Category Model

use serde::{Deserialize, Serialize};

/// Category entity
///
/// Categories without a `parent_id` are main categories; the rest are
/// subcategories keyed by their parent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Image reference (URL or content hash)
    #[serde(default)]
    pub image: String,
    pub parent_id: Option<i64>,
    /// Number of products listed under this category
    #[serde(default)]
    pub product_count: i64,
}

impl Category {
    /// Whether this is a top-level category
    pub fn is_main(&self) -> bool {
        self.parent_id.is_none()
    }
}
