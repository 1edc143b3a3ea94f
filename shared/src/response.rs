//! API Response types
//!
//! Response envelopes shared between the backend and the client crate.

use serde::{Deserialize, Serialize};

/// Unified API response envelope
///
/// Every backend endpoint answers with this shape:
/// ```json
/// { "data": { ... } }
/// ```
/// or, on application-level failure (even with HTTP 200):
/// ```json
/// { "error": "Item already in wishlist" }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Response payload (present on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Application error message (present on failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response
    pub fn ok(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
        }
    }

    /// Create an error response
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            data: None,
            error: Some(message.into()),
        }
    }
}

/// List payload as the backend actually serves it.
///
/// List endpoints answer with either a bare array or `{"items": [...]}`
/// depending on the endpoint. This type is the single normalization point:
/// everything past the HTTP client sees a plain `Vec<T>`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ListPayload<T> {
    /// `{"items": [...]}` wrapper shape
    Wrapped { items: Vec<T> },
    /// Bare `[...]` shape
    Bare(Vec<T>),
}

impl<T> ListPayload<T> {
    /// Collapse either wire shape into the canonical list
    pub fn into_items(self) -> Vec<T> {
        match self {
            ListPayload::Wrapped { items } => items,
            ListPayload::Bare(items) => items,
        }
    }
}

impl<T> From<ListPayload<T>> for Vec<T> {
    fn from(payload: ListPayload<T>) -> Self {
        payload.into_items()
    }
}
