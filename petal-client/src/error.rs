//! Client error types

use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed at the transport level
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Transport succeeded but the body is not usable
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Authentication required (401)
    #[error("Authentication required")]
    Unauthorized,

    /// Permission denied (403)
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Resource not found (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error (400)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Application-level error reported in the response envelope
    #[error("Remote error: {0}")]
    Remote(String),

    /// Any other backend failure
    #[error("Internal error: {0}")]
    Internal(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// Whether this is the backend's "already in wishlist" conflict signal,
    /// which callers treat as a successful no-op
    pub fn is_already_in_wishlist(&self) -> bool {
        matches!(self, ClientError::Remote(msg) if msg == "Item already in wishlist")
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
