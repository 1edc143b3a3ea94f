//! State engine error types

use petal_client::ClientError;
use thiserror::Error;

/// State engine error type
#[derive(Debug, Error)]
pub enum StateError {
    /// A write was attempted with no resolvable session identity
    #[error("Authentication required")]
    AuthenticationRequired,

    /// The stored token carries an `exp` claim in the past
    #[error("Token expired")]
    TokenExpired,

    /// The stored token is not a decodable 3-segment bearer token
    #[error("Invalid token format")]
    InvalidTokenFormat,

    /// The backend answered but the payload is unusable (e.g. missing id)
    #[error("Invalid server response: {0}")]
    InvalidServerResponse(String),

    /// No category data available remotely or in any cache
    #[error("No categories available")]
    NoCategoriesAvailable,

    /// Backend operation failed; no local state was changed
    #[error("Remote operation failed: {0}")]
    Remote(ClientError),

    /// Local storage failure
    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<ClientError> for StateError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::InvalidResponse(msg) => StateError::InvalidServerResponse(msg),
            ClientError::Unauthorized => StateError::AuthenticationRequired,
            other => StateError::Remote(other),
        }
    }
}

/// Result type for state operations
pub type StateResult<T> = Result<T, StateError>;
