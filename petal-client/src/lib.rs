//! Petal Client - HTTP client for the storefront backend
//!
//! Thin reqwest wrapper issuing REST calls against the backend, normalizing
//! the response envelope and the two list wire shapes into canonical types.

pub mod api;
pub mod config;
pub mod error;
pub mod http;

pub use api::StoreClient;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::HttpClient;

// Re-export shared types for convenience
pub use shared::response::{ApiResponse, ListPayload};
