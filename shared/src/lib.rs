//! Shared types for the Petal storefront
//!
//! Common types used across the client and state crates: data models,
//! API response envelopes, and utility helpers.

pub mod models;
pub mod response;
pub mod util;

// Re-exports
pub use response::{ApiResponse, ListPayload};
pub use serde::{Deserialize, Serialize};
