//! Data models
//!
//! Shared between the HTTP client and the state containers.
//! All IDs are `i64`; prices are `rust_decimal::Decimal` serialized as float.

pub mod cart;
pub mod category;
pub mod combo;
pub mod product;
pub mod review;
pub mod wishlist;

// Re-exports
pub use cart::*;
pub use category::*;
pub use combo::*;
pub use product::*;
pub use review::*;
pub use wishlist::*;
