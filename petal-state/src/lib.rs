//! Petal State - client-side state engine for the storefront
//!
//! Stateful containers mirroring backend state for one session: cart,
//! wishlist, category cache, and search history, driven by a session
//! identity feed derived from the locally stored bearer token.
//!
//! Mutations are remote-first: the backend call's outcome strictly gates
//! the local state change. Local persistent storage is a best-effort mirror
//! partitioned per user id.

pub mod cart;
pub mod categories;
pub mod error;
pub mod events;
pub mod remote;
pub mod search;
pub mod session;
pub mod storage;
pub mod wishlist;

pub use cart::CartState;
pub use categories::{CategoryCache, CategorySnapshot};
pub use error::{StateError, StateResult};
pub use events::{Notice, NoticeLevel, StateEvent, StateEvents};
pub use remote::RemoteStore;
pub use search::SearchHistory;
pub use session::{SessionTracker, TokenClaims, identity_from_token};
pub use storage::{FileStore, LocalStore, MemoryStore};
pub use wishlist::WishlistState;
