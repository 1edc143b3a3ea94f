//! Wishlist endpoints

use super::StoreClient;
use crate::{ClientResult, HttpClient};
use shared::models::{RemoteWishlistEntry, WishlistAdd};
use shared::response::ApiResponse;

impl StoreClient {
    /// List the current user's wishlist rows
    pub async fn list_wishlist(&self) -> ClientResult<Vec<RemoteWishlistEntry>> {
        self.http().get_list("wishlist").await
    }

    /// Add a product to the wishlist.
    ///
    /// The backend answers duplicates with the "Item already in wishlist"
    /// envelope error; callers check [`ClientError::is_already_in_wishlist`]
    /// and treat it as a no-op.
    ///
    /// [`ClientError::is_already_in_wishlist`]: crate::ClientError::is_already_in_wishlist
    pub async fn add_to_wishlist(&self, product_id: i64) -> ClientResult<()> {
        let envelope: ApiResponse<serde_json::Value> = self
            .http()
            .post("wishlist", &WishlistAdd { product_id })
            .await?;
        HttpClient::unwrap_empty(envelope)
    }

    /// Remove a product from the wishlist, keyed by product id
    pub async fn remove_from_wishlist(&self, product_id: i64) -> ClientResult<()> {
        let envelope: ApiResponse<serde_json::Value> = self
            .http()
            .delete(&format!("wishlist/{}", product_id))
            .await?;
        HttpClient::unwrap_empty(envelope)
    }
}
