//! Cart endpoints

use super::StoreClient;
use crate::{ClientResult, HttpClient};
use shared::models::{CartLineCreate, CartLineUpdate, RemoteCartLine};
use shared::response::ApiResponse;

impl StoreClient {
    /// List the current user's cart rows
    pub async fn list_cart(&self) -> ClientResult<Vec<RemoteCartLine>> {
        self.http().get_list("cart").await
    }

    /// Create a cart row; the backend assigns the row id.
    ///
    /// The response must carry a numeric row id; anything else is an
    /// `InvalidResponse`, not a transport error.
    pub async fn create_cart_line(&self, create: &CartLineCreate) -> ClientResult<RemoteCartLine> {
        let envelope: ApiResponse<serde_json::Value> = self.http().post("cart", create).await?;
        let value = HttpClient::unwrap_data(envelope, "cart line")?;
        serde_json::from_value(value)
            .map_err(|_| crate::ClientError::InvalidResponse("Missing numeric cart line id".to_string()))
    }

    /// Update the quantity of a cart row
    pub async fn update_cart_line(&self, line_id: i64, quantity: u32) -> ClientResult<()> {
        let envelope: ApiResponse<serde_json::Value> = self
            .http()
            .put(&format!("cart/{}", line_id), &CartLineUpdate { quantity })
            .await?;
        HttpClient::unwrap_empty(envelope)
    }

    /// Delete a cart row
    pub async fn delete_cart_line(&self, line_id: i64) -> ClientResult<()> {
        let envelope: ApiResponse<serde_json::Value> =
            self.http().delete(&format!("cart/{}", line_id)).await?;
        HttpClient::unwrap_empty(envelope)
    }

    /// Bulk-clear the current user's cart
    pub async fn clear_cart(&self) -> ClientResult<()> {
        let envelope: ApiResponse<serde_json::Value> = self.http().post_empty("cart/clear").await?;
        HttpClient::unwrap_empty(envelope)
    }
}
