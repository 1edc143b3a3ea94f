//! HTTP client for backend API calls

use crate::{ClientConfig, ClientError, ClientResult};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::response::{ApiResponse, ListPayload};
use std::sync::RwLock;

/// HTTP client for making requests to the storefront backend.
///
/// The bearer token can be swapped at runtime (login/logout) without
/// rebuilding the client, so long-lived holders see the current session.
#[derive(Debug)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    token: RwLock<Option<String>>,
}

impl HttpClient {
    /// Create a new HTTP client from configuration
    pub fn new(config: &ClientConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: RwLock::new(config.token.clone()),
        }
    }

    /// Replace the bearer token used for subsequent requests
    pub fn set_token(&self, token: Option<String>) {
        *self.token.write().expect("token lock poisoned") = token;
    }

    /// Get the current token
    pub fn token(&self) -> Option<String> {
        self.token.read().expect("token lock poisoned").clone()
    }

    /// Build authorization header value
    fn auth_header(&self) -> Option<String> {
        self.token().map(|t| format!("Bearer {}", t))
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn send<T: DeserializeOwned>(
        &self,
        mut request: reqwest::RequestBuilder,
    ) -> ClientResult<T> {
        if let Some(auth) = self.auth_header() {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }

        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.send(self.client.get(self.url(path))).await
    }

    /// Make a POST request with JSON body
    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        self.send(self.client.post(self.url(path)).json(body)).await
    }

    /// Make a POST request without body
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.send(self.client.post(self.url(path))).await
    }

    /// Make a PUT request with JSON body
    pub async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        self.send(self.client.put(self.url(path)).json(body)).await
    }

    /// Make a DELETE request
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.send(self.client.delete(self.url(path))).await
    }

    /// Handle the HTTP response
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await?;
            return match status {
                StatusCode::UNAUTHORIZED => Err(ClientError::Unauthorized),
                StatusCode::FORBIDDEN => Err(ClientError::Forbidden(text)),
                StatusCode::NOT_FOUND => Err(ClientError::NotFound(text)),
                StatusCode::BAD_REQUEST => Err(ClientError::Validation(text)),
                _ => Err(ClientError::Internal(text)),
            };
        }

        response.json().await.map_err(Into::into)
    }

    // ========== Envelope helpers ==========

    /// Unwrap an envelope, requiring a data payload
    pub(crate) fn unwrap_data<T>(envelope: ApiResponse<T>, context: &str) -> ClientResult<T> {
        if let Some(err) = envelope.error {
            return Err(ClientError::Remote(err));
        }
        envelope
            .data
            .ok_or_else(|| ClientError::InvalidResponse(format!("Missing {} data", context)))
    }

    /// Unwrap an envelope where no data payload is expected
    pub(crate) fn unwrap_empty(envelope: ApiResponse<serde_json::Value>) -> ClientResult<()> {
        match envelope.error {
            Some(err) => Err(ClientError::Remote(err)),
            None => Ok(()),
        }
    }

    /// GET a list endpoint, collapsing both wire shapes into `Vec<T>`.
    ///
    /// A success envelope with no data at all is treated as an empty list.
    pub async fn get_list<T: DeserializeOwned>(&self, path: &str) -> ClientResult<Vec<T>> {
        let envelope: ApiResponse<ListPayload<T>> = self.get(path).await?;
        if let Some(err) = envelope.error {
            return Err(ClientError::Remote(err));
        }
        Ok(envelope.data.map(ListPayload::into_items).unwrap_or_default())
    }

    /// GET a single resource from its envelope
    pub async fn get_data<T: DeserializeOwned>(&self, path: &str, context: &str) -> ClientResult<T> {
        let envelope: ApiResponse<T> = self.get(path).await?;
        Self::unwrap_data(envelope, context)
    }
}
