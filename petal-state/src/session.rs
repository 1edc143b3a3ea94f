//! Session identity derived from the stored bearer token
//!
//! The token's middle segment is decoded as base64url JSON and the integer
//! `id` claim becomes the session identity. There is no signature
//! verification: the identity only partitions local cache keys, never
//! authorizes anything (the backend authorizes every request itself).
//! Any decode failure is fail-closed and treated like "no token".
//!
//! Identity changes are pushed on a watch channel by login/logout/refresh;
//! containers subscribe instead of polling.

use std::sync::Arc;
use tokio::sync::watch;

use crate::storage::{AUTH_TOKEN_KEY, LocalStore, USER_ID_KEY};
use crate::{StateError, StateResult};

/// Claims extracted from the token payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenClaims {
    /// Integer user id claim
    pub id: Option<i64>,
    /// Expiry as Unix seconds
    pub exp: Option<u64>,
}

/// Decode the payload segment of a 3-part dot-separated bearer token.
///
/// Accepts both padded and unpadded base64url. Returns `None` for any
/// malformed shape: wrong segment count, bad base64, or non-JSON payload.
pub fn decode_claims(token: &str) -> Option<TokenClaims> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return None;
    }

    use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
    let payload_bytes = URL_SAFE_NO_PAD.decode(parts[1].trim_end_matches('=')).ok()?;
    let payload: serde_json::Value = serde_json::from_slice(&payload_bytes).ok()?;

    Some(TokenClaims {
        id: payload.get("id").and_then(|v| v.as_i64()),
        exp: payload.get("exp").and_then(|v| v.as_u64()),
    })
}

/// Resolve the session identity claimed by a token, if any
pub fn identity_from_token(token: &str) -> Option<String> {
    decode_claims(token)?.id.map(|id| id.to_string())
}

fn now_secs() -> u64 {
    (shared::util::now_millis() / 1000).max(0) as u64
}

/// Owns the stored token and publishes identity changes.
///
/// `login`/`logout` mutate storage and push the derived identity into the
/// watch channel; `refresh` re-derives on demand (container mount). The
/// channel only fires on an actual identity change.
pub struct SessionTracker {
    store: Arc<dyn LocalStore>,
    tx: watch::Sender<Option<String>>,
}

impl SessionTracker {
    pub fn new(store: Arc<dyn LocalStore>) -> Self {
        let (tx, _) = watch::channel(None);
        Self { store, tx }
    }

    /// Subscribe to identity changes
    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.tx.subscribe()
    }

    /// Currently published identity
    pub fn current_user_id(&self) -> Option<String> {
        self.tx.borrow().clone()
    }

    fn publish(&self, identity: Option<String>) {
        self.tx.send_if_modified(|current| {
            if *current != identity {
                tracing::debug!(identity = ?identity, "Session identity changed");
                *current = identity;
                true
            } else {
                false
            }
        });
    }

    /// Re-derive identity from the stored token and publish it.
    ///
    /// A missing or malformed token publishes `None`, which clears
    /// dependent container state downstream.
    pub async fn refresh(&self) -> Option<String> {
        let identity = match self.store.get(AUTH_TOKEN_KEY).await {
            Ok(Some(token)) => identity_from_token(&token),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read stored token");
                None
            }
        };
        self.publish(identity.clone());
        identity
    }

    /// Store a new token and publish the identity it claims
    pub async fn login(&self, token: &str) -> StateResult<Option<String>> {
        self.store.set(AUTH_TOKEN_KEY, token).await?;

        let identity = identity_from_token(token);
        if let Some(uid) = &identity {
            if let Err(e) = self.store.set(USER_ID_KEY, uid).await {
                tracing::warn!(error = %e, "Failed to mirror user id");
            }
        }
        self.publish(identity.clone());
        Ok(identity)
    }

    /// Remove the stored token and publish "no identity"
    pub async fn logout(&self) {
        for key in [AUTH_TOKEN_KEY, USER_ID_KEY] {
            if let Err(e) = self.store.remove(key).await {
                tracing::warn!(key = %key, error = %e, "Failed to remove session key");
            }
        }
        self.publish(None);
    }

    /// Strict pre-check for write paths (wishlist add).
    ///
    /// Stricter than general resolution: the token must decode, must carry
    /// an `exp` claim, and must not be expired. Detecting an expired or
    /// malformed token deletes it from storage and publishes `None` before
    /// the error is returned, so no remote call is attempted with it.
    pub async fn require_fresh_identity(&self) -> StateResult<String> {
        let token = self
            .store
            .get(AUTH_TOKEN_KEY)
            .await?
            .ok_or(StateError::AuthenticationRequired)?;

        let claims = match decode_claims(&token) {
            Some(c) => c,
            None => {
                self.discard_token().await;
                return Err(StateError::InvalidTokenFormat);
            }
        };

        let exp = match claims.exp {
            Some(exp) => exp,
            None => {
                self.discard_token().await;
                return Err(StateError::InvalidTokenFormat);
            }
        };

        if now_secs() >= exp {
            tracing::info!("Stored token expired, discarding");
            self.discard_token().await;
            return Err(StateError::TokenExpired);
        }

        match claims.id {
            Some(id) => Ok(id.to_string()),
            None => {
                self.discard_token().await;
                Err(StateError::InvalidTokenFormat)
            }
        }
    }

    async fn discard_token(&self) {
        if let Err(e) = self.store.remove(AUTH_TOKEN_KEY).await {
            tracing::warn!(error = %e, "Failed to discard token");
        }
        self.publish(None);
    }
}
