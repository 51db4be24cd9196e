//! Token persistence

use std::sync::Arc;
use std::sync::PoisonError;
use std::sync::RwLock;

use async_trait::async_trait;

use super::AccessToken;
use super::TokenProvider;
use crate::error::AuthError;

/// Holds the token between login and later requests.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Option<AccessToken>;
    fn save(&self, token: AccessToken);
    fn clear(&self);
}

/// In-process [`TokenStore`] that also serves as the client's [`TokenProvider`].
///
/// Clones share the same slot, so the copy handed to the client sees tokens
/// saved after login.
///
/// ```
/// use docreg_client::auth::{AccessToken, MemoryTokenStore, TokenStore};
///
/// let store = MemoryTokenStore::new();
/// let for_client = store.clone();
/// store.save(AccessToken::new("abc"));
/// assert!(for_client.load().is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    slot: Arc<RwLock<Option<AccessToken>>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<AccessToken> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn save(&self, token: AccessToken) {
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    fn clear(&self) {
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

#[async_trait]
impl TokenProvider for MemoryTokenStore {
    async fn get_token(&self) -> Result<AccessToken, AuthError> {
        let token = self.load().ok_or(AuthError::MissingToken)?;
        if token.is_expired() {
            self.clear();
            return Err(AuthError::TokenExpired {
                message: "log in again".to_string(),
            });
        }
        Ok(token)
    }
}
