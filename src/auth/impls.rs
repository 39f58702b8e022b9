// Standard library
use std::sync::Arc;

// 3rd party crates
use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, warn};

// Project imports
use crate::storage::traits::KeyValueStore;

// Current module imports
use super::constants::CSRF_TOKEN_STORAGE_KEY;
use super::errors::AuthError;
use super::traits::CredentialSource;
use super::types::{CsrfTokenManager, StaticCredentialSource};

impl CsrfTokenManager {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            cached: Arc::new(RwLock::new(None)),
            store,
        }
    }

    /// Returns the cached token, falling back to the persistent store and
    /// promoting a hit into memory. `None` means a fresh token must be
    /// fetched from the server.
    pub async fn cached_token(&self) -> Option<String> {
        if let Some(token) = self.cached.read().await.clone() {
            return Some(token);
        }

        match self.store.get(CSRF_TOKEN_STORAGE_KEY).await {
            Ok(Some(token)) => {
                debug!("anti-forgery token restored from store");
                *self.cached.write().await = Some(token.clone());
                Some(token)
            }
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "failed to read anti-forgery token from store");
                None
            }
        }
    }

    /// Caches a freshly issued token in memory and persists it. A store
    /// failure is logged, not propagated: the in-memory copy is enough to
    /// serve the current session.
    pub async fn store_token(&self, token: &str) {
        *self.cached.write().await = Some(token.to_string());
        if let Err(e) = self.store.set(CSRF_TOKEN_STORAGE_KEY, token).await {
            warn!(error = %e, "failed to persist anti-forgery token");
        }
    }

    /// Discards the cached token everywhere. The next state-mutating
    /// request fetches a fresh one.
    pub async fn invalidate(&self) {
        *self.cached.write().await = None;
        if let Err(e) = self.store.remove(CSRF_TOKEN_STORAGE_KEY).await {
            warn!(error = %e, "failed to remove anti-forgery token from store");
        }
        debug!("anti-forgery token invalidated");
    }
}

impl StaticCredentialSource {
    /// `cookie` is the full pair, e.g. `refsync_session=abc123`.
    pub fn new(cookie: Option<String>) -> Self {
        Self { cookie }
    }
}

#[async_trait]
impl CredentialSource for StaticCredentialSource {
    async fn session_cookie(&self) -> Result<Option<String>, AuthError> {
        Ok(self.cookie.clone())
    }
}
