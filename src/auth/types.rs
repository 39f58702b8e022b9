// Standard library
use std::sync::Arc;

// 3rd party crates
use tokio::sync::RwLock;

// Project imports
use crate::storage::traits::KeyValueStore;

/// Anti-forgery token cache: in-memory first, persistent store fallback.
///
/// Cloning is cheap; all clones share the same cached token.
#[derive(Clone)]
pub struct CsrfTokenManager {
    pub(super) cached: Arc<RwLock<Option<String>>>,
    pub(super) store: Arc<dyn KeyValueStore>,
}

/// `CredentialSource` returning a fixed cookie pair, or none.
pub struct StaticCredentialSource {
    pub(super) cookie: Option<String>,
}
