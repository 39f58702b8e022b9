// 3rd party crates
use async_trait::async_trait;

// Current module imports
use super::errors::StorageError;

/// Minimal persistent key-value surface consumed by the orchestration core.
///
/// Used to cache the anti-forgery token across restarts and to persist
/// rate-limit snapshots for display. Values are opaque strings; callers
/// serialize structured data themselves.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Look up a value by key. `Ok(None)` means the key is absent.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Insert or replace a value.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a key. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}
