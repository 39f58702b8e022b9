// 3rd party crates
use thiserror::Error;

/// Custom error type for storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("Failed to serialize value for key '{key}': {message}")]
    Serialization { key: String, message: String },
}
