// 3rd party crates
use thiserror::Error;

// Project imports
use crate::storage::errors::StorageError;

/// Custom error type for credential operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Failed to read session credential: {0}")]
    CredentialRead(String),

    #[error("Server did not issue an anti-forgery token")]
    TokenNotIssued,

    #[error("Credential store error: {0}")]
    Store(#[from] StorageError),
}
