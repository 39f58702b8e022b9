// 3rd party crates
use thiserror::Error;

// Project imports
use crate::auth::errors::AuthError;
use crate::utility::rate_limiter::errors::ThrottleError;

/// Typed failure taxonomy surfaced to every caller of the client.
///
/// Classification happens as close to the network boundary as possible;
/// the rate limiter and deduplicator never catch or reclassify. Messages
/// are owned strings so a single settlement can fan out to every caller
/// sharing a deduplicated request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Authorization or permission failure (HTTP 401/403), or a
    /// credential/anti-forgery issuance failure.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// Request rejected as semantically invalid (HTTP 400).
    #[error("Invalid request: {message}")]
    Validation { message: String },

    /// Server quota exhaustion (HTTP 429) or local queue saturation.
    #[error("Rate limited: {message}")]
    RateLimited { message: String },

    /// Transport failure: connection refused, DNS failure, local timeout.
    #[error("Network error: {message}")]
    Network { message: String },

    /// The rate limiter was reset while this request waited for admission.
    #[error("Request cancelled: {message}")]
    Cancelled { message: String },

    /// Any other non-2xx status.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// A 2xx response whose body could not be decoded.
    #[error("Unexpected response: {message}")]
    UnexpectedResponse { message: String },
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        ApiError::Authentication {
            message: e.to_string(),
        }
    }
}

impl From<ThrottleError> for ApiError {
    fn from(e: ThrottleError) -> Self {
        match e {
            ThrottleError::QueueFull { size } => ApiError::RateLimited {
                message: format!("Local request queue is full ({size} pending)"),
            },
            ThrottleError::Cancelled => ApiError::Cancelled {
                message: "Rate limiter was reset while waiting for admission".to_string(),
            },
        }
    }
}

/// Errors produced by an `HttpTransport` implementation, before
/// classification.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Request timed out")]
    Timeout,

    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Transport failure: {0}")]
    Other(String),
}
