// 3rd party crates
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid log level: {0}. Must be one of: error, warn, info, debug, trace")]
    InvalidLogLevel(String),

    #[error("API base URL must not be empty")]
    MissingBaseUrl,

    #[error("API base URL must not end with a slash: {0}")]
    TrailingSlashBaseUrl(String),

    #[error("Request timeout must be greater than 0 seconds")]
    InvalidTimeout,

    #[error("Invalid rate limit configuration: {0}")]
    InvalidRateLimit(String),
}
