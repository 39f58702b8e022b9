//! Authenticated API Client
//!
//! One logical call = compose (session credential + anti-forgery token)
//! → dispatch under an absolute timeout → classify (typed error taxonomy,
//! rate-limit header forwarding, one bounded retry after an authorization
//! rejection) → terminal. Concurrent identical reads collapse through the
//! deduplicator into a single rate-limited network call; writes bypass
//! deduplication but still pass through the rate limiter.

pub mod constants;
pub mod errors;
pub mod functions;
pub mod impls;
pub mod traits;
pub mod types;

pub use errors::{ApiError, TransportError};
pub use functions::{classify_response, extract_rate_limit_info};
pub use traits::HttpTransport;
pub use types::{ApiClient, ApiConfig, ApiRequest, ApiResponseParts, RateLimitInfo, RequestOptions, ReqwestTransport};
