// 3rd party crates
use async_trait::async_trait;

// Current module imports
use super::errors::TransportError;
use super::types::{ApiRequest, ApiResponseParts};

/// Network seam the client dispatches through.
///
/// Implementations perform exactly one HTTP exchange: no retries, no
/// classification beyond the transport-level `TransportError` split.
/// The request's `timeout` is absolute; on expiry the implementation
/// returns `TransportError::Timeout` without contacting the server
/// further (the in-flight request may still complete server-side).
/// Response header names are reported lowercased.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponseParts, TransportError>;
}
