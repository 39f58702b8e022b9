// 3rd party crates
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

// Current module imports
use super::constants::{
    DEFAULT_USER_AGENT, GENERIC_ERROR_MESSAGE, RATE_LIMIT_LIMIT_HEADER,
    RATE_LIMIT_REMAINING_HEADER, RATE_LIMIT_RESET_HEADER,
};
use super::errors::ApiError;
use super::types::{ApiResponseParts, RateLimitInfo};

/// Creates the reqwest client used by the default transport.
pub fn create_http_client() -> Result<reqwest::Client, ApiError> {
    let mut headers: HeaderMap = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    reqwest::Client::builder()
        .user_agent(DEFAULT_USER_AGENT)
        .default_headers(headers)
        .build()
        .map_err(|e| ApiError::Network {
            message: format!("Failed to build HTTP client: {}", e),
        })
}

/// Maps a non-2xx response onto the typed taxonomy.
///
/// The message prefers a server-supplied `error` or `message` body field,
/// falls back to the HTTP status line, then to a generic message.
pub fn classify_response(status: u16, body: &str) -> ApiError {
    let message: String = error_message(status, body);

    match status {
        401 | 403 => ApiError::Authentication { message },
        400 => ApiError::Validation { message },
        429 => ApiError::RateLimited { message },
        _ => ApiError::Api { status, message },
    }
}

fn error_message(status: u16, body: &str) -> String {
    if let Ok(Value::Object(fields)) = serde_json::from_str::<Value>(body) {
        for key in ["error", "message"] {
            if let Some(Value::String(text)) = fields.get(key) {
                if !text.is_empty() {
                    return text.clone();
                }
            }
        }
    }

    StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or(GENERIC_ERROR_MESSAGE)
        .to_string()
}

/// Extracts the rate-limit header triple. All three headers must be
/// present and numeric; anything less means "no information available",
/// which is not an error.
pub fn extract_rate_limit_info(parts: &ApiResponseParts) -> Option<RateLimitInfo> {
    let limit: u32 = parts.header(RATE_LIMIT_LIMIT_HEADER)?.trim().parse().ok()?;
    let remaining: u32 = parts
        .header(RATE_LIMIT_REMAINING_HEADER)?
        .trim()
        .parse()
        .ok()?;
    let reset: u64 = parts.header(RATE_LIMIT_RESET_HEADER)?.trim().parse().ok()?;

    Some(RateLimitInfo {
        limit,
        remaining,
        reset,
    })
}

/// Reads never mutate server state; only they are deduplicated.
pub(super) fn is_read_only(method: &Method) -> bool {
    *method == Method::GET || *method == Method::HEAD
}

pub(super) fn decode_body<T: DeserializeOwned>(endpoint: &str, raw: &str) -> Result<T, ApiError> {
    serde_json::from_str(raw).map_err(|e| ApiError::UnexpectedResponse {
        message: format!("Failed to decode response from {}: {}", endpoint, e),
    })
}
