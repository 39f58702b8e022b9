// Standard library
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

// 3rd party crates
use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tokio::sync::RwLock;
use tracing::{debug, warn};

// Project imports
use crate::auth::constants::{CSRF_TOKEN_ENDPOINT, CSRF_TOKEN_HEADER};
use crate::auth::errors::AuthError;
use crate::auth::traits::CredentialSource;
use crate::auth::types::CsrfTokenManager;
use crate::metrics::types::{MetricsManager, RequestMetrics};
use crate::models::api::{ApiMessage, Category, NewReference, Project, SavedReference, VersionInfo};
use crate::settings::types::Settings;
use crate::storage::traits::KeyValueStore;
use crate::utility::deduplicator::types::RequestDeduplicator;
use crate::utility::rate_limiter::types::{RequestRateLimiter, RateLimiterStats};

// Current module imports
use super::constants::{
    PROJECTS_ENDPOINT, RATE_LIMIT_INFO_STORAGE_KEY, REFERENCES_ENDPOINT, VERSION_ENDPOINT,
};
use super::errors::{ApiError, TransportError};
use super::functions::{
    classify_response, create_http_client, decode_body, extract_rate_limit_info, is_read_only,
};
use super::types::{
    ApiClient, ApiConfig, ApiRequest, ApiResponseParts, RateLimitInfo, RequestOptions,
    ReqwestTransport,
};
use super::traits::HttpTransport;

impl ApiClient {
    /// Assembles a client from explicitly constructed collaborators.
    /// The caller (the application's composition root) owns the choice of
    /// transport, limiter and deduplicator; tests substitute their own.
    pub fn new(
        config: ApiConfig,
        transport: Arc<dyn HttpTransport>,
        deduplicator: Arc<RequestDeduplicator<Result<String, ApiError>>>,
        rate_limiter: RequestRateLimiter,
        credentials: Arc<dyn CredentialSource>,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        let csrf = CsrfTokenManager::new(Arc::clone(&store));
        Self {
            config,
            transport,
            deduplicator,
            rate_limiter,
            credentials,
            store,
            csrf,
            metrics: MetricsManager::new(),
            rate_limit_info: Arc::new(RwLock::new(None)),
        }
    }

    /// Convenience constructor wiring the default reqwest transport and
    /// fresh orchestration components from the loaded settings.
    pub fn from_settings(
        settings: &Settings,
        credentials: Arc<dyn CredentialSource>,
        store: Arc<dyn KeyValueStore>,
    ) -> Result<Self, ApiError> {
        let config = ApiConfig {
            base_url: settings.api.base_url.clone(),
            timeout: Duration::from_secs(settings.api.timeout_secs),
        };
        let client: reqwest::Client = create_http_client()?;

        Ok(Self::new(
            config,
            Arc::new(ReqwestTransport::new(client)),
            Arc::new(RequestDeduplicator::new()),
            RequestRateLimiter::new(settings.rate_limit.clone()),
            credentials,
            store,
        ))
    }

    /// Performs one logical request and decodes the JSON payload.
    ///
    /// Reads (GET/HEAD) are deduplicated by logical key and throttled;
    /// writes bypass deduplication (mutations must not be silently
    /// merged) but still pass through the rate limiter.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<Value>,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        let raw: String = self.request_raw(method, endpoint, body, options).await?;
        decode_body(endpoint, &raw)
    }

    async fn request_raw(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<Value>,
        options: RequestOptions,
    ) -> Result<String, ApiError> {
        let result = if is_read_only(&method) {
            let key: String = options
                .dedupe_key
                .clone()
                .unwrap_or_else(|| format!("{} {}", method, endpoint));

            let client = self.clone();
            let endpoint = endpoint.to_string();

            self.deduplicator
                .dedupe(&key, move || async move {
                    client
                        .throttled_dispatch(method, &endpoint, body, options)
                        .await
                })
                .await
        } else {
            self.throttled_dispatch(method, endpoint, body, options)
                .await
        };

        match &result {
            Ok(_) => self.metrics.record_success().await,
            Err(e) => {
                self.metrics.record_failure().await;
                if matches!(e, ApiError::RateLimited { .. }) {
                    self.metrics.record_rate_limit_hit().await;
                }
            }
        }

        result
    }

    async fn throttled_dispatch(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<Value>,
        options: RequestOptions,
    ) -> Result<String, ApiError> {
        let priority: i32 = options.priority;
        let client = self.clone();
        let endpoint_owned: String = endpoint.to_string();

        let admitted = self
            .rate_limiter
            .throttle_with_priority(
                move || async move {
                    client
                        .execute(method, &endpoint_owned, body, &options)
                        .await
                },
                priority,
            )
            .await;

        match admitted {
            Ok(outcome) => outcome,
            Err(e) => Err(ApiError::from(e)),
        }
    }

    /// The per-call state machine: compose, dispatch, classify; at most
    /// one extra cycle after an authorization rejection, with the cached
    /// anti-forgery token discarded in between. Callers never observe the
    /// intermediate 401.
    async fn execute(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<Value>,
        options: &RequestOptions,
    ) -> Result<String, ApiError> {
        let mut retry_allowed: bool = options.retry_on_401 && !options.skip_auth;

        loop {
            let request: ApiRequest = self
                .compose(method.clone(), endpoint, body.clone(), options)
                .await?;

            let parts: ApiResponseParts = match self.transport.execute(request).await {
                Ok(parts) => parts,
                Err(TransportError::Timeout) => {
                    self.metrics.record_timeout().await;
                    return Err(ApiError::Network {
                        message: format!(
                            "Request to {} timed out after {:?}",
                            endpoint, self.config.timeout
                        ),
                    });
                }
                Err(e) => {
                    return Err(ApiError::Network {
                        message: e.to_string(),
                    })
                }
            };

            if parts.is_success() {
                if let Some(info) = extract_rate_limit_info(&parts) {
                    self.rate_limiter
                        .update_from_headers(info.limit, info.remaining, info.reset)
                        .await;
                    self.remember_rate_limit(info).await;
                }
                return Ok(parts.body);
            }

            if parts.status == 401 && retry_allowed {
                retry_allowed = false;
                self.metrics.record_auth_retry().await;
                warn!(
                    endpoint = %endpoint,
                    "authorization rejected, refreshing anti-forgery token and retrying"
                );
                self.csrf.invalidate().await;
                continue;
            }

            let error: ApiError = classify_response(parts.status, &parts.body);
            debug!(endpoint = %endpoint, status = parts.status, error = %error, "request failed");
            return Err(error);
        }
    }

    /// Builds the target URL and headers: session cookie when available,
    /// anti-forgery token for state-mutating methods.
    async fn compose(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<Value>,
        options: &RequestOptions,
    ) -> Result<ApiRequest, ApiError> {
        let url: String = format!("{}{}", self.config.base_url, endpoint);
        let mut headers: Vec<(String, String)> = Vec::new();

        if !options.skip_auth {
            match self.credentials.session_cookie().await {
                Ok(Some(cookie)) => headers.push(("cookie".to_string(), cookie)),
                Ok(None) => debug!(endpoint = %endpoint, "no session credential available"),
                Err(e) => return Err(ApiError::from(e)),
            }

            if !is_read_only(&method) {
                let token: String = self.csrf_token().await?;
                headers.push((CSRF_TOKEN_HEADER.to_string(), token));
            }
        }

        Ok(ApiRequest {
            method,
            url,
            headers,
            body,
            timeout: self.config.timeout,
        })
    }

    /// Cached anti-forgery token, or a fresh one from the issuing
    /// endpoint. The fetch goes straight through the transport: it must
    /// not re-enter the queue the surrounding request already occupies.
    async fn csrf_token(&self) -> Result<String, ApiError> {
        if let Some(token) = self.csrf.cached_token().await {
            return Ok(token);
        }

        let mut headers: Vec<(String, String)> = Vec::new();
        match self.credentials.session_cookie().await {
            Ok(Some(cookie)) => headers.push(("cookie".to_string(), cookie)),
            Ok(None) => {}
            Err(e) => return Err(ApiError::from(e)),
        }

        let request = ApiRequest {
            method: Method::GET,
            url: format!("{}{}", self.config.base_url, CSRF_TOKEN_ENDPOINT),
            headers,
            body: None,
            timeout: self.config.timeout,
        };

        let parts = self
            .transport
            .execute(request)
            .await
            .map_err(|e| ApiError::Authentication {
                message: format!("Anti-forgery token request failed: {}", e),
            })?;

        if !parts.is_success() {
            return Err(ApiError::Authentication {
                message: format!("Anti-forgery token request failed with HTTP {}", parts.status),
            });
        }

        let token: String = parts
            .header(CSRF_TOKEN_HEADER)
            .map(str::to_string)
            .ok_or(AuthError::TokenNotIssued)
            .map_err(ApiError::from)?;

        debug!("anti-forgery token issued");
        self.csrf.store_token(&token).await;
        Ok(token)
    }

    /// Side channel for UI display: keeps the latest snapshot in memory
    /// and persists it. Persistence failures never fail the request.
    async fn remember_rate_limit(&self, info: RateLimitInfo) {
        *self.rate_limit_info.write().await = Some(info);

        match serde_json::to_string(&info) {
            Ok(snapshot) => {
                if let Err(e) = self.store.set(RATE_LIMIT_INFO_STORAGE_KEY, &snapshot).await {
                    warn!(error = %e, "failed to persist rate-limit snapshot");
                }
            }
            Err(e) => warn!(error = %e, "failed to serialize rate-limit snapshot"),
        }
    }

    /// Latest server-reported rate-limit snapshot, if any was seen.
    pub async fn rate_limit_info(&self) -> Option<RateLimitInfo> {
        *self.rate_limit_info.read().await
    }

    pub async fn limiter_stats(&self) -> RateLimiterStats {
        self.rate_limiter.get_stats().await
    }

    pub async fn metrics_snapshot(&self) -> RequestMetrics {
        self.metrics.snapshot().await
    }
}

/// Typed endpoint surface. The dedup keys here are the logical-operation
/// identities shared by all concurrent readers of the same resource.
impl ApiClient {
    /// Unauthenticated version check.
    pub async fn server_version(&self) -> Result<VersionInfo, ApiError> {
        self.request(
            Method::GET,
            VERSION_ENDPOINT,
            None,
            RequestOptions {
                skip_auth: true,
                dedupe_key: Some("version".to_string()),
                ..Default::default()
            },
        )
        .await
    }

    pub async fn list_projects(&self) -> Result<Vec<Project>, ApiError> {
        self.request(
            Method::GET,
            PROJECTS_ENDPOINT,
            None,
            RequestOptions {
                dedupe_key: Some("projects:list".to_string()),
                ..Default::default()
            },
        )
        .await
    }

    pub async fn get_project(&self, id: u64) -> Result<Project, ApiError> {
        self.request(
            Method::GET,
            &format!("{}/{}", PROJECTS_ENDPOINT, id),
            None,
            RequestOptions {
                dedupe_key: Some(format!("projects:{}", id)),
                ..Default::default()
            },
        )
        .await
    }

    pub async fn list_categories(&self, project_id: u64) -> Result<Vec<Category>, ApiError> {
        self.request(
            Method::GET,
            &format!("{}/{}/categories", PROJECTS_ENDPOINT, project_id),
            None,
            RequestOptions {
                dedupe_key: Some(format!("categories:{}", project_id)),
                ..Default::default()
            },
        )
        .await
    }

    pub async fn create_reference(
        &self,
        project_id: u64,
        reference: &NewReference,
    ) -> Result<SavedReference, ApiError> {
        let body = json!({
            "project_id": project_id,
            "reference": reference,
        });

        self.request(
            Method::POST,
            REFERENCES_ENDPOINT,
            Some(body),
            RequestOptions::default(),
        )
        .await
    }

    pub async fn delete_reference(&self, id: u64) -> Result<ApiMessage, ApiError> {
        self.request(
            Method::DELETE,
            &format!("{}/{}", REFERENCES_ENDPOINT, id),
            None,
            RequestOptions::default(),
        )
        .await
    }
}

impl ReqwestTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponseParts, TransportError> {
        let mut builder = self
            .client
            .request(request.method, &request.url)
            .timeout(request.timeout);

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(map_reqwest_error)?;
        let status: u16 = response.status().as_u16();

        let mut headers: HashMap<String, String> = HashMap::new();
        for (name, value) in response.headers() {
            if let Ok(text) = value.to_str() {
                headers.insert(name.as_str().to_ascii_lowercase(), text.to_string());
            }
        }

        let body: String = response.text().await.map_err(map_reqwest_error)?;

        Ok(ApiResponseParts {
            status,
            headers,
            body,
        })
    }
}

fn map_reqwest_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else if e.is_connect() {
        TransportError::Connect(e.to_string())
    } else {
        TransportError::Other(e.to_string())
    }
}
