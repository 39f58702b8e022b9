// Standard library
use std::error::Error;
use std::sync::Arc;

// 3rd party crates
use tracing::{info, warn};

// Project imports
use refsync::api::types::ApiClient;
use refsync::auth::types::StaticCredentialSource;
use refsync::models::api::VersionInfo;
use refsync::settings::types::ConfigManager;
use refsync::storage::impls::MemoryKeyValueStore;

/// Composition root: builds the store, credential source and client from
/// the loaded settings, then probes the backend.
///
/// This is the only place components are wired together; everything that
/// issues network calls receives its collaborators from here.
pub async fn run(config: Arc<ConfigManager>) -> Result<(), Box<dyn Error>> {
    let settings = config.get_settings().await;

    let store = Arc::new(MemoryKeyValueStore::new());
    let credentials = Arc::new(StaticCredentialSource::new(
        settings.api.session_cookie.clone(),
    ));

    if settings.api.session_cookie.is_none() {
        warn!("no session cookie configured, authenticated endpoints will be rejected");
    }

    let client: ApiClient = ApiClient::from_settings(&settings, credentials, store)?;
    drop(settings);

    info!("Probing backend version endpoint");
    let version: VersionInfo = client.server_version().await?;
    info!(version = %version.version, "Backend reachable");

    if let Some(minimum) = version.minimum_client {
        info!(minimum_client = %minimum, "Server minimum client version");
    }

    let stats = client.limiter_stats().await;
    info!(
        tokens = stats.tokens,
        max_tokens = stats.max_tokens,
        dispatched = stats.total_dispatched,
        "Rate limiter state after probe"
    );

    if let Some(limits) = client.rate_limit_info().await {
        info!(
            limit = limits.limit,
            remaining = limits.remaining,
            reset = limits.reset,
            "Server-reported rate limits"
        );
    }

    Ok(())
}
