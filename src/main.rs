// Standard library
use std::sync::Arc;

// 3rd party crates
use tracing::{error, info};
use tracing_subscriber::{filter::LevelFilter, EnvFilter};

// Project modules
mod functions;

// Project imports
use refsync::settings::types::ConfigManager;

/// Connectivity probe for the refsync backend.
///
/// Loads the configuration, wires the orchestration components together
/// and performs an unauthenticated version check, reporting the rate
/// limiter's view of the exchange.
#[tokio::main]
async fn main() {
    // loads the .env file from the current directory or parents.
    dotenvy::dotenv_override().ok();

    // Create ConfigManager and wrap it in Arc
    let config: Arc<ConfigManager> = Arc::new(
        ConfigManager::new().expect("Failed to initialize configuration"),
    );

    // setup logging.
    let log_level: String = config.get_log_level().await;

    let filter: EnvFilter = EnvFilter::builder()
        .with_default_directive(LevelFilter::ERROR.into())
        .parse_lossy(log_level)
        .add_directive("hyper_util=error".parse().unwrap())
        .add_directive("reqwest=error".parse().unwrap())
        .add_directive("hyper=error".parse().unwrap());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_level(true)
        .init();

    info!("⚙️ Settings have been loaded.");

    if let Err(e) = functions::run(config).await {
        error!("Probe failed: {}", e);
        std::process::exit(1);
    }

    info!("Probe complete.");
}
