//! Time-Value-of-Money Engine server entry point.

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tvm_engine::api::{AppState, create_router};
use tvm_engine::config::{CONFIG_FILE_NAME, ConfigLoader, EngineConfig};
use tvm_engine::error::EngineError;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("TVM Engine v{}", env!("CARGO_PKG_VERSION"));

    // Directory holding engine.yaml
    let config_dir = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config".to_string());

    let config = match ConfigLoader::load(&config_dir) {
        Ok(loader) => {
            info!("Loaded configuration from {}/{}", config_dir, CONFIG_FILE_NAME);
            loader.into_config()
        }
        Err(EngineError::ConfigNotFound { path }) => {
            warn!("{} not found, using default configuration", path);
            EngineConfig::default()
        }
        Err(e) => return Err(e.into()),
    };

    let address = config.server.bind_address();
    let router = create_router(AppState::new(config));

    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("Listening on {}", address);
    axum::serve(listener, router).await?;

    Ok(())
}
