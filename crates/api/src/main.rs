use std::net::SocketAddr;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use defter_api::config::ServerConfig;
use defter_api::router::build_app_router;
use defter_api::state::AppState;
use defter_db::{Storage, StorageConfig};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "defter_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Storage ---
    let storage_config = StorageConfig::from_env();
    tracing::info!(backend = storage_config.mode.label(), "Selected storage backend");

    let storage = Storage::connect(&storage_config)
        .await
        .expect("Failed to initialize storage");

    if !storage.health().await {
        panic!("Storage health check failed");
    }
    tracing::info!("Storage health check passed");

    // --- Router ---
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("Invalid HOST/PORT combination");
    let app = build_app_router(AppState::new(storage, config.clone()), &config);

    tracing::info!(%addr, "Starting HTTP server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind server address");
    axum::serve(listener, app)
        .await
        .expect("Server terminated unexpectedly");
}
