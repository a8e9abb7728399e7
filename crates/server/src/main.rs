use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use popcorn_core::{
    load_config, validate_config, JsonWatchedStore, MovieCatalog, OmdbClient, WatchedList,
    WatchedStore,
};
use popcorn_server::api::create_router;
use popcorn_server::state::AppState;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "popcorn=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting popcorn v{}", VERSION);

    // Load configuration
    let config_path =
        std::env::var("POPCORN_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
    info!("Loading configuration from {}", config_path);

    let config = load_config(Path::new(&config_path))
        .with_context(|| format!("Failed to load configuration from {}", config_path))?;
    validate_config(&config).context("Configuration validation failed")?;

    // Catalog client
    let catalog: Arc<dyn MovieCatalog> = Arc::new(
        OmdbClient::new(config.omdb.clone()).context("Failed to create catalog client")?,
    );

    // Watched list, loaded once from storage
    let store: Arc<dyn WatchedStore> =
        Arc::new(JsonWatchedStore::new(&config.storage.watched_path));
    let watched = Arc::new(WatchedList::load(store).context("Failed to load watched list")?);
    info!(
        "Watched list loaded, {} titles from {}",
        watched.entries().len(),
        config.storage.watched_path.display()
    );

    let addr = std::net::SocketAddr::new(config.server.host, config.server.port);
    let state = Arc::new(AppState::new(config, catalog, watched));
    let app = create_router(state);

    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
