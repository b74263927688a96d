//! Miniecom gateway server
//!
//! Serves the product catalog, cache and deep-link endpoints over HTTP.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use miniecom::api::create_router;
use miniecom::session::SessionStore;
use miniecom::storage::{FileStore, KeyValueStore};
use miniecom::transport::HttpTransport;
use miniecom::{AppState, AuthClient, Catalog, Config, TtlCache};

/// Main entry point for the gateway.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Open the file-backed key-value store
/// 4. Build the transport, cache and catalog
/// 5. Start HTTP server on configured port
/// 6. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "miniecom=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting miniecom gateway");

    let config = Config::from_env();
    info!(
        "Configuration loaded: api={}, port={}, storage={}, retry_attempts={}",
        config.api_base_url,
        config.server_port,
        config.storage_path.display(),
        config.retry_max_attempts
    );

    let policy = config.retry_policy().context("invalid retry configuration")?;

    let store: Arc<dyn KeyValueStore> = Arc::new(
        FileStore::open(&config.storage_path)
            .await
            .with_context(|| format!("failed to open {}", config.storage_path.display()))?,
    );
    info!("Key-value store opened");

    let session = SessionStore::new(store.clone());
    let transport = Arc::new(
        HttpTransport::new(config.api_base_url.clone(), config.request_timeout())?
            .with_session(session.clone()),
    );
    let cache = TtlCache::new(store).with_default_ttl(config.cache_default_ttl());
    let catalog = Catalog::new(transport.clone(), cache, policy);
    let auth = AuthClient::new(transport, session);

    let app = create_router(AppState::new(catalog, auth));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                warn!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
