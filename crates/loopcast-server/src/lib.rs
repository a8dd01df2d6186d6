//! loopcast-server: the HTTP manifest service.
//!
//! Ties the other loopcast crates into a running server: an Axum router
//! serving per-client master and child playlists, an origin client for
//! manifest fetches, and graceful shutdown via signal handling. All
//! playlist math lives in `loopcast-media`; this crate only moves bytes
//! and wires state.

pub mod context;
pub mod error;
pub mod ingest;
pub mod origin;
pub mod router;
pub mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use loopcast_core::config::Config;

use crate::context::AppContext;
use crate::origin::HttpOrigin;

/// Start the manifest service.
///
/// Initializes the database pool, constructs the [`AppContext`], and runs
/// the HTTP server until a shutdown signal arrives.
pub async fn serve(config: Config) -> loopcast_core::Result<()> {
    for warning in config.validate() {
        tracing::warn!("Config warning: {warning}");
    }

    let db = loopcast_db::pool::init_pool(&config.database.path)?;
    tracing::info!("Database ready at {}", config.database.path);

    let origin = Arc::new(HttpOrigin::new(&config.origin)?);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| loopcast_core::Error::retrieval(format!("invalid server address: {e}")))?;

    let ctx = AppContext {
        db,
        config: Arc::new(config),
        origin,
    };

    let app = router::build_router(ctx);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(loopcast_core::Error::Io)?;
    tracing::info!("Listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(loopcast_core::Error::Io)?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for a shutdown signal (SIGINT or SIGTERM).
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
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    tracing::info!("Shutdown signal received");
}
