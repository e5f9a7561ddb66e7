//! Application builder: wires router, middleware, and state into a served
//! Axum app.

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tracing::{info, warn};

use stowage_core::config::AppConfig;
use stowage_core::error::AppError;
use stowage_core::traits::identity::IdentityResolver;
use stowage_core::traits::storage::StorageProvider;
use stowage_database::EntityStore;

use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application for the given state.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Serve the API until Ctrl+C or SIGTERM.
pub async fn run_server(
    config: AppConfig,
    store: Arc<dyn EntityStore>,
    storage: Arc<dyn StorageProvider>,
    identity: Arc<dyn IdentityResolver>,
) -> Result<(), AppError> {
    let addr = config.server.bind_address();
    let state = AppState::new(config, store, storage, identity);
    let app = build_app(state);

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    info!(address = %addr, "Stowage server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
