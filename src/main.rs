//! Stowage server: personal cloud file storage.
//!
//! Main entry point that loads configuration, picks the entity store
//! backend, and starts the HTTP server.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use stowage_auth::JwtDecoder;
use stowage_core::config::{AppConfig, StoreBackend};
use stowage_core::error::AppError;
use stowage_database::{DatabasePool, EntityStore, MemoryEntityStore, PgEntityStore};
use stowage_storage::LocalStorageProvider;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Load `config/default.toml`, the `STOWAGE_ENV` overlay, and `STOWAGE__*`
/// environment variables.
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("STOWAGE_ENV").unwrap_or_else(|_| "development".to_string());
    let config = AppConfig::load(&env)?;
    config.validate()?;
    Ok(config)
}

fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting Stowage");

    let store = open_store(&config).await?;

    tracing::info!(root = %config.storage.root_path, "Initializing content storage");
    let storage = Arc::new(LocalStorageProvider::new(&config.storage.root_path).await?);

    let identity = Arc::new(JwtDecoder::new(&config.auth));

    stowage_api::run_server(config, store, storage, identity).await
}

async fn open_store(config: &AppConfig) -> Result<Arc<dyn EntityStore>, AppError> {
    match config.store.backend {
        StoreBackend::Postgres => {
            let db = DatabasePool::connect(&config.database).await?;
            if config.database.run_migrations {
                stowage_database::migration::run_migrations(db.pool()).await?;
            }
            Ok(Arc::new(PgEntityStore::new(db)))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using the in-memory entity store; data is lost on shutdown");
            Ok(Arc::new(MemoryEntityStore::new()))
        }
    }
}
