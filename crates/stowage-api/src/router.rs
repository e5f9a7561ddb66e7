//! Route definitions for the Stowage HTTP API.
//!
//! Routes are grouped by domain and mounted under `/api`. Every handler
//! receives `AppState` through Axum's `State` extractor.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post, put},
};
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let max_upload = usize::try_from(state.config.server.max_upload_size_bytes).unwrap_or(usize::MAX);

    let api_routes = Router::new()
        .merge(user_routes())
        .merge(folder_routes())
        .merge(file_routes())
        .merge(trash_routes())
        .merge(search_routes())
        .merge(health_routes());

    let cors = middleware::cors::build_cors_layer(&state.config.server.cors);

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(max_upload))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Registration, login, and profile
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/register", post(handlers::user::register))
        .route("/users/login", post(handlers::user::login))
        .route("/users/profile", get(handlers::user::profile))
}

fn folder_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/folders",
            get(handlers::folder::list_folders).post(handlers::folder::create_folder),
        )
        .route("/folders/{id}", put(handlers::folder::rename_folder))
        .route("/folders/{id}/move", put(handlers::folder::move_folder))
        .route("/drive", get(handlers::drive::list_drive))
}

/// File listing, upload, download, and sharing
fn file_routes() -> Router<AppState> {
    Router::new()
        .route("/files", get(handlers::file::list_files))
        .route("/files/upload", post(handlers::file::upload_file))
        .route("/files/{id}", put(handlers::file::rename_file))
        .route("/files/{id}/move", put(handlers::file::move_file))
        .route("/files/{id}/download", get(handlers::file::download_file))
        .route("/files/{id}/share", post(handlers::share::create_share_link))
        .route("/files/share/{token}", get(handlers::share::download_shared))
}

fn trash_routes() -> Router<AppState> {
    Router::new()
        .route("/trash", get(handlers::trash::list_trash))
        .route("/trash/restore", put(handlers::trash::restore_many))
        .route("/trash/restore-all", put(handlers::trash::restore_all))
        .route("/trash/restore/{id}", put(handlers::trash::restore_entity))
        .route(
            "/trash/{id}",
            post(handlers::trash::trash_entity).delete(handlers::trash::delete_entity),
        )
}

fn search_routes() -> Router<AppState> {
    Router::new().route("/search", get(handlers::search::search))
}

fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
