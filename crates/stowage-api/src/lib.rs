//! # stowage-api
//!
//! HTTP API layer for Stowage built on Axum.
//!
//! Provides the REST endpoints, bearer authentication extractor, CORS and
//! logging middleware, request/response DTOs, and the mapping from
//! [`stowage_core::AppError`] to HTTP responses.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use error::ApiError;
pub use state::AppState;
