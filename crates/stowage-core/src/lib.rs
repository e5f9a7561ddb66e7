//! # stowage-core
//!
//! Core crate for Stowage. Contains configuration schemas, the traits
//! implemented by the infrastructure crates, and the unified error system.
//!
//! This crate has **no** internal dependencies on other Stowage crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use error::AppError;
pub use result::AppResult;
