//! # stowage-storage
//!
//! Content storage for uploaded file bytes. File records only hold an
//! opaque `location`; this crate decides what it means.

pub mod content;
pub mod local;

pub use content::{blob_location, content_type};
pub use local::LocalStorageProvider;
