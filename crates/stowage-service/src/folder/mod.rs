//! Folder operations.

pub mod service;

pub use service::FolderService;
pub(crate) use service::require_parent;
