//! # stowage-service
//!
//! Business logic for Stowage. Every service receives its dependencies as
//! `Arc` trait objects at construction time and scopes every operation to
//! the caller in [`RequestContext`].

pub mod context;
pub mod file;
pub mod folder;
pub mod naming;
pub mod share;
pub mod trash;
pub mod user;

#[cfg(test)]
pub(crate) mod testing;

pub use context::RequestContext;
pub use file::{Download, DownloadService, FileService, SearchService, UploadRequest, UploadService};
pub use folder::FolderService;
pub use share::{ShareLink, ShareService, generate_token};
pub use trash::TrashService;
pub use user::{RegisterUser, UserService};
