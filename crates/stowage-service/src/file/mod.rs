//! File operations: metadata, upload, download, search.

pub mod download;
pub mod search;
pub mod service;
pub mod upload;

pub use download::{Download, DownloadService};
pub use search::SearchService;
pub use service::FileService;
pub use upload::{UploadRequest, UploadService};
