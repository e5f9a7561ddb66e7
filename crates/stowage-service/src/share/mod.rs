//! Public share links.

pub mod link;
pub mod service;

pub use link::generate_token;
pub use service::{ShareLink, ShareService};
