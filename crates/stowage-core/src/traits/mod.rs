//! Core traits defined in `stowage-core` and implemented by other crates.

pub mod identity;
pub mod storage;

pub use identity::{IdentityResolver, VerifiedIdentity};
pub use storage::{ByteStream, StorageProvider};
