//! # stowage-database
//!
//! The [`EntityStore`] trait and its two implementations:
//!
//! - [`PgEntityStore`]: PostgreSQL via sqlx, one transaction per unit of work.
//! - [`MemoryEntityStore`]: process-local snapshot store for tests and
//!   development runs.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod postgres;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use memory::MemoryEntityStore;
pub use postgres::PgEntityStore;
pub use store::{EntityStore, like_pattern};
