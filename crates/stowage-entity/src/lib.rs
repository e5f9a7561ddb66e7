//! # stowage-entity
//!
//! Domain entity models for Stowage. Every struct in this crate represents
//! a database table row or a domain value object. Row types additionally
//! derive `sqlx::FromRow`.
//!
//! The [`unit_of_work`] module describes multi-record mutations (trash,
//! restore, and purge cascades) as data, so that every store applies them
//! atomically and in the same order.

pub mod entity;
pub mod file;
pub mod folder;
pub mod lifecycle;
pub mod unit_of_work;
pub mod user;

pub use entity::{Contents, Entity, EntityKind, ParentFilter};
pub use file::{CreateFile, File};
pub use folder::{CreateFolder, Folder};
pub use lifecycle::{LifecycleState, Transition};
pub use unit_of_work::{Action, Selector, Step, UnitOfWork, UnitOfWorkOutcome};
pub use user::{CreateUser, User};
