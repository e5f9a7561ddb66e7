//! Trash, restore and permanent deletion.

pub mod service;

pub use service::TrashService;
