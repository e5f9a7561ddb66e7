//! PostgreSQL repositories, one per table.

pub mod file;
pub mod folder;
pub mod user;

pub use file::FileRepository;
pub use folder::FolderRepository;
pub use user::UserRepository;

use sqlx::{Postgres, QueryBuilder};

use stowage_core::error::{AppError, ErrorKind};
use stowage_entity::ParentFilter;

/// Append the `parent_id` condition for a listing.
pub(crate) fn push_parent_filter(qb: &mut QueryBuilder<'_, Postgres>, parent: ParentFilter) {
    match parent {
        ParentFilter::Any => {}
        ParentFilter::Root => {
            qb.push(" AND parent_id IS NULL");
        }
        ParentFilter::Folder(id) => {
            qb.push(" AND parent_id = ").push_bind(id);
        }
    }
}

/// Map an insert/update failure, turning a vanished parent into `NotFound`.
pub(crate) fn map_write_error(context: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| match e {
        sqlx::Error::Database(ref db_err)
            if db_err.is_foreign_key_violation()
                && db_err.constraint().is_some_and(|c| c.ends_with("parent_id_fkey")) =>
        {
            AppError::not_found("Parent folder not found")
        }
        _ => AppError::with_source(ErrorKind::StoreUnavailable, context, e),
    }
}
