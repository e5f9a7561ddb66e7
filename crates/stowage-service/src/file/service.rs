//! File listing, renames and moves.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use stowage_core::error::AppError;
use stowage_core::result::AppResult;
use stowage_database::EntityStore;
use stowage_entity::{EntityKind, File, ParentFilter};

use crate::context::RequestContext;
use crate::folder::require_parent;
use crate::naming::normalize_name;

/// Manages file records.
#[derive(Debug, Clone)]
pub struct FileService {
    store: Arc<dyn EntityStore>,
}

impl FileService {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    /// Fetch an owned file in any lifecycle state.
    pub async fn get_file(&self, ctx: &RequestContext, file_id: Uuid) -> AppResult<File> {
        self.store
            .find_file(ctx.user_id, file_id)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))
    }

    /// Active files, optionally restricted by parent.
    pub async fn list_files(
        &self,
        ctx: &RequestContext,
        parent: ParentFilter,
    ) -> AppResult<Vec<File>> {
        self.store.list_files(ctx.user_id, false, parent).await
    }

    /// Rename a file. Only the display name changes; content stays put.
    pub async fn rename_file(
        &self,
        ctx: &RequestContext,
        file_id: Uuid,
        name: &str,
    ) -> AppResult<File> {
        let name = normalize_name(name, "File name")?;
        let file = self
            .store
            .rename(ctx.user_id, EntityKind::File, file_id, &name)
            .await?
            .and_then(|entity| entity.into_file())
            .ok_or_else(|| AppError::not_found("File not found"))?;

        info!(user_id = %ctx.user_id, file_id = %file.id, "File renamed");
        Ok(file)
    }

    /// Move a file into an active folder, or to the root.
    pub async fn move_file(
        &self,
        ctx: &RequestContext,
        file_id: Uuid,
        new_parent_id: Option<Uuid>,
    ) -> AppResult<File> {
        self.get_file(ctx, file_id).await?;
        require_parent(self.store.as_ref(), ctx, new_parent_id).await?;

        let file = self
            .store
            .set_parent(ctx.user_id, EntityKind::File, file_id, new_parent_id)
            .await?
            .and_then(|entity| entity.into_file())
            .ok_or_else(|| AppError::not_found("File not found"))?;

        info!(
            user_id = %ctx.user_id,
            file_id = %file.id,
            parent_id = ?file.parent_id,
            "File moved"
        );
        Ok(file)
    }
}
