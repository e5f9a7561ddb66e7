//! Folder CRUD, listing and moves.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use stowage_core::error::AppError;
use stowage_core::result::AppResult;
use stowage_database::EntityStore;
use stowage_entity::{Contents, CreateFolder, EntityKind, Folder, LifecycleState, ParentFilter};

use crate::context::RequestContext;
use crate::naming::normalize_name;

/// Check that `parent`, if given, is an active folder owned by the caller.
pub(crate) async fn require_parent(
    store: &dyn EntityStore,
    ctx: &RequestContext,
    parent: Option<Uuid>,
) -> AppResult<()> {
    let Some(parent_id) = parent else {
        return Ok(());
    };
    match store.find_folder(ctx.user_id, parent_id).await? {
        Some(folder) if folder.state() == LifecycleState::Active => Ok(()),
        _ => Err(AppError::not_found("Parent folder not found")),
    }
}

/// Manages folders.
#[derive(Debug, Clone)]
pub struct FolderService {
    store: Arc<dyn EntityStore>,
}

impl FolderService {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    /// Create a folder at the root or under an active parent.
    pub async fn create_folder(
        &self,
        ctx: &RequestContext,
        name: &str,
        parent_id: Option<Uuid>,
    ) -> AppResult<Folder> {
        let name = normalize_name(name, "Folder name")?;
        require_parent(self.store.as_ref(), ctx, parent_id).await?;

        let folder = self
            .store
            .insert_folder(&CreateFolder {
                owner_id: ctx.user_id,
                parent_id,
                name,
            })
            .await?;

        info!(
            user_id = %ctx.user_id,
            folder_id = %folder.id,
            parent_id = ?folder.parent_id,
            "Folder created"
        );
        Ok(folder)
    }

    /// Active folders, optionally restricted by parent.
    pub async fn list_folders(
        &self,
        ctx: &RequestContext,
        parent: ParentFilter,
    ) -> AppResult<Vec<Folder>> {
        self.store.list_folders(ctx.user_id, false, parent).await
    }

    /// Active folders and files together, optionally restricted by parent.
    pub async fn list_contents(
        &self,
        ctx: &RequestContext,
        parent: ParentFilter,
    ) -> AppResult<Contents> {
        Ok(Contents {
            folders: self.store.list_folders(ctx.user_id, false, parent).await?,
            files: self.store.list_files(ctx.user_id, false, parent).await?,
        })
    }

    /// Rename a folder. Trashed folders may be renamed too.
    pub async fn rename_folder(
        &self,
        ctx: &RequestContext,
        folder_id: Uuid,
        name: &str,
    ) -> AppResult<Folder> {
        let name = normalize_name(name, "Folder name")?;
        let folder = self
            .store
            .rename(ctx.user_id, EntityKind::Folder, folder_id, &name)
            .await?
            .and_then(|entity| entity.into_folder())
            .ok_or_else(|| AppError::not_found("Folder not found"))?;

        info!(user_id = %ctx.user_id, folder_id = %folder.id, "Folder renamed");
        Ok(folder)
    }

    /// Move a folder under another active folder, or to the root.
    ///
    /// A folder cannot be moved into itself or one of its descendants.
    pub async fn move_folder(
        &self,
        ctx: &RequestContext,
        folder_id: Uuid,
        new_parent_id: Option<Uuid>,
    ) -> AppResult<Folder> {
        self.store
            .find_folder(ctx.user_id, folder_id)
            .await?
            .ok_or_else(|| AppError::not_found("Folder not found"))?;

        if let Some(parent_id) = new_parent_id {
            require_parent(self.store.as_ref(), ctx, Some(parent_id)).await?;
            let ancestors = self.store.folder_ancestors(ctx.user_id, parent_id).await?;
            if ancestors.contains(&folder_id) {
                return Err(AppError::validation(
                    "Cannot move a folder into itself or one of its subfolders",
                ));
            }
        }

        let folder = self
            .store
            .set_parent(ctx.user_id, EntityKind::Folder, folder_id, new_parent_id)
            .await?
            .and_then(|entity| entity.into_folder())
            .ok_or_else(|| AppError::not_found("Folder not found"))?;

        info!(
            user_id = %ctx.user_id,
            folder_id = %folder.id,
            parent_id = ?folder.parent_id,
            "Folder moved"
        );
        Ok(folder)
    }
}
