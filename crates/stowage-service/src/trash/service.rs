//! The soft-delete lifecycle.
//!
//! Every mutation here is a [`UnitOfWork`] applied atomically by the store.
//! Folder cascades reach direct children only: trashing or restoring a
//! folder also flips its direct child folders and files, and purging a
//! folder removes it together with its direct children that are already in
//! the trash. Never-trashed children of a purged folder move to the root.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use stowage_core::error::AppError;
use stowage_core::result::AppResult;
use stowage_core::traits::StorageProvider;
use stowage_database::EntityStore;
use stowage_entity::{
    Contents, Entity, EntityKind, LifecycleState, ParentFilter, Transition, UnitOfWork,
};

use crate::context::RequestContext;

#[derive(Debug, Clone)]
pub struct TrashService {
    store: Arc<dyn EntityStore>,
    storage: Arc<dyn StorageProvider>,
}

impl TrashService {
    pub fn new(store: Arc<dyn EntityStore>, storage: Arc<dyn StorageProvider>) -> Self {
        Self { store, storage }
    }

    /// Move an entity to the trash. Trashing a trashed entity is a no-op.
    pub async fn trash(
        &self,
        ctx: &RequestContext,
        kind: EntityKind,
        id: Uuid,
    ) -> AppResult<Entity> {
        self.current_state(ctx, kind, id).await?.apply(Transition::Trash)?;
        let entity = self
            .transition(ctx, kind, UnitOfWork::trash(ctx.user_id, kind, id))
            .await?;
        info!(user_id = %ctx.user_id, kind = %kind, id = %id, "Moved to trash");
        Ok(entity)
    }

    /// Restore an entity from the trash. Restoring an active entity is a
    /// no-op.
    pub async fn restore(
        &self,
        ctx: &RequestContext,
        kind: EntityKind,
        id: Uuid,
    ) -> AppResult<Entity> {
        self.current_state(ctx, kind, id).await?.apply(Transition::Restore)?;
        let entity = self
            .transition(ctx, kind, UnitOfWork::restore(ctx.user_id, kind, id))
            .await?;
        info!(user_id = %ctx.user_id, kind = %kind, id = %id, "Restored from trash");
        Ok(entity)
    }

    /// Restore the given ids. Ids the caller does not own are skipped.
    /// Returns the number of records restored.
    pub async fn restore_many(
        &self,
        ctx: &RequestContext,
        file_ids: Vec<Uuid>,
        folder_ids: Vec<Uuid>,
    ) -> AppResult<u64> {
        let outcome = self
            .store
            .apply(UnitOfWork::restore_many(ctx.user_id, file_ids, folder_ids))
            .await?;
        let restored = outcome.total_affected();
        info!(user_id = %ctx.user_id, restored, "Restored selected items");
        Ok(restored)
    }

    /// Restore everything in the caller's trash.
    pub async fn restore_all(&self, ctx: &RequestContext) -> AppResult<u64> {
        let outcome = self.store.apply(UnitOfWork::restore_all(ctx.user_id)).await?;
        let restored = outcome.total_affected();
        info!(user_id = %ctx.user_id, restored, "Restored all items");
        Ok(restored)
    }

    /// Permanently delete a trashed entity.
    ///
    /// Fails with `InvalidState`, changing nothing, when the entity is not in
    /// the trash. Content of deleted files is released after the records are
    /// gone; a failed release is logged and does not fail the request.
    pub async fn permanently_delete(
        &self,
        ctx: &RequestContext,
        kind: EntityKind,
        id: Uuid,
    ) -> AppResult<()> {
        self.current_state(ctx, kind, id).await?.apply(Transition::Purge)?;

        let outcome = self.store.apply(UnitOfWork::purge(ctx.user_id, kind, id)).await?;
        info!(
            user_id = %ctx.user_id,
            kind = %kind,
            id = %id,
            removed = outcome.total_affected(),
            "Permanently deleted"
        );

        for location in &outcome.released_locations {
            if let Err(e) = self.storage.delete(location).await {
                warn!(location = %location, error = %e, "Failed to release file content");
            }
        }
        Ok(())
    }

    /// Everything in the caller's trash, regardless of parent.
    pub async fn list_trashed(&self, ctx: &RequestContext) -> AppResult<Contents> {
        Ok(Contents {
            folders: self.store.list_folders(ctx.user_id, true, ParentFilter::Any).await?,
            files: self.store.list_files(ctx.user_id, true, ParentFilter::Any).await?,
        })
    }

    /// Lifecycle state of an entity the caller owns.
    async fn current_state(
        &self,
        ctx: &RequestContext,
        kind: EntityKind,
        id: Uuid,
    ) -> AppResult<LifecycleState> {
        match kind {
            EntityKind::Folder => self.store.find_folder(ctx.user_id, id).await?.map(|f| f.state()),
            EntityKind::File => self.store.find_file(ctx.user_id, id).await?.map(|f| f.state()),
        }
        .ok_or_else(|| not_found(kind))
    }

    async fn transition(
        &self,
        ctx: &RequestContext,
        kind: EntityKind,
        unit: UnitOfWork,
    ) -> AppResult<Entity> {
        self.store
            .apply(unit)
            .await?
            .target
            .filter(|entity| entity.owner_id() == ctx.user_id)
            .ok_or_else(|| not_found(kind))
    }
}

fn not_found(kind: EntityKind) -> AppError {
    match kind {
        EntityKind::Folder => AppError::not_found("Folder not found"),
        EntityKind::File => AppError::not_found("File not found"),
    }
}
