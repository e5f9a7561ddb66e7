//! Folder repository.

use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use stowage_core::error::{AppError, ErrorKind};
use stowage_core::result::AppResult;
use stowage_entity::{CreateFolder, Folder, ParentFilter};

use super::{map_write_error, push_parent_filter};
use crate::store::like_pattern;

/// Upper bound on the ancestor walk, far above any real tree depth.
const MAX_DEPTH: i32 = 4096;

#[derive(Debug, Clone)]
pub struct FolderRepository {
    pool: PgPool,
}

impl FolderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find an owned folder by id.
    pub async fn find_owned(&self, owner_id: Uuid, id: Uuid) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE owner_id = $1 AND id = $2")
            .bind(owner_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::StoreUnavailable, "Failed to find folder", e)
            })
    }

    /// List folders by lifecycle state and parent.
    pub async fn list(
        &self,
        owner_id: Uuid,
        trashed: bool,
        parent: ParentFilter,
    ) -> AppResult<Vec<Folder>> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM folders WHERE owner_id = ");
        qb.push_bind(owner_id).push(" AND trashed = ").push_bind(trashed);
        push_parent_filter(&mut qb, parent);
        qb.push(" ORDER BY name ASC, id ASC");

        qb.build_query_as::<Folder>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::StoreUnavailable, "Failed to list folders", e)
            })
    }

    /// Case-insensitive substring search over active folders.
    pub async fn search(
        &self,
        owner_id: Uuid,
        query: &str,
        parent: Option<Uuid>,
        limit: u32,
    ) -> AppResult<Vec<Folder>> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM folders WHERE owner_id = ");
        qb.push_bind(owner_id)
            .push(" AND trashed = FALSE AND name ILIKE ")
            .push_bind(like_pattern(query));
        if let Some(parent_id) = parent {
            qb.push(" AND parent_id = ").push_bind(parent_id);
        }
        qb.push(" ORDER BY created_at DESC, id DESC LIMIT ")
            .push_bind(i64::from(limit));

        qb.build_query_as::<Folder>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::StoreUnavailable, "Failed to search folders", e)
            })
    }

    /// Ancestor chain from `id` to the root, `id` first.
    pub async fn ancestors(&self, owner_id: Uuid, id: Uuid) -> AppResult<Vec<Uuid>> {
        sqlx::query_scalar::<_, Uuid>(
            "WITH RECURSIVE chain AS ( \
                SELECT id, parent_id, 0 AS depth FROM folders WHERE owner_id = $1 AND id = $2 \
                UNION ALL \
                SELECT f.id, f.parent_id, c.depth + 1 FROM folders f \
                INNER JOIN chain c ON f.id = c.parent_id \
                WHERE f.owner_id = $1 AND c.depth < $3 \
             ) SELECT id FROM chain ORDER BY depth ASC",
        )
        .bind(owner_id)
        .bind(id)
        .bind(MAX_DEPTH)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::StoreUnavailable, "Failed to find ancestors", e)
        })
    }

    /// Insert a new folder.
    pub async fn create(&self, data: &CreateFolder) -> AppResult<Folder> {
        sqlx::query_as::<_, Folder>(
            "INSERT INTO folders (owner_id, parent_id, name) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(data.owner_id)
        .bind(data.parent_id)
        .bind(&data.name)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error("Failed to create folder"))
    }

    /// Rename an owned folder.
    pub async fn rename(&self, owner_id: Uuid, id: Uuid, name: &str) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>(
            "UPDATE folders SET name = $3, updated_at = NOW() \
             WHERE owner_id = $1 AND id = $2 RETURNING *",
        )
        .bind(owner_id)
        .bind(id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::StoreUnavailable, "Failed to rename folder", e))
    }

    /// Move an owned folder under a new parent.
    pub async fn set_parent(
        &self,
        owner_id: Uuid,
        id: Uuid,
        parent_id: Option<Uuid>,
    ) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>(
            "UPDATE folders SET parent_id = $3, updated_at = NOW() \
             WHERE owner_id = $1 AND id = $2 RETURNING *",
        )
        .bind(owner_id)
        .bind(id)
        .bind(parent_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error("Failed to move folder"))
    }
}
