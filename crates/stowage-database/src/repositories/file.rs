//! File repository.

use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use stowage_core::error::{AppError, ErrorKind};
use stowage_core::result::AppResult;
use stowage_entity::{CreateFile, File, ParentFilter};

use super::{map_write_error, push_parent_filter};
use crate::store::like_pattern;

#[derive(Debug, Clone)]
pub struct FileRepository {
    pool: PgPool,
}

impl FileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find an owned file by id.
    pub async fn find_owned(&self, owner_id: Uuid, id: Uuid) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>("SELECT * FROM files WHERE owner_id = $1 AND id = $2")
            .bind(owner_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::StoreUnavailable, "Failed to find file", e))
    }

    /// Find a file by its share token.
    pub async fn find_by_share_token(&self, token: &str) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>("SELECT * FROM files WHERE share_token = $1")
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::StoreUnavailable,
                    "Failed to find file by share token",
                    e,
                )
            })
    }

    /// List files by lifecycle state and parent.
    pub async fn list(
        &self,
        owner_id: Uuid,
        trashed: bool,
        parent: ParentFilter,
    ) -> AppResult<Vec<File>> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM files WHERE owner_id = ");
        qb.push_bind(owner_id).push(" AND trashed = ").push_bind(trashed);
        push_parent_filter(&mut qb, parent);
        qb.push(" ORDER BY name ASC, id ASC");

        qb.build_query_as::<File>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::StoreUnavailable, "Failed to list files", e))
    }

    /// Case-insensitive substring search over active files.
    pub async fn search(
        &self,
        owner_id: Uuid,
        query: &str,
        parent: Option<Uuid>,
        limit: u32,
    ) -> AppResult<Vec<File>> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM files WHERE owner_id = ");
        qb.push_bind(owner_id)
            .push(" AND trashed = FALSE AND name ILIKE ")
            .push_bind(like_pattern(query));
        if let Some(parent_id) = parent {
            qb.push(" AND parent_id = ").push_bind(parent_id);
        }
        qb.push(" ORDER BY created_at DESC, id DESC LIMIT ")
            .push_bind(i64::from(limit));

        qb.build_query_as::<File>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::StoreUnavailable, "Failed to search files", e)
            })
    }

    /// Insert a new file record.
    pub async fn create(&self, data: &CreateFile) -> AppResult<File> {
        sqlx::query_as::<_, File>(
            "INSERT INTO files (owner_id, parent_id, name, location, mime_type, size_bytes) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(data.owner_id)
        .bind(data.parent_id)
        .bind(&data.name)
        .bind(&data.location)
        .bind(&data.mime_type)
        .bind(data.size_bytes)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error("Failed to create file"))
    }

    /// Keep an existing share token or store `token`.
    pub async fn assign_share_token(
        &self,
        owner_id: Uuid,
        id: Uuid,
        token: &str,
    ) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>(
            "UPDATE files SET share_token = COALESCE(share_token, $3), \
             updated_at = CASE WHEN share_token IS NULL THEN NOW() ELSE updated_at END \
             WHERE owner_id = $1 AND id = $2 RETURNING *",
        )
        .bind(owner_id)
        .bind(id)
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("files_share_token_key") =>
            {
                AppError::conflict("Share token collision")
            }
            _ => AppError::with_source(
                ErrorKind::StoreUnavailable,
                "Failed to assign share token",
                e,
            ),
        })
    }

    /// Rename an owned file.
    pub async fn rename(&self, owner_id: Uuid, id: Uuid, name: &str) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>(
            "UPDATE files SET name = $3, updated_at = NOW() \
             WHERE owner_id = $1 AND id = $2 RETURNING *",
        )
        .bind(owner_id)
        .bind(id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::StoreUnavailable, "Failed to rename file", e))
    }

    /// Move an owned file into another folder or the root.
    pub async fn set_parent(
        &self,
        owner_id: Uuid,
        id: Uuid,
        parent_id: Option<Uuid>,
    ) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>(
            "UPDATE files SET parent_id = $3, updated_at = NOW() \
             WHERE owner_id = $1 AND id = $2 RETURNING *",
        )
        .bind(owner_id)
        .bind(id)
        .bind(parent_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error("Failed to move file"))
    }
}
