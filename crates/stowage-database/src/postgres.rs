//! PostgreSQL-backed [`EntityStore`].

use async_trait::async_trait;
use sqlx::{PgConnection, Postgres, QueryBuilder};
use tracing::debug;
use uuid::Uuid;

use stowage_core::error::{AppError, ErrorKind};
use stowage_core::result::AppResult;
use stowage_entity::{
    Action, CreateFile, CreateFolder, CreateUser, Entity, EntityKind, File, Folder,
    LifecycleState, ParentFilter, Selector, Step, UnitOfWork, UnitOfWorkOutcome, User,
};

use crate::connection::DatabasePool;
use crate::repositories::{FileRepository, FolderRepository, UserRepository};
use crate::store::EntityStore;

/// Entity store over a PostgreSQL pool.
#[derive(Debug, Clone)]
pub struct PgEntityStore {
    db: DatabasePool,
    users: UserRepository,
    folders: FolderRepository,
    files: FileRepository,
}

impl PgEntityStore {
    pub fn new(db: DatabasePool) -> Self {
        let pool = db.pool().clone();
        Self {
            users: UserRepository::new(pool.clone()),
            folders: FolderRepository::new(pool.clone()),
            files: FileRepository::new(pool),
            db,
        }
    }
}

#[async_trait]
impl EntityStore for PgEntityStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn health_check(&self) -> AppResult<bool> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(self.db.pool())
            .await
            .map(|v| v == 1)
            .map_err(|e| {
                AppError::with_source(ErrorKind::StoreUnavailable, "Health check failed", e)
            })
    }

    async fn insert_user(&self, data: &CreateUser) -> AppResult<User> {
        self.users.create(data).await
    }

    async fn find_user(&self, id: Uuid) -> AppResult<Option<User>> {
        self.users.find_by_id(id).await
    }

    async fn find_user_by_external_id(&self, external_id: &str) -> AppResult<Option<User>> {
        self.users.find_by_external_id(external_id).await
    }

    async fn insert_folder(&self, data: &CreateFolder) -> AppResult<Folder> {
        self.folders.create(data).await
    }

    async fn find_folder(&self, owner_id: Uuid, id: Uuid) -> AppResult<Option<Folder>> {
        self.folders.find_owned(owner_id, id).await
    }

    async fn list_folders(
        &self,
        owner_id: Uuid,
        trashed: bool,
        parent: ParentFilter,
    ) -> AppResult<Vec<Folder>> {
        self.folders.list(owner_id, trashed, parent).await
    }

    async fn search_folders(
        &self,
        owner_id: Uuid,
        query: &str,
        parent: Option<Uuid>,
        limit: u32,
    ) -> AppResult<Vec<Folder>> {
        self.folders.search(owner_id, query, parent, limit).await
    }

    async fn folder_ancestors(&self, owner_id: Uuid, id: Uuid) -> AppResult<Vec<Uuid>> {
        self.folders.ancestors(owner_id, id).await
    }

    async fn insert_file(&self, data: &CreateFile) -> AppResult<File> {
        self.files.create(data).await
    }

    async fn find_file(&self, owner_id: Uuid, id: Uuid) -> AppResult<Option<File>> {
        self.files.find_owned(owner_id, id).await
    }

    async fn find_file_by_share_token(&self, token: &str) -> AppResult<Option<File>> {
        self.files.find_by_share_token(token).await
    }

    async fn list_files(
        &self,
        owner_id: Uuid,
        trashed: bool,
        parent: ParentFilter,
    ) -> AppResult<Vec<File>> {
        self.files.list(owner_id, trashed, parent).await
    }

    async fn search_files(
        &self,
        owner_id: Uuid,
        query: &str,
        parent: Option<Uuid>,
        limit: u32,
    ) -> AppResult<Vec<File>> {
        self.files.search(owner_id, query, parent, limit).await
    }

    async fn assign_share_token(
        &self,
        owner_id: Uuid,
        id: Uuid,
        token: &str,
    ) -> AppResult<Option<File>> {
        self.files.assign_share_token(owner_id, id, token).await
    }

    async fn rename(
        &self,
        owner_id: Uuid,
        kind: EntityKind,
        id: Uuid,
        name: &str,
    ) -> AppResult<Option<Entity>> {
        Ok(match kind {
            EntityKind::Folder => self.folders.rename(owner_id, id, name).await?.map(Entity::from),
            EntityKind::File => self.files.rename(owner_id, id, name).await?.map(Entity::from),
        })
    }

    async fn set_parent(
        &self,
        owner_id: Uuid,
        kind: EntityKind,
        id: Uuid,
        parent_id: Option<Uuid>,
    ) -> AppResult<Option<Entity>> {
        Ok(match kind {
            EntityKind::Folder => self
                .folders
                .set_parent(owner_id, id, parent_id)
                .await?
                .map(Entity::from),
            EntityKind::File => self
                .files
                .set_parent(owner_id, id, parent_id)
                .await?
                .map(Entity::from),
        })
    }

    async fn apply(&self, unit: UnitOfWork) -> AppResult<UnitOfWorkOutcome> {
        let mut tx = self.db.pool().begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::StoreUnavailable, "Failed to begin transaction", e)
        })?;

        let mut outcome = UnitOfWorkOutcome::default();
        for (index, step) in unit.steps.iter().enumerate() {
            let affected = run_step(&mut *tx, unit.owner_id, step, &mut outcome).await?;
            debug!(unit = unit.label, step = index, affected, "Applied unit-of-work step");
            if step.required && affected == 0 {
                // Dropping the transaction rolls it back.
                return Err(AppError::not_found(format!(
                    "{} not found",
                    capitalized(step.selector.kind())
                )));
            }
            outcome.affected.push(affected);
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::StoreUnavailable, "Failed to commit transaction", e)
        })?;
        Ok(outcome)
    }
}

fn capitalized(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Folder => "Folder",
        EntityKind::File => "File",
    }
}

/// The statement for `step` without any `RETURNING` clause.
fn step_query(owner_id: Uuid, step: &Step) -> QueryBuilder<'static, Postgres> {
    let table = step.selector.kind().table();
    let mut qb = match step.action {
        Action::SetTrashed(trashed) => {
            let mut qb = QueryBuilder::<Postgres>::new(format!(
                "UPDATE {table} SET updated_at = NOW(), trashed = "
            ));
            qb.push_bind(trashed);
            qb
        }
        Action::Delete => QueryBuilder::<Postgres>::new(format!("DELETE FROM {table}")),
    };
    push_conditions(&mut qb, owner_id, step);
    qb
}

/// Push the owner, selector and guard conditions of `step`.
fn push_conditions(qb: &mut QueryBuilder<'_, Postgres>, owner_id: Uuid, step: &Step) {
    qb.push(" WHERE owner_id = ").push_bind(owner_id);
    match &step.selector {
        Selector::One { id, .. } => {
            qb.push(" AND id = ").push_bind(*id);
        }
        Selector::Children { parent, .. } => {
            qb.push(" AND parent_id = ").push_bind(*parent);
        }
        Selector::Ids { ids, .. } => {
            qb.push(" AND id = ANY(").push_bind(ids.clone()).push(")");
        }
        Selector::All { .. } => {}
    }
    if let Some(state) = step.guard {
        qb.push(" AND trashed = ").push_bind(state == LifecycleState::Trashed);
    }
}

/// Execute one step inside the open transaction and return the row count.
async fn run_step(
    conn: &mut PgConnection,
    owner_id: Uuid,
    step: &Step,
    outcome: &mut UnitOfWorkOutcome,
) -> AppResult<u64> {
    let kind = step.selector.kind();
    let mut qb = step_query(owner_id, step);

    let store_err =
        |e: sqlx::Error| AppError::with_source(ErrorKind::StoreUnavailable, "Unit of work failed", e);

    // The first `One` step reports the record it touched.
    if matches!(step.selector, Selector::One { .. }) && outcome.target.is_none() {
        qb.push(" RETURNING *");
        let entity = match kind {
            EntityKind::Folder => qb
                .build_query_as::<Folder>()
                .fetch_optional(&mut *conn)
                .await
                .map_err(store_err)?
                .map(Entity::from),
            EntityKind::File => qb
                .build_query_as::<File>()
                .fetch_optional(&mut *conn)
                .await
                .map_err(store_err)?
                .map(Entity::from),
        };
        let Some(entity) = entity else {
            return Ok(0);
        };
        if let (Action::Delete, Entity::File(file)) = (step.action, &entity) {
            outcome.released_locations.push(file.location.clone());
        }
        outcome.target = Some(entity);
        return Ok(1);
    }

    if step.action == Action::Delete && kind == EntityKind::File {
        qb.push(" RETURNING location");
        let locations = qb
            .build_query_scalar::<String>()
            .fetch_all(&mut *conn)
            .await
            .map_err(store_err)?;
        let affected = locations.len() as u64;
        outcome.released_locations.extend(locations);
        return Ok(affected);
    }

    let result = qb.build().execute(&mut *conn).await.map_err(store_err)?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sql_of(step: &Step) -> String {
        step_query(Uuid::new_v4(), step).sql().to_string()
    }

    #[test]
    fn test_one_selector_targets_a_single_id() {
        let unit = UnitOfWork::trash(Uuid::new_v4(), EntityKind::File, Uuid::new_v4());
        assert_eq!(
            sql_of(&unit.steps[0]),
            "UPDATE files SET updated_at = NOW(), trashed = $1 WHERE owner_id = $2 AND id = $3"
        );
    }

    #[test]
    fn test_children_selector_applies_the_guard() {
        let unit = UnitOfWork::trash(Uuid::new_v4(), EntityKind::Folder, Uuid::new_v4());
        assert_eq!(
            sql_of(&unit.steps[1]),
            "UPDATE folders SET updated_at = NOW(), trashed = $1 \
             WHERE owner_id = $2 AND parent_id = $3 AND trashed = $4"
        );
        assert_eq!(
            sql_of(&unit.steps[2]),
            "UPDATE files SET updated_at = NOW(), trashed = $1 \
             WHERE owner_id = $2 AND parent_id = $3 AND trashed = $4"
        );
    }

    #[test]
    fn test_purge_deletes_only_trashed_records() {
        let unit = UnitOfWork::purge(Uuid::new_v4(), EntityKind::Folder, Uuid::new_v4());
        let sql: Vec<String> = unit.steps.iter().map(sql_of).collect();
        assert_eq!(
            sql,
            vec![
                "DELETE FROM files WHERE owner_id = $1 AND parent_id = $2 AND trashed = $3",
                "DELETE FROM folders WHERE owner_id = $1 AND parent_id = $2 AND trashed = $3",
                "DELETE FROM folders WHERE owner_id = $1 AND id = $2 AND trashed = $3",
            ]
        );
    }

    #[test]
    fn test_ids_selector_binds_an_array() {
        let unit = UnitOfWork::restore_many(Uuid::new_v4(), vec![Uuid::new_v4()], vec![]);
        assert_eq!(
            sql_of(&unit.steps[0]),
            "UPDATE files SET updated_at = NOW(), trashed = $1 \
             WHERE owner_id = $2 AND id = ANY($3) AND trashed = $4"
        );
    }

    #[test]
    fn test_all_selector_is_scoped_to_the_owner() {
        let unguarded = Step::new(Selector::All { kind: EntityKind::File }, Action::Delete);
        assert_eq!(sql_of(&unguarded), "DELETE FROM files WHERE owner_id = $1");

        let unit = UnitOfWork::restore_all(Uuid::new_v4());
        assert_eq!(
            sql_of(&unit.steps[0]),
            "UPDATE folders SET updated_at = NOW(), trashed = $1 WHERE owner_id = $2 AND trashed = $3"
        );
    }
}
