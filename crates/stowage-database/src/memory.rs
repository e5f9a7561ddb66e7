//! Process-local [`EntityStore`].
//!
//! All records live in one [`Snapshot`] behind a tokio `RwLock`. Writes take
//! the write lock; a unit of work runs against a clone of the snapshot and
//! replaces the original only when every step succeeded, which gives the
//! same all-or-nothing behavior as a database transaction.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use stowage_core::error::AppError;
use stowage_core::result::AppResult;
use stowage_entity::{
    Action, CreateFile, CreateFolder, CreateUser, Entity, EntityKind, File, Folder,
    ParentFilter, Selector, Step, UnitOfWork, UnitOfWorkOutcome, User,
};

use crate::store::EntityStore;

#[derive(Debug, Clone, Default)]
struct Snapshot {
    users: HashMap<Uuid, User>,
    folders: HashMap<Uuid, Folder>,
    files: HashMap<Uuid, File>,
    clock: Option<DateTime<Utc>>,
}

impl Snapshot {
    /// Wall-clock time, forced strictly increasing so that ordering by
    /// creation time is total.
    fn tick(&mut self) -> DateTime<Utc> {
        let mut now = Utc::now();
        if let Some(last) = self.clock.filter(|last| now <= *last) {
            now = last + Duration::microseconds(1);
        }
        self.clock = Some(now);
        now
    }

    fn parent_exists(&self, parent_id: Option<Uuid>) -> AppResult<()> {
        match parent_id {
            Some(id) if !self.folders.contains_key(&id) => {
                Err(AppError::not_found("Parent folder not found"))
            }
            _ => Ok(()),
        }
    }

    /// Ids of the records `step` selects.
    fn select(&self, owner_id: Uuid, step: &Step) -> Vec<Uuid> {
        let hit = |id: Uuid, parent_id: Option<Uuid>| match &step.selector {
            Selector::One { id: wanted, .. } => id == *wanted,
            Selector::Children { parent, .. } => parent_id == Some(*parent),
            Selector::Ids { ids, .. } => ids.contains(&id),
            Selector::All { .. } => true,
        };
        match step.selector.kind() {
            EntityKind::Folder => self
                .folders
                .values()
                .filter(|f| f.owner_id == owner_id && hit(f.id, f.parent_id))
                .filter(|f| step.admits(f.state()))
                .map(|f| f.id)
                .collect(),
            EntityKind::File => self
                .files
                .values()
                .filter(|f| f.owner_id == owner_id && hit(f.id, f.parent_id))
                .filter(|f| step.admits(f.state()))
                .map(|f| f.id)
                .collect(),
        }
    }

    /// Remove a folder and detach its children.
    fn delete_folder(&mut self, id: Uuid) -> Option<Folder> {
        let folder = self.folders.remove(&id)?;
        for child in self.folders.values_mut().filter(|f| f.parent_id == Some(id)) {
            child.parent_id = None;
        }
        for child in self.files.values_mut().filter(|f| f.parent_id == Some(id)) {
            child.parent_id = None;
        }
        Some(folder)
    }

    fn run_step(
        &mut self,
        owner_id: Uuid,
        step: &Step,
        now: DateTime<Utc>,
        outcome: &mut UnitOfWorkOutcome,
    ) -> u64 {
        let ids = self.select(owner_id, step);
        let reports = matches!(step.selector, Selector::One { .. }) && outcome.target.is_none();
        let mut touched = None;

        for id in &ids {
            let entity = match (step.selector.kind(), step.action) {
                (EntityKind::Folder, Action::SetTrashed(trashed)) => {
                    self.folders.get_mut(id).map(|folder| {
                        folder.trashed = trashed;
                        folder.updated_at = now;
                        Entity::Folder(folder.clone())
                    })
                }
                (EntityKind::File, Action::SetTrashed(trashed)) => {
                    self.files.get_mut(id).map(|file| {
                        file.trashed = trashed;
                        file.updated_at = now;
                        Entity::File(file.clone())
                    })
                }
                (EntityKind::Folder, Action::Delete) => self.delete_folder(*id).map(Entity::Folder),
                (EntityKind::File, Action::Delete) => self.files.remove(id).map(|file| {
                    outcome.released_locations.push(file.location.clone());
                    Entity::File(file)
                }),
            };
            touched = entity.or(touched);
        }

        if reports {
            outcome.target = touched;
        }
        ids.len() as u64
    }
}

/// In-memory entity store.
#[derive(Debug, Default)]
pub struct MemoryEntityStore {
    state: RwLock<Snapshot>,
}

impl MemoryEntityStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn sorted_by_name<T>(mut items: Vec<T>, key: impl Fn(&T) -> (&str, Uuid)) -> Vec<T> {
    items.sort_by(|a, b| key(a).cmp(&key(b)));
    items
}

fn newest_first<T>(
    mut items: Vec<T>,
    key: impl Fn(&T) -> (DateTime<Utc>, Uuid),
    limit: u32,
) -> Vec<T> {
    items.sort_by(|a, b| key(b).cmp(&key(a)));
    items.truncate(limit as usize);
    items
}

fn name_contains(name: &str, needle: &str) -> bool {
    name.to_lowercase().contains(needle)
}

#[async_trait]
impl EntityStore for MemoryEntityStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn insert_user(&self, data: &CreateUser) -> AppResult<User> {
        let mut state = self.state.write().await;
        if state.users.values().any(|u| u.external_id == data.external_id) {
            return Err(AppError::conflict("User is already registered"));
        }
        if state.users.values().any(|u| u.email == data.email) {
            return Err(AppError::conflict(format!(
                "Email '{}' is already in use",
                data.email
            )));
        }
        let now = state.tick();
        let user = User {
            id: Uuid::new_v4(),
            external_id: data.external_id.clone(),
            name: data.name.clone(),
            email: data.email.clone(),
            created_at: now,
            updated_at: now,
        };
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_external_id(&self, external_id: &str) -> AppResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .find(|u| u.external_id == external_id)
            .cloned())
    }

    async fn insert_folder(&self, data: &CreateFolder) -> AppResult<Folder> {
        let mut state = self.state.write().await;
        state.parent_exists(data.parent_id)?;
        let now = state.tick();
        let folder = Folder {
            id: Uuid::new_v4(),
            owner_id: data.owner_id,
            parent_id: data.parent_id,
            name: data.name.clone(),
            trashed: false,
            created_at: now,
            updated_at: now,
        };
        state.folders.insert(folder.id, folder.clone());
        Ok(folder)
    }

    async fn find_folder(&self, owner_id: Uuid, id: Uuid) -> AppResult<Option<Folder>> {
        let state = self.state.read().await;
        Ok(state
            .folders
            .get(&id)
            .filter(|f| f.owner_id == owner_id)
            .cloned())
    }

    async fn list_folders(
        &self,
        owner_id: Uuid,
        trashed: bool,
        parent: ParentFilter,
    ) -> AppResult<Vec<Folder>> {
        let state = self.state.read().await;
        let folders = state
            .folders
            .values()
            .filter(|f| f.owner_id == owner_id && f.trashed == trashed)
            .filter(|f| parent.matches(f.parent_id))
            .cloned()
            .collect();
        Ok(sorted_by_name(folders, |f| (f.name.as_str(), f.id)))
    }

    async fn search_folders(
        &self,
        owner_id: Uuid,
        query: &str,
        parent: Option<Uuid>,
        limit: u32,
    ) -> AppResult<Vec<Folder>> {
        let needle = query.to_lowercase();
        let parent = ParentFilter::from(parent);
        let state = self.state.read().await;
        let folders = state
            .folders
            .values()
            .filter(|f| f.owner_id == owner_id && !f.trashed)
            .filter(|f| parent.matches(f.parent_id) && name_contains(&f.name, &needle))
            .cloned()
            .collect();
        Ok(newest_first(folders, |f| (f.created_at, f.id), limit))
    }

    async fn folder_ancestors(&self, owner_id: Uuid, id: Uuid) -> AppResult<Vec<Uuid>> {
        let state = self.state.read().await;
        let mut chain = Vec::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let Some(folder) = state.folders.get(&current).filter(|f| f.owner_id == owner_id)
            else {
                break;
            };
            if chain.contains(&folder.id) {
                break;
            }
            chain.push(folder.id);
            cursor = folder.parent_id;
        }
        Ok(chain)
    }

    async fn insert_file(&self, data: &CreateFile) -> AppResult<File> {
        let mut state = self.state.write().await;
        state.parent_exists(data.parent_id)?;
        let now = state.tick();
        let file = File {
            id: Uuid::new_v4(),
            owner_id: data.owner_id,
            parent_id: data.parent_id,
            name: data.name.clone(),
            location: data.location.clone(),
            mime_type: data.mime_type.clone(),
            size_bytes: data.size_bytes,
            share_token: None,
            trashed: false,
            created_at: now,
            updated_at: now,
        };
        state.files.insert(file.id, file.clone());
        Ok(file)
    }

    async fn find_file(&self, owner_id: Uuid, id: Uuid) -> AppResult<Option<File>> {
        let state = self.state.read().await;
        Ok(state
            .files
            .get(&id)
            .filter(|f| f.owner_id == owner_id)
            .cloned())
    }

    async fn find_file_by_share_token(&self, token: &str) -> AppResult<Option<File>> {
        let state = self.state.read().await;
        Ok(state
            .files
            .values()
            .find(|f| f.share_token.as_deref() == Some(token))
            .cloned())
    }

    async fn list_files(
        &self,
        owner_id: Uuid,
        trashed: bool,
        parent: ParentFilter,
    ) -> AppResult<Vec<File>> {
        let state = self.state.read().await;
        let files = state
            .files
            .values()
            .filter(|f| f.owner_id == owner_id && f.trashed == trashed)
            .filter(|f| parent.matches(f.parent_id))
            .cloned()
            .collect();
        Ok(sorted_by_name(files, |f| (f.name.as_str(), f.id)))
    }

    async fn search_files(
        &self,
        owner_id: Uuid,
        query: &str,
        parent: Option<Uuid>,
        limit: u32,
    ) -> AppResult<Vec<File>> {
        let needle = query.to_lowercase();
        let parent = ParentFilter::from(parent);
        let state = self.state.read().await;
        let files = state
            .files
            .values()
            .filter(|f| f.owner_id == owner_id && !f.trashed)
            .filter(|f| parent.matches(f.parent_id) && name_contains(&f.name, &needle))
            .cloned()
            .collect();
        Ok(newest_first(files, |f| (f.created_at, f.id), limit))
    }

    async fn assign_share_token(
        &self,
        owner_id: Uuid,
        id: Uuid,
        token: &str,
    ) -> AppResult<Option<File>> {
        let mut state = self.state.write().await;
        let owned = state.files.get(&id).is_some_and(|f| f.owner_id == owner_id);
        if !owned {
            return Ok(None);
        }
        let taken = state
            .files
            .values()
            .any(|f| f.id != id && f.share_token.as_deref() == Some(token));
        let now = state.tick();
        let Some(file) = state.files.get_mut(&id) else {
            return Ok(None);
        };
        if file.share_token.is_none() {
            if taken {
                return Err(AppError::conflict("Share token collision"));
            }
            file.share_token = Some(token.to_string());
            file.updated_at = now;
        }
        Ok(Some(file.clone()))
    }

    async fn rename(
        &self,
        owner_id: Uuid,
        kind: EntityKind,
        id: Uuid,
        name: &str,
    ) -> AppResult<Option<Entity>> {
        let mut state = self.state.write().await;
        let now = state.tick();
        Ok(match kind {
            EntityKind::Folder => state
                .folders
                .get_mut(&id)
                .filter(|f| f.owner_id == owner_id)
                .map(|f| {
                    f.name = name.to_string();
                    f.updated_at = now;
                    Entity::Folder(f.clone())
                }),
            EntityKind::File => state
                .files
                .get_mut(&id)
                .filter(|f| f.owner_id == owner_id)
                .map(|f| {
                    f.name = name.to_string();
                    f.updated_at = now;
                    Entity::File(f.clone())
                }),
        })
    }

    async fn set_parent(
        &self,
        owner_id: Uuid,
        kind: EntityKind,
        id: Uuid,
        parent_id: Option<Uuid>,
    ) -> AppResult<Option<Entity>> {
        let mut state = self.state.write().await;
        state.parent_exists(parent_id)?;
        let now = state.tick();
        Ok(match kind {
            EntityKind::Folder => state
                .folders
                .get_mut(&id)
                .filter(|f| f.owner_id == owner_id)
                .map(|f| {
                    f.parent_id = parent_id;
                    f.updated_at = now;
                    Entity::Folder(f.clone())
                }),
            EntityKind::File => state
                .files
                .get_mut(&id)
                .filter(|f| f.owner_id == owner_id)
                .map(|f| {
                    f.parent_id = parent_id;
                    f.updated_at = now;
                    Entity::File(f.clone())
                }),
        })
    }

    async fn apply(&self, unit: UnitOfWork) -> AppResult<UnitOfWorkOutcome> {
        let mut state = self.state.write().await;
        let mut draft = state.clone();
        let now = draft.tick();
        let mut outcome = UnitOfWorkOutcome::default();

        for (index, step) in unit.steps.iter().enumerate() {
            let affected = draft.run_step(unit.owner_id, step, now, &mut outcome);
            debug!(unit = unit.label, step = index, affected, "Applied unit-of-work step");
            if step.required && affected == 0 {
                return Err(AppError::not_found(format!(
                    "{} not found",
                    match step.selector.kind() {
                        EntityKind::Folder => "Folder",
                        EntityKind::File => "File",
                    }
                )));
            }
            outcome.affected.push(affected);
        }

        *state = draft;
        Ok(outcome)
    }
}
