//! The persistence seam used by every service.

use async_trait::async_trait;
use uuid::Uuid;

use stowage_core::result::AppResult;
use stowage_entity::{
    CreateFile, CreateFolder, CreateUser, Entity, EntityKind, File, Folder, ParentFilter,
    UnitOfWork, UnitOfWorkOutcome, User,
};

/// Persistent collections of users, folders and files.
///
/// Every folder and file operation takes the owner id and filters on it;
/// a record owned by someone else is indistinguishable from a missing one.
/// Single-record updates return `None` when nothing matched.
#[async_trait]
pub trait EntityStore: Send + Sync + std::fmt::Debug + 'static {
    /// Short backend name for logs and health output.
    fn backend(&self) -> &'static str;

    /// Whether the store can serve requests.
    async fn health_check(&self) -> AppResult<bool>;

    // -- users --

    /// Insert a user. Duplicate external id or email is a `Conflict`.
    async fn insert_user(&self, data: &CreateUser) -> AppResult<User>;

    async fn find_user(&self, id: Uuid) -> AppResult<Option<User>>;

    async fn find_user_by_external_id(&self, external_id: &str) -> AppResult<Option<User>>;

    // -- folders --

    async fn insert_folder(&self, data: &CreateFolder) -> AppResult<Folder>;

    /// Find a folder in any lifecycle state.
    async fn find_folder(&self, owner_id: Uuid, id: Uuid) -> AppResult<Option<Folder>>;

    /// Folders in the given state, ordered by name.
    async fn list_folders(
        &self,
        owner_id: Uuid,
        trashed: bool,
        parent: ParentFilter,
    ) -> AppResult<Vec<Folder>>;

    /// Active folders whose name contains `query` ignoring case, newest first.
    async fn search_folders(
        &self,
        owner_id: Uuid,
        query: &str,
        parent: Option<Uuid>,
        limit: u32,
    ) -> AppResult<Vec<Folder>>;

    /// Ids from `id` up to its root folder, `id` first. Empty when `id` is
    /// not an owned folder.
    async fn folder_ancestors(&self, owner_id: Uuid, id: Uuid) -> AppResult<Vec<Uuid>>;

    // -- files --

    async fn insert_file(&self, data: &CreateFile) -> AppResult<File>;

    /// Find a file in any lifecycle state.
    async fn find_file(&self, owner_id: Uuid, id: Uuid) -> AppResult<Option<File>>;

    /// Find a file of any owner by share token.
    async fn find_file_by_share_token(&self, token: &str) -> AppResult<Option<File>>;

    /// Files in the given state, ordered by name.
    async fn list_files(
        &self,
        owner_id: Uuid,
        trashed: bool,
        parent: ParentFilter,
    ) -> AppResult<Vec<File>>;

    /// Active files whose name contains `query` ignoring case, newest first.
    async fn search_files(
        &self,
        owner_id: Uuid,
        query: &str,
        parent: Option<Uuid>,
        limit: u32,
    ) -> AppResult<Vec<File>>;

    /// Set the share token unless one is already present, in one atomic
    /// update. Returns the file with whichever token it ends up holding.
    async fn assign_share_token(
        &self,
        owner_id: Uuid,
        id: Uuid,
        token: &str,
    ) -> AppResult<Option<File>>;

    // -- either kind --

    async fn rename(
        &self,
        owner_id: Uuid,
        kind: EntityKind,
        id: Uuid,
        name: &str,
    ) -> AppResult<Option<Entity>>;

    async fn set_parent(
        &self,
        owner_id: Uuid,
        kind: EntityKind,
        id: Uuid,
        parent_id: Option<Uuid>,
    ) -> AppResult<Option<Entity>>;

    /// Apply every step of `unit` atomically, in order.
    ///
    /// A required step matching nothing fails the unit with `NotFound` and
    /// leaves the store unchanged.
    async fn apply(&self, unit: UnitOfWork) -> AppResult<UnitOfWorkOutcome>;
}

/// Build an `ILIKE` pattern matching `query` as a literal substring.
pub fn like_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
