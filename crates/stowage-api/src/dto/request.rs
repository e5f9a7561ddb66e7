//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use stowage_entity::EntityKind;

/// Create folder request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateFolderRequest {
    /// Folder name.
    #[validate(length(min = 1, max = 255, message = "Folder name is required"))]
    pub name: String,
    /// Parent folder; omitted or null for the root.
    #[serde(default)]
    pub parent: Option<Uuid>,
}

/// Rename request for files and folders.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RenameRequest {
    /// New name.
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,
}

/// Move request for files and folders.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MoveRequest {
    /// Destination folder; omitted or null for the root.
    #[serde(default)]
    pub parent: Option<Uuid>,
}

/// Names the kind of entity a trash operation targets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityTypeRequest {
    /// `file` or `folder`.
    #[serde(rename = "type")]
    pub kind: EntityKind,
}

/// Restore-many request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RestoreManyRequest {
    #[serde(default)]
    pub files: Vec<Uuid>,
    #[serde(default)]
    pub folders: Vec<Uuid>,
}

/// User registration request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    /// Subject identifier assigned by the identity provider.
    #[validate(length(min = 1, max = 255, message = "External id is required"))]
    pub external_id: String,
}

/// Login request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "External id is required"))]
    pub external_id: String,
}

/// Query for `GET /folders` and `GET /drive`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParentQuery {
    /// Folder id or `root`.
    pub parent: Option<String>,
}

/// Query for `GET /files`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FolderQuery {
    /// Folder id or `root`.
    pub folder_id: Option<String>,
}

/// Query for `GET /search`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub query: String,
    /// Restrict matches to direct children of this folder.
    pub folder_id: Option<String>,
}
