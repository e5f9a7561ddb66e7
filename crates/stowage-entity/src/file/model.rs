//! File entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::lifecycle::LifecycleState;

/// A file record. The bytes live in content storage at `location`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct File {
    /// Unique file identifier.
    pub id: Uuid,
    /// The file owner. Never changes after creation.
    pub owner_id: Uuid,
    /// The folder containing this file (null for root-level files).
    pub parent_id: Option<Uuid>,
    /// Display name (including extension).
    pub name: String,
    /// Opaque content storage reference.
    #[serde(skip_serializing, default)]
    pub location: String,
    /// MIME type of the content, if known.
    pub mime_type: Option<String>,
    /// Content size in bytes.
    pub size_bytes: i64,
    /// Public share token, present once a share link was requested.
    pub share_token: Option<String>,
    /// Soft-delete marker.
    pub trashed: bool,
    /// When the file was created.
    pub created_at: DateTime<Utc>,
    /// When the file was last updated.
    pub updated_at: DateTime<Utc>,
}

impl File {
    /// Get the file extension (lowercase), if any.
    pub fn extension(&self) -> Option<String> {
        self.name
            .rsplit('.')
            .next()
            .filter(|ext| *ext != self.name)
            .map(|ext| ext.to_lowercase())
    }

    /// Current lifecycle state.
    pub fn state(&self) -> LifecycleState {
        LifecycleState::from_trashed(self.trashed)
    }

    /// Whether a share link has been issued for this file.
    pub fn is_shared(&self) -> bool {
        self.share_token.is_some()
    }
}

/// Data required to create a new file record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFile {
    /// The file owner.
    pub owner_id: Uuid,
    /// The folder to place the file in (None for root-level).
    pub parent_id: Option<Uuid>,
    /// Display name.
    pub name: String,
    /// Content storage reference.
    pub location: String,
    /// MIME type.
    pub mime_type: Option<String>,
    /// Content size in bytes.
    pub size_bytes: i64,
}
