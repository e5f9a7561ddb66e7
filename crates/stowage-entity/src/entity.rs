//! Kind-agnostic views over folders and files.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use stowage_core::error::AppError;

use crate::file::File;
use crate::folder::Folder;
use crate::lifecycle::LifecycleState;

/// Which collection an entity lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// A file record.
    File,
    /// A folder record.
    Folder,
}

impl EntityKind {
    /// Lowercase name used on the wire and in log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Folder => "folder",
        }
    }

    /// Name of the table holding this kind.
    pub fn table(&self) -> &'static str {
        match self {
            Self::File => "files",
            Self::Folder => "folders",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "file" => Ok(Self::File),
            "folder" => Ok(Self::Folder),
            other => Err(AppError::validation(format!(
                "Invalid type '{other}': expected 'file' or 'folder'"
            ))),
        }
    }
}

/// Either a folder or a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Entity {
    /// A folder record.
    Folder(Folder),
    /// A file record.
    File(File),
}

impl Entity {
    /// The entity's id.
    pub fn id(&self) -> Uuid {
        match self {
            Self::Folder(f) => f.id,
            Self::File(f) => f.id,
        }
    }

    /// The entity's kind.
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Folder(_) => EntityKind::Folder,
            Self::File(_) => EntityKind::File,
        }
    }

    /// The entity's owner.
    pub fn owner_id(&self) -> Uuid {
        match self {
            Self::Folder(f) => f.owner_id,
            Self::File(f) => f.owner_id,
        }
    }

    /// The entity's display name.
    pub fn name(&self) -> &str {
        match self {
            Self::Folder(f) => &f.name,
            Self::File(f) => &f.name,
        }
    }

    /// The entity's parent folder, if any.
    pub fn parent_id(&self) -> Option<Uuid> {
        match self {
            Self::Folder(f) => f.parent_id,
            Self::File(f) => f.parent_id,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> LifecycleState {
        match self {
            Self::Folder(f) => f.state(),
            Self::File(f) => f.state(),
        }
    }

    /// Unwrap a folder, if this is one.
    pub fn into_folder(self) -> Option<Folder> {
        match self {
            Self::Folder(f) => Some(f),
            Self::File(_) => None,
        }
    }

    /// Unwrap a file, if this is one.
    pub fn into_file(self) -> Option<File> {
        match self {
            Self::File(f) => Some(f),
            Self::Folder(_) => None,
        }
    }
}

impl From<Folder> for Entity {
    fn from(folder: Folder) -> Self {
        Self::Folder(folder)
    }
}

impl From<File> for Entity {
    fn from(file: File) -> Self {
        Self::File(file)
    }
}

/// Restricts a listing by parent folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParentFilter {
    /// No parent restriction.
    #[default]
    Any,
    /// Only root-level entities (null parent).
    Root,
    /// Only direct children of the given folder.
    Folder(Uuid),
}

impl ParentFilter {
    /// Whether an entity with the given parent passes this filter.
    pub fn matches(&self, parent_id: Option<Uuid>) -> bool {
        match self {
            Self::Any => true,
            Self::Root => parent_id.is_none(),
            Self::Folder(id) => parent_id == Some(*id),
        }
    }
}

impl From<Option<Uuid>> for ParentFilter {
    fn from(parent: Option<Uuid>) -> Self {
        parent.map(Self::Folder).unwrap_or(Self::Any)
    }
}

/// Folders and files returned together by listings and searches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contents {
    /// Matching folders.
    pub folders: Vec<Folder>,
    /// Matching files.
    pub files: Vec<File>,
}

impl Contents {
    /// An empty result set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether both collections are empty.
    pub fn is_empty(&self) -> bool {
        self.folders.is_empty() && self.files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parse() {
        assert_eq!("file".parse::<EntityKind>().unwrap(), EntityKind::File);
        assert_eq!("folder".parse::<EntityKind>().unwrap(), EntityKind::Folder);
        let err = "Folder".parse::<EntityKind>().unwrap_err();
        assert_eq!(err.kind, stowage_core::error::ErrorKind::Validation);
    }

    #[test]
    fn test_parent_filter() {
        let parent = Uuid::new_v4();
        assert!(ParentFilter::Any.matches(None));
        assert!(ParentFilter::Any.matches(Some(parent)));
        assert!(ParentFilter::Root.matches(None));
        assert!(!ParentFilter::Root.matches(Some(parent)));
        assert!(ParentFilter::Folder(parent).matches(Some(parent)));
        assert!(!ParentFilter::Folder(parent).matches(Some(Uuid::new_v4())));
        assert!(!ParentFilter::Folder(parent).matches(None));
    }

    #[test]
    fn test_contents_serializes_both_keys() {
        let json = serde_json::to_value(Contents::empty()).expect("serialize");
        assert_eq!(json, serde_json::json!({ "folders": [], "files": [] }));
    }
}
