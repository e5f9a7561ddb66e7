//! Soft-delete lifecycle of folders and files.
//!
//! ```text
//!   Active --trash--> Trashed --purge--> (record removed)
//!     ^                  |
//!     +-----restore------+
//! ```
//!
//! `trash` on a trashed entity and `restore` on an active one are no-ops.
//! There is no edge from `Active` straight to removal.

use serde::{Deserialize, Serialize};

use stowage_core::error::AppError;

/// Stored lifecycle state of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    /// Visible in normal listings.
    Active,
    /// Soft-deleted; recoverable.
    Trashed,
}

/// A requested lifecycle change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    /// Move to the trash.
    Trash,
    /// Bring back from the trash.
    Restore,
    /// Remove the record permanently.
    Purge,
}

impl LifecycleState {
    /// Map the stored `trashed` flag to a state.
    pub fn from_trashed(trashed: bool) -> Self {
        if trashed { Self::Trashed } else { Self::Active }
    }

    /// Apply a transition. `Ok(None)` means the record ceases to exist.
    pub fn apply(self, transition: Transition) -> Result<Option<Self>, AppError> {
        match (self, transition) {
            (_, Transition::Trash) => Ok(Some(Self::Trashed)),
            (_, Transition::Restore) => Ok(Some(Self::Active)),
            (Self::Trashed, Transition::Purge) => Ok(None),
            (Self::Active, Transition::Purge) => Err(AppError::invalid_state(
                "Item must be in the trash before it can be permanently deleted",
            )),
        }
    }
}
