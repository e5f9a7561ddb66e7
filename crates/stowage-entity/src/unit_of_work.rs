//! Multi-record mutations described as data.
//!
//! A [`UnitOfWork`] is an ordered list of owner-scoped [`Step`]s. Stores
//! apply every step of a unit atomically: either all of them take effect or
//! none do. A step marked `required` that matches no record aborts the unit
//! with `NotFound`.
//!
//! Folder cascades reach direct children only. Grandchildren keep their own
//! state and, on purge, are reparented to the root by the store's set-null
//! orphan policy.

use uuid::Uuid;

use crate::entity::{Entity, EntityKind};
use crate::lifecycle::LifecycleState;

/// Which records of the owner a step touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// A single record by id.
    One { kind: EntityKind, id: Uuid },
    /// Every direct child of `parent` in the given collection.
    Children { kind: EntityKind, parent: Uuid },
    /// An explicit id set. Ids the owner does not hold are skipped.
    Ids { kind: EntityKind, ids: Vec<Uuid> },
    /// Every record of the given collection.
    All { kind: EntityKind },
}

impl Selector {
    /// Collection targeted by this selector.
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::One { kind, .. }
            | Self::Children { kind, .. }
            | Self::Ids { kind, .. }
            | Self::All { kind } => *kind,
        }
    }
}

/// What a step does to the selected records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Set the soft-delete marker.
    SetTrashed(bool),
    /// Remove the records.
    Delete,
}

/// One owner-scoped operation inside a unit of work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub selector: Selector,
    pub action: Action,
    /// Only records currently in this state are selected.
    pub guard: Option<LifecycleState>,
    /// Abort the unit when nothing matches.
    pub required: bool,
}

impl Step {
    /// A step that may match nothing.
    pub fn new(selector: Selector, action: Action) -> Self {
        Self {
            selector,
            action,
            guard: None,
            required: false,
        }
    }

    /// Restrict the step to records in `state`.
    pub fn when(mut self, state: LifecycleState) -> Self {
        self.guard = Some(state);
        self
    }

    /// Mark the step as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Whether a record in `state` is selected by the guard.
    pub fn admits(&self, state: LifecycleState) -> bool {
        self.guard.is_none_or(|guard| guard == state)
    }
}

/// An ordered, owner-scoped batch of steps applied atomically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitOfWork {
    /// Owner every step is scoped to.
    pub owner_id: Uuid,
    /// Short operation name for logs.
    pub label: &'static str,
    pub steps: Vec<Step>,
}

impl UnitOfWork {
    /// An empty unit for `owner_id`.
    pub fn new(owner_id: Uuid, label: &'static str) -> Self {
        Self {
            owner_id,
            label,
            steps: Vec::new(),
        }
    }

    /// Append a step.
    pub fn step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    /// Trash one entity; a folder also trashes its direct children.
    pub fn trash(owner_id: Uuid, kind: EntityKind, id: Uuid) -> Self {
        Self::set_trashed(owner_id, "trash", kind, id, true)
    }

    /// Restore one entity; a folder also restores its direct children.
    pub fn restore(owner_id: Uuid, kind: EntityKind, id: Uuid) -> Self {
        Self::set_trashed(owner_id, "restore", kind, id, false)
    }

    fn set_trashed(
        owner_id: Uuid,
        label: &'static str,
        kind: EntityKind,
        id: Uuid,
        trashed: bool,
    ) -> Self {
        let action = Action::SetTrashed(trashed);
        let from = LifecycleState::from_trashed(!trashed);
        let mut unit = Self::new(owner_id, label)
            .step(Step::new(Selector::One { kind, id }, action).required());
        if kind == EntityKind::Folder {
            for child in [EntityKind::Folder, EntityKind::File] {
                unit = unit.step(
                    Step::new(Selector::Children { kind: child, parent: id }, action).when(from),
                );
            }
        }
        unit
    }

    /// Permanently delete a trashed entity. For a folder, its trashed direct
    /// children go first and the folder itself last.
    pub fn purge(owner_id: Uuid, kind: EntityKind, id: Uuid) -> Self {
        let mut unit = Self::new(owner_id, "purge");
        if kind == EntityKind::Folder {
            for child in [EntityKind::File, EntityKind::Folder] {
                unit = unit.step(
                    Step::new(Selector::Children { kind: child, parent: id }, Action::Delete)
                        .when(LifecycleState::Trashed),
                );
            }
        }
        unit.step(
            Step::new(Selector::One { kind, id }, Action::Delete)
                .when(LifecycleState::Trashed)
                .required(),
        )
    }

    /// Restore the given ids without cascading.
    pub fn restore_many(owner_id: Uuid, file_ids: Vec<Uuid>, folder_ids: Vec<Uuid>) -> Self {
        let action = Action::SetTrashed(false);
        let mut unit = Self::new(owner_id, "restore_many");
        if !folder_ids.is_empty() {
            unit = unit.step(
                Step::new(Selector::Ids { kind: EntityKind::Folder, ids: folder_ids }, action)
                    .when(LifecycleState::Trashed),
            );
        }
        if !file_ids.is_empty() {
            unit = unit.step(
                Step::new(Selector::Ids { kind: EntityKind::File, ids: file_ids }, action)
                    .when(LifecycleState::Trashed),
            );
        }
        unit
    }

    /// Restore every trashed record of the owner.
    pub fn restore_all(owner_id: Uuid) -> Self {
        let action = Action::SetTrashed(false);
        [EntityKind::Folder, EntityKind::File]
            .into_iter()
            .fold(Self::new(owner_id, "restore_all"), |unit, kind| {
                unit.step(
                    Step::new(Selector::All { kind }, action).when(LifecycleState::Trashed),
                )
            })
    }
}

/// Result of a committed unit of work.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitOfWorkOutcome {
    /// Records affected, one entry per step.
    pub affected: Vec<u64>,
    /// The record selected by the unit's first `One` step: its new state, or
    /// its last state when the step deleted it.
    pub target: Option<Entity>,
    /// Content locations of deleted files.
    pub released_locations: Vec<String>,
}

impl UnitOfWorkOutcome {
    /// Total records affected across all steps.
    pub fn total_affected(&self) -> u64 {
        self.affected.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trash_file_is_single_step() {
        let owner = Uuid::new_v4();
        let id = Uuid::new_v4();
        let unit = UnitOfWork::trash(owner, EntityKind::File, id);
        assert_eq!(unit.steps.len(), 1);
        assert!(unit.steps[0].required);
        assert_eq!(unit.steps[0].action, Action::SetTrashed(true));
        assert_eq!(unit.steps[0].guard, None);
    }

    #[test]
    fn test_trash_folder_cascades_one_level() {
        let id = Uuid::new_v4();
        let unit = UnitOfWork::trash(Uuid::new_v4(), EntityKind::Folder, id);
        assert_eq!(unit.steps.len(), 3);
        assert_eq!(
            unit.steps[1].selector,
            Selector::Children { kind: EntityKind::Folder, parent: id }
        );
        assert_eq!(
            unit.steps[2].selector,
            Selector::Children { kind: EntityKind::File, parent: id }
        );
        assert!(unit.steps[1..].iter().all(|s| !s.required));
        assert!(unit.steps[1..].iter().all(|s| s.admits(LifecycleState::Active)));
    }

    #[test]
    fn test_purge_folder_deletes_root_last() {
        let id = Uuid::new_v4();
        let unit = UnitOfWork::purge(Uuid::new_v4(), EntityKind::Folder, id);
        let last = unit.steps.last().expect("steps");
        assert_eq!(last.selector, Selector::One { kind: EntityKind::Folder, id });
        assert!(last.required);
        assert!(unit.steps.iter().all(|s| s.action == Action::Delete));
        assert!(unit.steps.iter().all(|s| !s.admits(LifecycleState::Active)));
    }

    #[test]
    fn test_restore_many_skips_empty_sets() {
        let unit = UnitOfWork::restore_many(Uuid::new_v4(), vec![Uuid::new_v4()], vec![]);
        assert_eq!(unit.steps.len(), 1);
        assert_eq!(unit.steps[0].selector.kind(), EntityKind::File);
    }
}
