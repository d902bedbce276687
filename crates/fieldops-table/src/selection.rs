// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use fieldops_app::RecordId;
use std::collections::BTreeSet;

/// Rendering state of the select-all header checkbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckState {
    Unchecked,
    Checked,
    Indeterminate,
}

/// IDs of the currently selected records.
///
/// The set is not pruned when a selected record drops out of the filtered
/// view; only [`SelectionSet::clear`] and [`SelectionSet::remove`] shrink it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectionSet {
    ids: BTreeSet<RecordId>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `id` if absent, removes it if present. Returns whether `id` is
    /// selected afterwards.
    pub fn toggle(&mut self, id: &RecordId) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.clone());
            true
        }
    }

    /// Deselects every visible id when all of them are already selected,
    /// otherwise unions them into the selection. Selected ids outside
    /// `visible` are never touched.
    pub fn select_all(&mut self, visible: &[&RecordId]) {
        if self.is_all_selected(visible) {
            for id in visible {
                self.ids.remove(*id);
            }
        } else {
            self.ids.extend(visible.iter().map(|id| (*id).clone()));
        }
    }

    /// False for an empty `visible` slice.
    pub fn is_all_selected(&self, visible: &[&RecordId]) -> bool {
        !visible.is_empty() && visible.iter().all(|id| self.ids.contains(*id))
    }

    pub fn is_some_selected(&self, visible: &[&RecordId]) -> bool {
        let selected = visible.iter().filter(|id| self.ids.contains(**id)).count();
        selected > 0 && selected < visible.len()
    }

    pub fn check_state(&self, visible: &[&RecordId]) -> CheckState {
        if self.is_all_selected(visible) {
            CheckState::Checked
        } else if self.is_some_selected(visible) {
            CheckState::Indeterminate
        } else {
            CheckState::Unchecked
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn remove(&mut self, id: &RecordId) -> bool {
        self.ids.remove(id)
    }

    pub fn contains(&self, id: &RecordId) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn has_selection(&self) -> bool {
        !self.ids.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &RecordId> {
        self.ids.iter()
    }
}
