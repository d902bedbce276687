// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use fieldops_app::{EntityKind, Record, RecordId, StatusKey};
use std::collections::BTreeSet;
use tracing::{debug, info};

use crate::{Confirm, ConfirmPrompt, DropdownCoordinator, RecordCollection, SelectionSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagToggle {
    Added(usize),
    Removed(usize),
}

impl TagToggle {
    pub fn affected(self) -> usize {
        match self {
            Self::Added(count) | Self::Removed(count) => count,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteScope {
    Bulk,
    Single,
}

/// A deletion waiting for the user's yes/no. Holds the ids captured when
/// it was requested; resolving it never widens that set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteRequest {
    pub entity: EntityKind,
    pub scope: DeleteScope,
    pub ids: Vec<RecordId>,
    pub subject: String,
}

impl DeleteRequest {
    pub fn prompt(&self) -> ConfirmPrompt {
        match self.scope {
            DeleteScope::Bulk => {
                let noun = if self.ids.len() == 1 {
                    self.entity.singular()
                } else {
                    self.entity.label()
                };
                ConfirmPrompt::new(
                    format!("Delete {}", self.entity.label()),
                    format!("Delete {} {noun}? This cannot be undone.", self.ids.len()),
                )
            }
            DeleteScope::Single => ConfirmPrompt::new(
                format!("Delete {}", self.entity.singular()),
                format!(
                    "Delete {} {:?}? This cannot be undone.",
                    self.entity.singular(),
                    self.subject
                ),
            ),
        }
    }
}

/// De-duplicated union of the tags on `records`, in first-seen order.
pub fn tag_union<'a, R, I>(records: I) -> Vec<String>
where
    R: Record + 'a,
    I: IntoIterator<Item = &'a R>,
{
    let mut seen = BTreeSet::new();
    let mut tags = Vec::new();
    for record in records {
        for tag in record.tags().iter() {
            if seen.insert(tag) {
                tags.push(tag.to_owned());
            }
        }
    }
    tags
}

/// Applies status, tag and delete mutations to the selected records of one
/// table. With an empty selection every bulk call changes nothing and
/// reports zero.
pub struct BulkMutationController<'a, R: Record> {
    records: &'a mut RecordCollection<R>,
    selection: &'a mut SelectionSet,
    dropdown: &'a mut DropdownCoordinator,
}

impl<'a, R: Record> BulkMutationController<'a, R> {
    pub fn new(
        records: &'a mut RecordCollection<R>,
        selection: &'a mut SelectionSet,
        dropdown: &'a mut DropdownCoordinator,
    ) -> Self {
        Self {
            records,
            selection,
            dropdown,
        }
    }

    pub fn has_selection(&self) -> bool {
        self.selection.has_selection()
    }

    /// Sets `status` on every selected record and closes the open menu. The
    /// selection is kept, even for rows that leave the active tab.
    pub fn bulk_set_status(&mut self, status: R::Status) -> usize {
        if !self.has_selection() {
            return 0;
        }
        let selection = &*self.selection;
        let changed = self.records.update_where(
            |id| selection.contains(id),
            |record| {
                if record.status() == status {
                    return false;
                }
                record.set_status(status);
                true
            },
        );
        self.dropdown.close();
        info!(
            entity = R::ENTITY.as_str(),
            status = status.as_str(),
            selected = self.selection.len(),
            changed,
            "bulk status change"
        );
        changed
    }

    pub fn bulk_add_tag(&mut self, label: &str) -> usize {
        if !self.has_selection() {
            return 0;
        }
        let selection = &*self.selection;
        let changed = self.records.update_where(
            |id| selection.contains(id),
            |record| record.tags_mut().insert(label),
        );
        info!(entity = R::ENTITY.as_str(), tag = label, changed, "bulk tag add");
        changed
    }

    pub fn bulk_remove_tag(&mut self, label: &str) -> usize {
        if !self.has_selection() {
            return 0;
        }
        let selection = &*self.selection;
        let changed = self.records.update_where(
            |id| selection.contains(id),
            |record| record.tags_mut().remove(label),
        );
        info!(entity = R::ENTITY.as_str(), tag = label, changed, "bulk tag remove");
        changed
    }

    /// Union of the tags on the selected records, first-seen order.
    pub fn common_tags(&self) -> Vec<String> {
        tag_union(self.selected_records())
    }

    /// Removes `label` from every selected record when any of them carries
    /// it, otherwise adds it to all of them.
    pub fn toggle_tag(&mut self, label: &str) -> TagToggle {
        let present = self
            .selected_records()
            .any(|record| record.tags().contains(label));
        if present {
            TagToggle::Removed(self.bulk_remove_tag(label))
        } else {
            TagToggle::Added(self.bulk_add_tag(label))
        }
    }

    pub fn request_bulk_delete(&self) -> Option<DeleteRequest> {
        let ids = self
            .selected_records()
            .map(|record| record.id().clone())
            .collect::<Vec<_>>();
        if ids.is_empty() {
            return None;
        }
        let subject = format!("{} {}", ids.len(), R::ENTITY.label());
        Some(DeleteRequest {
            entity: R::ENTITY,
            scope: DeleteScope::Bulk,
            ids,
            subject,
        })
    }

    pub fn request_single_delete(&self, id: &RecordId) -> Option<DeleteRequest> {
        let record = self.records.get(id)?;
        Some(DeleteRequest {
            entity: R::ENTITY,
            scope: DeleteScope::Single,
            ids: vec![record.id().clone()],
            subject: record.display_name().to_owned(),
        })
    }

    /// Applies an answered delete request. A declined request changes
    /// nothing. An accepted bulk request clears the selection; a single
    /// delete only drops its own id from it. Returns the removed count.
    pub fn resolve_delete(&mut self, request: &DeleteRequest, confirmed: bool) -> usize {
        if !confirmed {
            info!(
                entity = request.entity.as_str(),
                count = request.ids.len(),
                "delete declined"
            );
            return 0;
        }
        let targets = request.ids.iter().collect::<BTreeSet<_>>();
        let removed = self.records.remove_where(|id| targets.contains(id));
        match request.scope {
            DeleteScope::Bulk => self.selection.clear(),
            DeleteScope::Single => {
                for id in &removed {
                    self.selection.remove(id);
                }
            }
        }
        self.dropdown.close();
        info!(
            entity = request.entity.as_str(),
            removed = removed.len(),
            "records deleted"
        );
        removed.len()
    }

    pub async fn bulk_delete(&mut self, confirm: &dyn Confirm) -> usize {
        let Some(request) = self.request_bulk_delete() else {
            return 0;
        };
        let confirmed = confirm.confirm(&request.prompt()).await;
        self.resolve_delete(&request, confirmed)
    }

    pub async fn single_delete(&mut self, id: &RecordId, confirm: &dyn Confirm) -> usize {
        let Some(request) = self.request_single_delete(id) else {
            debug!(%id, "delete of missing record ignored");
            return 0;
        };
        let confirmed = confirm.confirm(&request.prompt()).await;
        self.resolve_delete(&request, confirmed)
    }

    /// Sets the status of one record and closes its menu. Returns whether
    /// the record existed and changed.
    pub fn single_status_change(&mut self, id: &RecordId, status: R::Status) -> bool {
        let changed = self.records.update_where(
            |candidate| candidate == id,
            |record| {
                if record.status() == status {
                    return false;
                }
                record.set_status(status);
                true
            },
        );
        self.dropdown.close();
        if changed > 0 {
            info!(%id, status = status.as_str(), "status change");
        }
        changed > 0
    }

    fn selected_records(&self) -> impl Iterator<Item = &R> + '_ {
        self.records
            .as_slice()
            .iter()
            .filter(move |record| self.selection.contains(record.id()))
    }
}
