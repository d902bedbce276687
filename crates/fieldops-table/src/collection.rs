// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use fieldops_app::{Record, RecordId};

use crate::TableError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertAt {
    Head,
    Tail,
}

/// The backing record list of one table. Every write goes through this type
/// so each change bumps `revision`.
#[derive(Debug, Clone)]
pub struct RecordCollection<R> {
    records: Vec<R>,
    revision: u64,
}

impl<R: Record> RecordCollection<R> {
    pub fn new(records: Vec<R>) -> Self {
        Self {
            records,
            revision: 0,
        }
    }

    pub fn as_slice(&self) -> &[R] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn get(&self, id: &RecordId) -> Option<&R> {
        self.records.iter().find(|record| record.id() == id)
    }

    pub fn contains(&self, id: &RecordId) -> bool {
        self.get(id).is_some()
    }

    pub fn next_id(&self) -> RecordId {
        RecordId::next_after(
            R::ENTITY.id_prefix(),
            self.records.iter().map(R::id),
        )
    }

    pub(crate) fn insert(&mut self, record: R, at: InsertAt) -> Result<(), TableError> {
        if self.contains(record.id()) {
            return Err(TableError::DuplicateId(record.id().clone()));
        }
        match at {
            InsertAt::Head => self.records.insert(0, record),
            InsertAt::Tail => self.records.push(record),
        }
        self.bump();
        Ok(())
    }

    /// Applies `update` to every record whose id satisfies `selected` and
    /// returns how many of those calls reported a change.
    pub(crate) fn update_where<P, F>(&mut self, selected: P, mut update: F) -> usize
    where
        P: Fn(&RecordId) -> bool,
        F: FnMut(&mut R) -> bool,
    {
        let mut changed = 0;
        for record in self.records.iter_mut() {
            if selected(record.id()) && update(record) {
                changed += 1;
            }
        }
        if changed > 0 {
            self.bump();
        }
        changed
    }

    pub(crate) fn remove_where<P>(&mut self, selected: P) -> Vec<RecordId>
    where
        P: Fn(&RecordId) -> bool,
    {
        let mut removed = Vec::new();
        self.records.retain(|record| {
            if selected(record.id()) {
                removed.push(record.id().clone());
                false
            } else {
                true
            }
        });
        if !removed.is_empty() {
            self.bump();
        }
        removed
    }

    fn bump(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}
