// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use fieldops_app::{EntityKind, RecordId};

/// Routes the user to a record's detail view.
pub trait Navigator {
    fn open_record(&mut self, entity: EntityKind, id: &RecordId);
}

/// Remembers every requested route; handy for scripted hosts and tests.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecordingNavigator {
    pub opened: Vec<(EntityKind, RecordId)>,
}

impl Navigator for RecordingNavigator {
    fn open_record(&mut self, entity: EntityKind, id: &RecordId) {
        self.opened.push((entity, id.clone()));
    }
}
