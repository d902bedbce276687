// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::EntityKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Nav,
    Search,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub mode: AppMode,
    pub active_entity: EntityKind,
    pub status_line: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            mode: AppMode::Nav,
            active_entity: EntityKind::Customers,
            status_line: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    NextEntity,
    PrevEntity,
    SelectEntity(EntityKind),
    EnterSearch,
    ExitSearch,
    SetStatus(String),
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    ModeChanged(AppMode),
    EntityChanged(EntityKind),
    StatusUpdated(String),
    StatusCleared,
}

impl AppState {
    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::NextEntity => self.rotate_entity(1),
            AppCommand::PrevEntity => self.rotate_entity(-1),
            AppCommand::SelectEntity(entity) => {
                if self.active_entity == entity {
                    return Vec::new();
                }
                self.active_entity = entity;
                self.mode = AppMode::Nav;
                vec![AppEvent::EntityChanged(entity)]
            }
            AppCommand::EnterSearch => {
                self.mode = AppMode::Search;
                vec![AppEvent::ModeChanged(self.mode), self.set_status("search")]
            }
            AppCommand::ExitSearch => {
                self.mode = AppMode::Nav;
                vec![AppEvent::ModeChanged(self.mode)]
            }
            AppCommand::SetStatus(message) => vec![self.set_status(&message)],
            AppCommand::ClearStatus => {
                self.status_line = None;
                vec![AppEvent::StatusCleared]
            }
        }
    }

    fn rotate_entity(&mut self, delta: isize) -> Vec<AppEvent> {
        let entities = EntityKind::ALL;
        let current = entities
            .iter()
            .position(|entity| *entity == self.active_entity)
            .unwrap_or(0) as isize;
        let len = entities.len() as isize;
        let next = (current + delta).rem_euclid(len) as usize;
        self.active_entity = entities[next];
        self.mode = AppMode::Nav;
        vec![AppEvent::EntityChanged(self.active_entity)]
    }

    fn set_status(&mut self, message: &str) -> AppEvent {
        self.status_line = Some(message.to_owned());
        AppEvent::StatusUpdated(message.to_owned())
    }
}
