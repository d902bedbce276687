// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

/// Presentation style shared by status badges and tag chips. Rendering layers
/// map tones to concrete colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tone {
    Neutral,
    Info,
    Success,
    Warning,
    Danger,
    Accent,
}

impl Tone {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Neutral => "neutral",
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Danger => "danger",
            Self::Accent => "accent",
        }
    }
}

pub const DEFAULT_TAG_TONE: Tone = Tone::Neutral;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusDef<S: 'static> {
    pub key: S,
    pub label: &'static str,
    pub tone: Tone,
}

/// Closed registry of the statuses an entity can take, in filter-tab order.
#[derive(Debug)]
pub struct StatusCatalog<S: 'static> {
    entries: &'static [StatusDef<S>],
}

impl<S> StatusCatalog<S> {
    pub const fn new(entries: &'static [StatusDef<S>]) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &'static [StatusDef<S>] {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Copy + PartialEq> StatusCatalog<S> {
    pub fn keys(&self) -> impl Iterator<Item = S> + '_ {
        self.entries.iter().map(|entry| entry.key)
    }

    pub fn get(&self, key: S) -> Option<&'static StatusDef<S>> {
        self.entries.iter().find(|entry| entry.key == key)
    }

    pub fn position(&self, key: S) -> Option<usize> {
        self.entries.iter().position(|entry| entry.key == key)
    }

    pub fn label(&self, key: S) -> &'static str {
        self.get(key).map_or("unknown", |entry| entry.label)
    }

    pub fn tone(&self, key: S) -> Tone {
        self.get(key).map_or(Tone::Neutral, |entry| entry.tone)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagDef {
    pub id: &'static str,
    pub label: &'static str,
    pub tone: Tone,
}

/// Fixed list of tags offered by the tag editor. Records store labels, so
/// lookups go by label; unknown labels still render with
/// [`DEFAULT_TAG_TONE`].
#[derive(Debug)]
pub struct TagCatalog {
    entries: &'static [TagDef],
}

impl TagCatalog {
    pub const fn new(entries: &'static [TagDef]) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &'static [TagDef] {
        self.entries
    }

    pub fn by_label(&self, label: &str) -> Option<&'static TagDef> {
        self.entries.iter().find(|entry| entry.label == label)
    }

    pub fn by_id(&self, id: &str) -> Option<&'static TagDef> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn tone_for(&self, label: &str) -> Tone {
        self.by_label(label)
            .map_or(DEFAULT_TAG_TONE, |entry| entry.tone)
    }

    pub fn is_known(&self, label: &str) -> bool {
        self.by_label(label).is_some()
    }
}
