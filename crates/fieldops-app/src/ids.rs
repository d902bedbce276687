// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Stable string identifier of a managed record (`CUS-0007`, `WO-0142`, ...).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn minted(prefix: &str, sequence: u32) -> Self {
        Self(format!("{prefix}-{sequence:04}"))
    }

    /// Trailing run of ASCII digits, if any.
    pub fn sequence(&self) -> Option<u32> {
        let digits = self
            .0
            .chars()
            .rev()
            .take_while(char::is_ascii_digit)
            .count();
        if digits == 0 {
            return None;
        }
        self.0[self.0.len() - digits..].parse().ok()
    }

    /// Mints the id one past the highest sequence among `existing` ids that
    /// carry `prefix`.
    pub fn next_after<'a, I>(prefix: &str, existing: I) -> Self
    where
        I: IntoIterator<Item = &'a RecordId>,
    {
        let marker = format!("{prefix}-");
        let highest = existing
            .into_iter()
            .filter(|id| id.0.starts_with(&marker))
            .filter_map(RecordId::sequence)
            .max()
            .unwrap_or(0);
        Self::minted(prefix, highest.saturating_add(1))
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for RecordId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self(value)
    }
}
