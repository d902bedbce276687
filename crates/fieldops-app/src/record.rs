// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::borrow::Cow;
use std::fmt::Debug;
use std::hash::Hash;

use crate::{EntityKind, RecordId, StatusCatalog, TagCatalog, TagList};

/// A status enum whose variants form a closed set described by a static
/// catalog.
pub trait StatusKey: Copy + Eq + Hash + Debug + 'static {
    fn as_str(self) -> &'static str;
    fn parse(value: &str) -> Option<Self>;
    fn catalog() -> &'static StatusCatalog<Self>;

    fn label(self) -> &'static str {
        Self::catalog().label(self)
    }
}

/// An entity row managed by a selectable record table.
pub trait Record {
    type Status: StatusKey;

    const ENTITY: EntityKind;

    fn id(&self) -> &RecordId;
    fn status(&self) -> Self::Status;
    fn set_status(&mut self, status: Self::Status);
    fn tags(&self) -> &TagList;
    fn tags_mut(&mut self) -> &mut TagList;

    /// Fields the free-text search matches against.
    fn search_fields(&self) -> Vec<Cow<'_, str>>;

    /// Short human label used in prompts and summaries.
    fn display_name(&self) -> &str;

    fn tag_catalog() -> &'static TagCatalog;
}

/// Strips everything but ASCII digits, so `(555) 010-2233` searches as
/// `5550102233`.
pub fn digits_only(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

#[cfg(test)]
mod tests {
    use super::digits_only;

    #[test]
    fn digits_only_drops_punctuation() {
        assert_eq!(digits_only("(555) 010-2233"), "5550102233");
        assert_eq!(digits_only("ext."), "");
    }
}
