// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use fieldops_app::{Record, StatusKey};

pub const ALL_TAB_KEY: &str = "all";

/// The status segment a table is filtered to. `Unknown` carries a key that
/// is not in the catalog; it matches no records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusTab<S> {
    All,
    Status(S),
    Unknown(String),
}

impl<S> Default for StatusTab<S> {
    fn default() -> Self {
        Self::All
    }
}

impl<S: StatusKey> StatusTab<S> {
    pub fn parse(raw: &str) -> Self {
        let key = raw.trim();
        if key.is_empty() || key == ALL_TAB_KEY {
            return Self::All;
        }
        match S::parse(key) {
            Some(status) => Self::Status(status),
            None => Self::Unknown(key.to_owned()),
        }
    }

    pub fn key(&self) -> &str {
        match self {
            Self::All => ALL_TAB_KEY,
            Self::Status(status) => status.as_str(),
            Self::Unknown(raw) => raw,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::All => "All",
            Self::Status(status) => status.label(),
            Self::Unknown(raw) => raw,
        }
    }

    pub fn matches(&self, status: S) -> bool {
        match self {
            Self::All => true,
            Self::Status(active) => *active == status,
            Self::Unknown(_) => false,
        }
    }

    /// `All` followed by every catalog status, in catalog order.
    pub fn ordered() -> Vec<Self> {
        std::iter::once(Self::All)
            .chain(S::catalog().keys().map(Self::Status))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState<S> {
    pub query: String,
    pub active_tab: StatusTab<S>,
}

impl<S> Default for FilterState<S> {
    fn default() -> Self {
        Self {
            query: String::new(),
            active_tab: StatusTab::All,
        }
    }
}

impl<S: StatusKey> FilterState<S> {
    pub fn matches<R>(&self, record: &R) -> bool
    where
        R: Record<Status = S>,
    {
        self.active_tab.matches(record.status()) && matches_query(record, &self.query)
    }
}

/// Case-insensitive substring match against the record's searchable fields.
/// A blank query matches everything.
pub fn matches_query<R: Record>(record: &R, query: &str) -> bool {
    if query.trim().is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    record
        .search_fields()
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Matching records in source order.
pub fn filter<'a, R: Record>(records: &'a [R], state: &FilterState<R::Status>) -> Vec<&'a R> {
    records.iter().filter(|record| state.matches(*record)).collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusCounts<S> {
    all: usize,
    by_status: Vec<(S, usize)>,
}

impl<S: StatusKey> StatusCounts<S> {
    pub fn all(&self) -> usize {
        self.all
    }

    pub fn status(&self, status: S) -> usize {
        self.by_status
            .iter()
            .find(|(key, _)| *key == status)
            .map_or(0, |(_, count)| *count)
    }

    pub fn tab(&self, tab: &StatusTab<S>) -> usize {
        match tab {
            StatusTab::All => self.all,
            StatusTab::Status(status) => self.status(*status),
            StatusTab::Unknown(_) => 0,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (S, usize)> + '_ {
        self.by_status.iter().copied()
    }
}

/// Record count per catalog status plus the `all` total. Ignores any text
/// query: badges describe the whole collection.
pub fn counts_by_status<R: Record>(records: &[R]) -> StatusCounts<R::Status> {
    let mut by_status = R::Status::catalog()
        .keys()
        .map(|status| (status, 0usize))
        .collect::<Vec<_>>();
    for record in records {
        if let Some((_, count)) = by_status
            .iter_mut()
            .find(|(status, _)| *status == record.status())
        {
            *count += 1;
        }
    }
    StatusCounts {
        all: records.len(),
        by_status,
    }
}

#[cfg(test)]
mod tests {
    use super::{FilterState, StatusTab, counts_by_status, filter, matches_query};
    use crate::test_support::customer;
    use fieldops_app::CustomerStatus;

    #[test]
    fn tab_parse_handles_all_known_and_unknown() {
        assert_eq!(StatusTab::<CustomerStatus>::parse("all"), StatusTab::All);
        assert_eq!(StatusTab::<CustomerStatus>::parse(""), StatusTab::All);
        assert_eq!(
            StatusTab::<CustomerStatus>::parse("vip"),
            StatusTab::Status(CustomerStatus::Vip)
        );
        assert_eq!(
            StatusTab::<CustomerStatus>::parse("archived"),
            StatusTab::Unknown("archived".to_owned())
        );
    }

    #[test]
    fn ordered_tabs_start_with_all_then_catalog_order() {
        let keys = StatusTab::<CustomerStatus>::ordered()
            .iter()
            .map(|tab| tab.key().to_owned())
            .collect::<Vec<_>>();
        assert_eq!(keys, vec!["all", "active", "vip", "lead", "inactive"]);
    }

    #[test]
    fn status_and_query_are_anded() {
        let records = vec![
            customer("1", "Avery Walker", CustomerStatus::Active, &[]),
            customer("2", "Avery Brooks", CustomerStatus::Vip, &[]),
            customer("3", "Jordan Hill", CustomerStatus::Vip, &[]),
        ];
        let state = FilterState {
            query: "AVERY".to_owned(),
            active_tab: StatusTab::Status(CustomerStatus::Vip),
        };
        let ids = filter(&records, &state)
            .iter()
            .map(|record| record.id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(ids, vec!["2"]);
    }

    #[test]
    fn unknown_tab_matches_nothing() {
        let records = vec![customer("1", "Avery", CustomerStatus::Active, &[])];
        let state = FilterState {
            query: String::new(),
            active_tab: StatusTab::parse("archived"),
        };
        assert!(filter(&records, &state).is_empty());
    }

    #[test]
    fn blank_query_matches_everything() {
        let record = customer("1", "Avery", CustomerStatus::Active, &[]);
        assert!(matches_query(&record, ""));
        assert!(matches_query(&record, "   "));
    }

    #[test]
    fn phone_digits_are_searchable_without_punctuation() {
        let record = customer("1", "Avery", CustomerStatus::Active, &[]);
        assert!(matches_query(&record, "5550100"));
        assert!(matches_query(&record, "(555) 010"));
    }

    #[test]
    fn filtering_keeps_source_order() {
        let records = vec![
            customer("9", "Casey", CustomerStatus::Vip, &[]),
            customer("2", "Casey", CustomerStatus::Active, &[]),
            customer("5", "Casey", CustomerStatus::Vip, &[]),
            customer("1", "Casey", CustomerStatus::Lead, &[]),
        ];
        let state = FilterState {
            query: "casey".to_owned(),
            active_tab: StatusTab::All,
        };
        let ids = filter(&records, &state)
            .iter()
            .map(|record| record.id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(ids, vec!["9", "2", "5", "1"]);
    }

    #[test]
    fn counts_cover_every_catalog_status() {
        let records = vec![
            customer("1", "A", CustomerStatus::Active, &[]),
            customer("2", "B", CustomerStatus::Vip, &[]),
            customer("3", "C", CustomerStatus::Vip, &[]),
        ];
        let counts = counts_by_status(&records);
        assert_eq!(counts.all(), 3);
        assert_eq!(counts.status(CustomerStatus::Vip), 2);
        assert_eq!(counts.status(CustomerStatus::Inactive), 0);
        assert_eq!(counts.tab(&StatusTab::Unknown("x".to_owned())), 0);
        assert_eq!(counts.iter().count(), 4);
    }
}
