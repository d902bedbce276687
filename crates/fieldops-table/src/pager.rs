// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::ops::Range;

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Client-side pagination over a filtered row count. Pages are 1-based and
/// an empty result still has one (empty) page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    page_size: usize,
    current: usize,
}

impl Default for Pager {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Pager {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            current: 1,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn current_page(&self) -> usize {
        self.current
    }

    pub fn total_pages(&self, total_rows: usize) -> usize {
        total_rows.div_ceil(self.page_size).max(1)
    }

    /// Moves to `page` when it lies in `1..=total_pages`. Returns whether the
    /// current page changed.
    pub fn go_to(&mut self, page: usize, total_rows: usize) -> bool {
        if page == 0 || page > self.total_pages(total_rows) || page == self.current {
            return false;
        }
        self.current = page;
        true
    }

    pub fn next(&mut self, total_rows: usize) -> bool {
        self.go_to(self.current + 1, total_rows)
    }

    pub fn prev(&mut self, total_rows: usize) -> bool {
        self.go_to(self.current.saturating_sub(1), total_rows)
    }

    pub fn has_prev(&self) -> bool {
        self.current > 1
    }

    pub fn has_next(&self, total_rows: usize) -> bool {
        self.current < self.total_pages(total_rows)
    }

    pub fn reset(&mut self) {
        self.current = 1;
    }

    /// Pulls the current page back onto the last page after the row count
    /// shrank.
    pub fn clamp(&mut self, total_rows: usize) {
        self.current = self.current.min(self.total_pages(total_rows));
    }

    /// Index range of the current page's rows within the filtered list.
    pub fn range(&self, total_rows: usize) -> Range<usize> {
        let start = ((self.current - 1) * self.page_size).min(total_rows);
        let end = (start + self.page_size).min(total_rows);
        start..end
    }
}
