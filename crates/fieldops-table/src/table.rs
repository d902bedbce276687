// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use fieldops_app::{Record, RecordId, StatusKey, Tone};
use tracing::{debug, warn};

use crate::{
    BulkMutationController, CheckState, Confirm, DeleteRequest, DropdownCoordinator,
    ExportBatch, ExportRecord, ExportScope, FilterState, InsertAt, MenuId, Navigator, Pager,
    RecordCollection, SelectionSet, StatusCounts, StatusTab, TableError, TagToggle,
    counts_by_status, filter, tag_union,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    SetStatus,
    Tags,
    Delete,
    Export,
}

impl ToolbarAction {
    pub const ALL: [Self; 4] = [Self::SetStatus, Self::Tags, Self::Delete, Self::Export];

    pub const fn label(self) -> &'static str {
        match self {
            Self::SetStatus => "Set status",
            Self::Tags => "Tags",
            Self::Delete => "Delete",
            Self::Export => "Export",
        }
    }

    const fn disabled_hint(self) -> Option<&'static str> {
        match self {
            Self::SetStatus => Some("select records to change their status"),
            Self::Tags => Some("select records to edit tags"),
            Self::Delete => Some("select records to delete them"),
            Self::Export => None,
        }
    }
}

/// One toolbar button as the view should draw it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolbarItem {
    pub action: ToolbarAction,
    pub enabled: bool,
    pub hint: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabBadge<S> {
    pub tab: StatusTab<S>,
    pub label: String,
    pub count: usize,
    pub tone: Tone,
    pub active: bool,
}

/// The filterable, tab-segmented, multi-select table shared by every entity
/// screen. Owns its records; all writes go through the methods below so
/// counts, selection and paging stay consistent.
#[derive(Debug)]
pub struct SelectableRecordTable<R: Record> {
    records: RecordCollection<R>,
    filter: FilterState<R::Status>,
    selection: SelectionSet,
    dropdown: DropdownCoordinator,
    pager: Pager,
    counts: StatusCounts<R::Status>,
    counts_revision: u64,
    pending_delete: Option<DeleteRequest>,
}

impl<R: Record> SelectableRecordTable<R> {
    pub fn new(records: Vec<R>) -> Self {
        Self::with_page_size(records, crate::DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(records: Vec<R>, page_size: usize) -> Self {
        let records = RecordCollection::new(records);
        let counts = counts_by_status(records.as_slice());
        let counts_revision = records.revision();
        Self {
            records,
            filter: FilterState::default(),
            selection: SelectionSet::new(),
            dropdown: DropdownCoordinator::new(),
            pager: Pager::new(page_size),
            counts,
            counts_revision,
            pending_delete: None,
        }
    }

    pub fn records(&self) -> &RecordCollection<R> {
        &self.records
    }

    pub fn get(&self, id: &RecordId) -> Option<&R> {
        self.records.get(id)
    }

    pub fn next_id(&self) -> RecordId {
        self.records.next_id()
    }

    pub fn query(&self) -> &str {
        &self.filter.query
    }

    /// Returns whether the query changed. A change sends the pager back to
    /// page 1.
    pub fn set_query(&mut self, query: impl Into<String>) -> bool {
        let query = query.into();
        if query == self.filter.query {
            return false;
        }
        debug!(entity = R::ENTITY.as_str(), query = %query, "query changed");
        self.filter.query = query;
        self.pager.reset();
        true
    }

    pub fn active_tab(&self) -> &StatusTab<R::Status> {
        &self.filter.active_tab
    }

    pub fn set_active_tab(&mut self, tab: StatusTab<R::Status>) -> bool {
        if tab == self.filter.active_tab {
            return false;
        }
        debug!(entity = R::ENTITY.as_str(), tab = tab.key(), "tab changed");
        self.filter.active_tab = tab;
        self.pager.reset();
        true
    }

    pub fn set_active_tab_key(&mut self, key: &str) -> bool {
        self.set_active_tab(StatusTab::parse(key))
    }

    /// Steps through `All` and the catalog tabs, wrapping at both ends. An
    /// unknown tab steps as if it were `All`.
    pub fn cycle_tab(&mut self, delta: isize) -> bool {
        let tabs = StatusTab::<R::Status>::ordered();
        let current = tabs
            .iter()
            .position(|tab| *tab == self.filter.active_tab)
            .unwrap_or(0) as isize;
        let next = (current + delta).rem_euclid(tabs.len() as isize) as usize;
        self.set_active_tab(tabs[next].clone())
    }

    pub fn filtered(&self) -> Vec<&R> {
        filter(self.records.as_slice(), &self.filter)
    }

    pub fn filtered_len(&self) -> usize {
        self.filtered().len()
    }

    /// Ids of every filtered record across all pages. Select-all and the
    /// header checkbox act on this set.
    pub fn visible_ids(&self) -> Vec<&RecordId> {
        self.filtered().into_iter().map(R::id).collect()
    }

    pub fn page_rows(&self) -> Vec<&R> {
        let filtered = self.filtered();
        let range = self.pager.range(filtered.len());
        filtered[range].to_vec()
    }

    pub fn pager(&self) -> &Pager {
        &self.pager
    }

    pub fn current_page(&self) -> usize {
        self.pager.current_page()
    }

    pub fn total_pages(&self) -> usize {
        self.pager.total_pages(self.filtered_len())
    }

    pub fn has_prev_page(&self) -> bool {
        self.pager.has_prev()
    }

    pub fn has_next_page(&self) -> bool {
        self.pager.has_next(self.filtered_len())
    }

    pub fn go_to_page(&mut self, page: usize) -> bool {
        let total = self.filtered_len();
        self.pager.go_to(page, total)
    }

    pub fn next_page(&mut self) -> bool {
        let total = self.filtered_len();
        self.pager.next(total)
    }

    pub fn prev_page(&mut self) -> bool {
        let total = self.filtered_len();
        self.pager.prev(total)
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn is_selected(&self, id: &RecordId) -> bool {
        self.selection.contains(id)
    }

    /// Ignores ids that are not in the collection. Returns whether `id` is
    /// selected afterwards.
    pub fn toggle_row(&mut self, id: &RecordId) -> bool {
        if !self.records.contains(id) {
            return false;
        }
        self.selection.toggle(id)
    }

    pub fn toggle_select_all(&mut self) {
        let visible = self
            .visible_ids()
            .into_iter()
            .cloned()
            .collect::<Vec<_>>();
        let refs = visible.iter().collect::<Vec<_>>();
        self.selection.select_all(&refs);
        debug!(
            entity = R::ENTITY.as_str(),
            selected = self.selection.len(),
            "select all toggled"
        );
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn header_checkbox(&self) -> CheckState {
        self.selection.check_state(&self.visible_ids())
    }

    pub fn has_selection(&self) -> bool {
        self.selection.has_selection()
    }

    /// Text for the selection chip, `None` when nothing is selected.
    pub fn selection_summary(&self) -> Option<String> {
        let count = self.selection.len();
        match count {
            0 => None,
            1 => Some(format!("1 {} selected", R::ENTITY.singular())),
            _ => Some(format!("{count} {} selected", R::ENTITY.label())),
        }
    }

    pub fn toolbar(&self) -> Vec<ToolbarItem> {
        let has_selection = self.has_selection();
        ToolbarAction::ALL
            .into_iter()
            .map(|action| {
                let hint = action.disabled_hint();
                let enabled = has_selection || hint.is_none();
                ToolbarItem {
                    action,
                    enabled,
                    hint: if enabled { None } else { hint },
                }
            })
            .collect()
    }

    /// Filter tabs with record counts. Counts ignore the text query.
    pub fn tab_badges(&self) -> Vec<TabBadge<R::Status>> {
        let catalog = R::Status::catalog();
        StatusTab::<R::Status>::ordered()
            .into_iter()
            .map(|tab| {
                let tone = match &tab {
                    StatusTab::Status(status) => catalog.tone(*status),
                    _ => Tone::Neutral,
                };
                TabBadge {
                    label: tab.label().to_owned(),
                    count: self.counts.tab(&tab),
                    tone,
                    active: tab == self.filter.active_tab,
                    tab,
                }
            })
            .collect()
    }

    pub fn counts(&self) -> &StatusCounts<R::Status> {
        &self.counts
    }

    pub fn counts_revision(&self) -> u64 {
        self.counts_revision
    }

    pub fn dropdown(&self) -> &DropdownCoordinator {
        &self.dropdown
    }

    pub fn dropdown_mut(&mut self) -> &mut DropdownCoordinator {
        &mut self.dropdown
    }

    /// Bulk menus only open with a selection; row menus only for records in
    /// the collection. Returns whether `menu` is open afterwards.
    pub fn toggle_menu(&mut self, menu: MenuId) -> bool {
        let allowed = match &menu {
            MenuId::Status | MenuId::Tags => self.has_selection(),
            MenuId::RowStatus(id) => self.records.contains(id),
        };
        if !allowed {
            return false;
        }
        self.dropdown.toggle(menu)
    }

    pub fn close_menu(&mut self) -> bool {
        self.dropdown.close()
    }

    /// Union of the tags on the selected records. Drives the tag menu's
    /// checkmarks.
    pub fn common_tags(&self) -> Vec<String> {
        tag_union(self.selected_records())
    }

    pub fn bulk_set_status(&mut self, status: R::Status) -> usize {
        let changed = self.bulk().bulk_set_status(status);
        self.sync();
        changed
    }

    pub fn bulk_add_tag(&mut self, label: &str) -> usize {
        let changed = self.bulk().bulk_add_tag(label);
        self.sync();
        changed
    }

    pub fn bulk_remove_tag(&mut self, label: &str) -> usize {
        let changed = self.bulk().bulk_remove_tag(label);
        self.sync();
        changed
    }

    /// Union-toggle of `label` across the selection. The tag menu stays
    /// open so several tags can be flipped in a row.
    pub fn toggle_tag(&mut self, label: &str) -> TagToggle {
        let outcome = self.bulk().toggle_tag(label);
        self.sync();
        outcome
    }

    pub fn single_status_change(&mut self, id: &RecordId, status: R::Status) -> bool {
        let changed = self.bulk().single_status_change(id, status);
        self.sync();
        changed
    }

    /// Captures the current selection as a pending delete awaiting an answer.
    pub fn request_bulk_delete(&mut self) -> Option<&DeleteRequest> {
        let request = self.bulk().request_bulk_delete()?;
        self.dropdown.close();
        self.pending_delete = Some(request);
        self.pending_delete.as_ref()
    }

    pub fn request_single_delete(&mut self, id: &RecordId) -> Option<&DeleteRequest> {
        let request = self.bulk().request_single_delete(id)?;
        self.dropdown.close();
        self.pending_delete = Some(request);
        self.pending_delete.as_ref()
    }

    pub fn pending_delete(&self) -> Option<&DeleteRequest> {
        self.pending_delete.as_ref()
    }

    /// Answers the pending delete. Returns the removed count; zero when
    /// declined or when nothing was pending.
    pub fn resolve_pending_delete(&mut self, confirmed: bool) -> usize {
        let Some(request) = self.pending_delete.take() else {
            return 0;
        };
        let removed = self.bulk().resolve_delete(&request, confirmed);
        self.sync();
        removed
    }

    pub fn cancel_pending_delete(&mut self) -> bool {
        self.pending_delete.take().is_some()
    }

    pub async fn bulk_delete(&mut self, confirm: &dyn Confirm) -> usize {
        let removed = self.bulk().bulk_delete(confirm).await;
        self.sync();
        removed
    }

    pub async fn single_delete(&mut self, id: &RecordId, confirm: &dyn Confirm) -> usize {
        let removed = self.bulk().single_delete(id, confirm).await;
        self.sync();
        removed
    }

    pub fn insert(&mut self, record: R, at: InsertAt) -> Result<(), TableError> {
        let id = record.id().clone();
        if let Err(error) = self.records.insert(record, at) {
            warn!(entity = R::ENTITY.as_str(), %id, "insert rejected");
            return Err(error);
        }
        debug!(entity = R::ENTITY.as_str(), %id, "record inserted");
        self.sync();
        Ok(())
    }

    /// Forwards to `navigator` when `id` is in the collection. Returns
    /// whether navigation happened.
    pub fn view_record(&self, id: &RecordId, navigator: &mut dyn Navigator) -> bool {
        if !self.records.contains(id) {
            return false;
        }
        navigator.open_record(R::ENTITY, id);
        true
    }

    fn selected_records(&self) -> impl Iterator<Item = &R> + '_ {
        self.records
            .as_slice()
            .iter()
            .filter(move |record| self.selection.contains(record.id()))
    }

    fn bulk(&mut self) -> BulkMutationController<'_, R> {
        BulkMutationController::new(&mut self.records, &mut self.selection, &mut self.dropdown)
    }

    /// Refreshes memoized counts when the collection changed and pulls the
    /// pager back inside the filtered range.
    fn sync(&mut self) {
        if self.counts_revision != self.records.revision() {
            self.counts = counts_by_status(self.records.as_slice());
            self.counts_revision = self.records.revision();
        }
        let total = self.filtered_len();
        self.pager.clamp(total);
    }
}

impl<R: ExportRecord> SelectableRecordTable<R> {
    /// The selected records when there is a selection, otherwise the
    /// filtered set. Collection order either way.
    pub fn export_batch(&self) -> ExportBatch {
        if self.has_selection() {
            ExportBatch::from_records(ExportScope::Selection, self.selected_records())
        } else {
            ExportBatch::from_records(ExportScope::Filtered, self.filtered())
        }
    }
}
