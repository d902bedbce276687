// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use fieldops_app::{
    Creatable, Customer, EntityKind, FormPayload, Invoice, Record, RecordId, StatusKey, Tone,
    WorkOrder, format_cents, format_date,
};
use fieldops_table::{
    Bounds, CheckState, ConfirmPrompt, ExportBatch, ExportRecord, InsertAt, MenuId, Navigator,
    Point, SelectableRecordTable, TagToggle, ToolbarItem,
};
use time::Date;

use crate::TableStatus;

/// A record type the terminal table knows how to lay out.
pub trait PaneRecord: ExportRecord + Creatable {
    fn columns() -> &'static [&'static str];
    fn cells(&self) -> Vec<String>;
}

fn tag_cell<R: Record>(record: &R) -> String {
    record.tags().iter().collect::<Vec<_>>().join(", ")
}

impl PaneRecord for Customer {
    fn columns() -> &'static [&'static str] {
        &["id", "name", "phone", "company", "status", "tags", "jobs", "value"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.phone.clone(),
            self.company.clone(),
            self.status.label().to_owned(),
            tag_cell(self),
            self.total_jobs.to_string(),
            format_cents(self.lifetime_value_cents),
        ]
    }
}

impl PaneRecord for WorkOrder {
    fn columns() -> &'static [&'static str] {
        &[
            "id", "title", "customer", "tech", "date", "priority", "status", "tags",
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.title.clone(),
            self.customer.clone(),
            self.technician.clone(),
            format_date(self.scheduled_for),
            self.priority.as_str().to_owned(),
            self.status.label().to_owned(),
            tag_cell(self),
        ]
    }
}

impl PaneRecord for Invoice {
    fn columns() -> &'static [&'static str] {
        &["id", "customer", "work order", "due", "total", "status", "tags"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.customer.clone(),
            self.work_order
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
            format_date(self.due_on),
            format_cents(self.total_cents),
            self.status.label().to_owned(),
            tag_cell(self),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TabView {
    pub(crate) label: String,
    pub(crate) count: usize,
    pub(crate) tone: Tone,
    pub(crate) active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RowView {
    pub(crate) cells: Vec<String>,
    pub(crate) selected: bool,
    pub(crate) cursor: bool,
    pub(crate) tone: Tone,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MenuItemView {
    pub(crate) label: String,
    pub(crate) marked: bool,
    pub(crate) tone: Tone,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MenuView {
    pub(crate) title: String,
    pub(crate) items: Vec<MenuItemView>,
    pub(crate) cursor: usize,
}

/// Everything the renderer needs for one entity screen, flattened to text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PaneView {
    pub(crate) entity: EntityKind,
    pub(crate) tabs: Vec<TabView>,
    pub(crate) query: String,
    pub(crate) selection_chip: Option<String>,
    pub(crate) toolbar: Vec<ToolbarItem>,
    pub(crate) header_check: CheckState,
    pub(crate) columns: &'static [&'static str],
    pub(crate) rows: Vec<RowView>,
    pub(crate) filtered: usize,
    pub(crate) page: usize,
    pub(crate) total_pages: usize,
    pub(crate) has_prev: bool,
    pub(crate) has_next: bool,
    pub(crate) menu: Option<MenuView>,
    pub(crate) prompt: Option<ConfirmPrompt>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DetailView {
    pub(crate) entity: EntityKind,
    pub(crate) id: RecordId,
    pub(crate) title: String,
    pub(crate) fields: Vec<(String, String)>,
}

/// Entity-independent operations the event loop drives. Implemented once,
/// generically, for every [`EntityPane`].
pub(crate) trait Pane {
    fn view(&self) -> PaneView;

    fn push_query(&mut self, ch: char);
    fn pop_query(&mut self);
    fn cycle_tab(&mut self, delta: isize) -> bool;

    fn move_cursor(&mut self, delta: isize);
    fn cursor_id(&self) -> Option<RecordId>;
    fn toggle_cursor_row(&mut self) -> TableStatus;
    fn toggle_select_all(&mut self) -> TableStatus;
    fn clear_selection(&mut self) -> TableStatus;
    fn change_page(&mut self, delta: isize) -> TableStatus;

    fn open_bulk_status_menu(&mut self) -> TableStatus;
    fn open_tag_menu(&mut self) -> TableStatus;
    fn open_row_status_menu(&mut self) -> TableStatus;
    fn menu_is_open(&self) -> bool;
    fn move_menu_cursor(&mut self, delta: isize);
    fn choose_menu_item(&mut self) -> Option<TableStatus>;
    fn close_menu(&mut self) -> bool;
    fn set_menu_containers(&mut self, containers: Vec<Bounds>);
    fn pointer_down(&mut self, point: Point) -> bool;

    fn request_bulk_delete(&mut self) -> TableStatus;
    fn request_row_delete(&mut self) -> TableStatus;
    fn pending_prompt(&self) -> Option<ConfirmPrompt>;
    fn resolve_delete(&mut self, confirmed: bool) -> TableStatus;

    fn open_cursor_record(&self, navigator: &mut dyn Navigator) -> bool;
    fn detail(&self, id: &RecordId) -> Option<DetailView>;
    fn create(&mut self, payload: &FormPayload, today: Date) -> Result<RecordId>;
    fn export_batch(&self) -> ExportBatch;
}

pub(crate) struct EntityPane<R: PaneRecord> {
    table: SelectableRecordTable<R>,
    cursor: usize,
    menu_cursor: usize,
}

impl<R: PaneRecord> EntityPane<R> {
    pub(crate) fn new(records: Vec<R>, page_size: usize) -> Self {
        Self {
            table: SelectableRecordTable::with_page_size(records, page_size),
            cursor: 0,
            menu_cursor: 0,
        }
    }

    #[cfg(test)]
    pub(crate) fn table(&self) -> &SelectableRecordTable<R> {
        &self.table
    }

    fn clamp_cursor(&mut self) {
        let rows = self.table.page_rows().len();
        self.cursor = self.cursor.min(rows.saturating_sub(1));
    }

    fn status_items(&self, marked: Option<R::Status>) -> Vec<MenuItemView> {
        R::Status::catalog()
            .entries()
            .iter()
            .map(|def| MenuItemView {
                label: def.label.to_owned(),
                marked: marked == Some(def.key),
                tone: def.tone,
            })
            .collect()
    }

    /// Catalog tags first, then any unknown tags found on the selection so
    /// they can still be removed.
    fn tag_items(&self) -> Vec<MenuItemView> {
        let catalog = R::tag_catalog();
        let present = self.table.common_tags();
        let mut items = catalog
            .entries()
            .iter()
            .map(|def| MenuItemView {
                label: def.label.to_owned(),
                marked: present.iter().any(|tag| tag == def.label),
                tone: def.tone,
            })
            .collect::<Vec<_>>();
        for tag in &present {
            if !catalog.is_known(tag) {
                items.push(MenuItemView {
                    label: tag.clone(),
                    marked: true,
                    tone: catalog.tone_for(tag),
                });
            }
        }
        items
    }

    fn menu(&self) -> Option<MenuView> {
        let (title, items) = match self.table.dropdown().active()? {
            MenuId::Status => (
                format!("set status ({} selected)", self.table.selection().len()),
                self.status_items(None),
            ),
            MenuId::Tags => ("toggle tags".to_owned(), self.tag_items()),
            MenuId::RowStatus(id) => (
                format!("status of {id}"),
                self.status_items(self.table.get(id).map(Record::status)),
            ),
        };
        Some(MenuView {
            title,
            cursor: self.menu_cursor.min(items.len().saturating_sub(1)),
            items,
        })
    }

    fn open_menu(&mut self, menu: MenuId) -> bool {
        self.menu_cursor = 0;
        self.table.toggle_menu(menu)
    }

    fn status_at(&self, index: usize) -> Option<R::Status> {
        R::Status::catalog().entries().get(index).map(|def| def.key)
    }
}

impl<R: PaneRecord> Pane for EntityPane<R> {
    fn view(&self) -> PaneView {
        let catalog = R::Status::catalog();
        let rows = self
            .table
            .page_rows()
            .into_iter()
            .enumerate()
            .map(|(index, record)| RowView {
                cells: record.cells(),
                selected: self.table.is_selected(record.id()),
                cursor: index == self.cursor,
                tone: catalog.tone(record.status()),
            })
            .collect();
        let filtered = self.table.filtered_len();
        PaneView {
            entity: R::ENTITY,
            tabs: self
                .table
                .tab_badges()
                .into_iter()
                .map(|badge| TabView {
                    label: badge.label,
                    count: badge.count,
                    tone: badge.tone,
                    active: badge.active,
                })
                .collect(),
            query: self.table.query().to_owned(),
            selection_chip: self.table.selection_summary(),
            toolbar: self.table.toolbar(),
            header_check: self.table.header_checkbox(),
            columns: R::columns(),
            rows,
            filtered,
            page: self.table.current_page(),
            total_pages: self.table.total_pages(),
            has_prev: self.table.has_prev_page(),
            has_next: self.table.has_next_page(),
            menu: self.menu(),
            prompt: self.pending_prompt(),
        }
    }

    fn push_query(&mut self, ch: char) {
        let mut query = self.table.query().to_owned();
        query.push(ch);
        if self.table.set_query(query) {
            self.cursor = 0;
        }
    }

    fn pop_query(&mut self) {
        let mut query = self.table.query().to_owned();
        if query.pop().is_some() && self.table.set_query(query) {
            self.cursor = 0;
        }
    }

    fn cycle_tab(&mut self, delta: isize) -> bool {
        let changed = self.table.cycle_tab(delta);
        if changed {
            self.cursor = 0;
        }
        changed
    }

    fn move_cursor(&mut self, delta: isize) {
        let rows = self.table.page_rows().len();
        if rows == 0 {
            self.cursor = 0;
            return;
        }
        let next = self.cursor as isize + delta;
        self.cursor = next.clamp(0, rows as isize - 1) as usize;
    }

    fn cursor_id(&self) -> Option<RecordId> {
        self.table
            .page_rows()
            .get(self.cursor)
            .map(|record| record.id().clone())
    }

    fn toggle_cursor_row(&mut self) -> TableStatus {
        let Some(id) = self.cursor_id() else {
            return TableStatus::NoRows;
        };
        if self.table.toggle_row(&id) {
            TableStatus::RowSelected(id)
        } else {
            TableStatus::RowDeselected(id)
        }
    }

    fn toggle_select_all(&mut self) -> TableStatus {
        if self.table.filtered_len() == 0 {
            return TableStatus::NoRows;
        }
        self.table.toggle_select_all();
        TableStatus::SelectionSize(self.table.selection().len())
    }

    fn clear_selection(&mut self) -> TableStatus {
        self.table.clear_selection();
        TableStatus::SelectionCleared
    }

    fn change_page(&mut self, delta: isize) -> TableStatus {
        let moved = if delta < 0 {
            self.table.prev_page()
        } else {
            self.table.next_page()
        };
        if !moved {
            return TableStatus::NoMorePages;
        }
        self.cursor = 0;
        TableStatus::Page {
            page: self.table.current_page(),
            total: self.table.total_pages(),
        }
    }

    fn open_bulk_status_menu(&mut self) -> TableStatus {
        if !self.table.has_selection() {
            return TableStatus::NeedSelection("select records to change their status");
        }
        if self.open_menu(MenuId::Status) {
            TableStatus::MenuOpen
        } else {
            TableStatus::MenuClosed
        }
    }

    fn open_tag_menu(&mut self) -> TableStatus {
        if !self.table.has_selection() {
            return TableStatus::NeedSelection("select records to edit tags");
        }
        if self.open_menu(MenuId::Tags) {
            TableStatus::MenuOpen
        } else {
            TableStatus::MenuClosed
        }
    }

    fn open_row_status_menu(&mut self) -> TableStatus {
        let Some(id) = self.cursor_id() else {
            return TableStatus::NoRows;
        };
        if self.open_menu(MenuId::RowStatus(id)) {
            TableStatus::MenuOpen
        } else {
            TableStatus::MenuClosed
        }
    }

    fn menu_is_open(&self) -> bool {
        self.table.dropdown().active().is_some()
    }

    fn move_menu_cursor(&mut self, delta: isize) {
        let Some(menu) = self.menu() else {
            return;
        };
        if menu.items.is_empty() {
            return;
        }
        let next = menu.cursor as isize + delta;
        self.menu_cursor = next.rem_euclid(menu.items.len() as isize) as usize;
    }

    fn choose_menu_item(&mut self) -> Option<TableStatus> {
        let menu = self.table.dropdown().active()?.clone();
        let cursor = self.menu()?.cursor;
        let status = match menu {
            MenuId::Status => {
                let status = self.status_at(cursor)?;
                let count = self.table.bulk_set_status(status);
                TableStatus::StatusSet {
                    label: status.label(),
                    count,
                }
            }
            MenuId::Tags => {
                let label = self.tag_items().get(cursor)?.label.clone();
                match self.table.toggle_tag(&label) {
                    TagToggle::Added(count) => TableStatus::TagAdded { label, count },
                    TagToggle::Removed(count) => TableStatus::TagRemoved { label, count },
                }
            }
            MenuId::RowStatus(id) => {
                let status = self.status_at(cursor)?;
                let changed = self.table.single_status_change(&id, status);
                TableStatus::StatusSet {
                    label: status.label(),
                    count: usize::from(changed),
                }
            }
        };
        // Removing an unknown tag shrinks the open tag menu.
        self.menu_cursor = self.menu().map_or(0, |menu| menu.cursor);
        self.clamp_cursor();
        Some(status)
    }

    fn close_menu(&mut self) -> bool {
        self.table.close_menu()
    }

    fn set_menu_containers(&mut self, containers: Vec<Bounds>) {
        self.table.dropdown_mut().set_containers(containers);
    }

    fn pointer_down(&mut self, point: Point) -> bool {
        self.table.dropdown_mut().pointer_down(point)
    }

    fn request_bulk_delete(&mut self) -> TableStatus {
        match self.table.request_bulk_delete() {
            Some(request) => TableStatus::ConfirmDelete(request.ids.len()),
            None => TableStatus::NeedSelection("select records to delete them"),
        }
    }

    fn request_row_delete(&mut self) -> TableStatus {
        let Some(id) = self.cursor_id() else {
            return TableStatus::NoRows;
        };
        match self.table.request_single_delete(&id) {
            Some(request) => TableStatus::ConfirmDelete(request.ids.len()),
            None => TableStatus::NoRows,
        }
    }

    fn pending_prompt(&self) -> Option<ConfirmPrompt> {
        self.table.pending_delete().map(|request| request.prompt())
    }

    fn resolve_delete(&mut self, confirmed: bool) -> TableStatus {
        let removed = self.table.resolve_pending_delete(confirmed);
        self.clamp_cursor();
        if confirmed {
            TableStatus::Deleted(removed)
        } else {
            TableStatus::DeleteCancelled
        }
    }

    fn open_cursor_record(&self, navigator: &mut dyn Navigator) -> bool {
        match self.cursor_id() {
            Some(id) => self.table.view_record(&id, navigator),
            None => false,
        }
    }

    fn detail(&self, id: &RecordId) -> Option<DetailView> {
        let record = self.table.get(id)?;
        let fields = R::headers()
            .iter()
            .map(|header| (*header).to_owned())
            .zip(record.row())
            .collect();
        Some(DetailView {
            entity: R::ENTITY,
            id: id.clone(),
            title: record.display_name().to_owned(),
            fields,
        })
    }

    fn create(&mut self, payload: &FormPayload, today: Date) -> Result<RecordId> {
        let id = self.table.next_id();
        let record = R::from_form(payload, id.clone(), today)?;
        self.table.insert(record, InsertAt::Head)?;
        self.table.go_to_page(1);
        self.cursor = 0;
        Ok(id)
    }

    fn export_batch(&self) -> ExportBatch {
        self.table.export_batch()
    }
}
