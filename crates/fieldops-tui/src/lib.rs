// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod pane;

use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyModifiers,
    MouseButton, MouseEventKind,
};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use fieldops_app::{
    AppCommand, AppMode, AppState, Customer, EntityKind, FormPayload, Invoice, RecordId, Tone,
    WorkOrder,
};
use fieldops_table::{
    Bounds, CheckState, ExportBatch, Navigator, Point, PointerListener, PointerSource,
    ToolbarAction,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Tabs};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use time::Date;
use tracing::{info, warn};

use pane::{DetailView, EntityPane, MenuView, Pane, PaneView};

const MENU_WIDTH: u16 = 34;
const MENU_TOP: u16 = 7;

/// Seed records for the three entity tables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityRecords {
    pub customers: Vec<Customer>,
    pub work_orders: Vec<WorkOrder>,
    pub invoices: Vec<Invoice>,
}

/// Collaborators the terminal UI needs from its host.
pub trait AppRuntime {
    fn load_records(&mut self) -> Result<EntityRecords>;
    fn page_size(&self) -> usize;
    fn today(&self) -> Date;
    /// A filled-in creation form for `entity`.
    fn draft_form(&mut self, entity: EntityKind) -> Result<FormPayload>;
    /// Writes the batch somewhere and returns a short description of where.
    fn export(&mut self, batch: &ExportBatch) -> Result<String>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum TableStatus {
    NoRows,
    RowSelected(RecordId),
    RowDeselected(RecordId),
    SelectionSize(usize),
    SelectionCleared,
    NeedSelection(&'static str),
    Page { page: usize, total: usize },
    NoMorePages,
    MenuOpen,
    MenuClosed,
    StatusSet { label: &'static str, count: usize },
    TagAdded { label: String, count: usize },
    TagRemoved { label: String, count: usize },
    ConfirmDelete(usize),
    Deleted(usize),
    DeleteCancelled,
}

impl TableStatus {
    fn message(self) -> String {
        match self {
            Self::NoRows => "no rows".to_owned(),
            Self::RowSelected(id) => format!("selected {id}"),
            Self::RowDeselected(id) => format!("deselected {id}"),
            Self::SelectionSize(count) => format!("{count} selected"),
            Self::SelectionCleared => "selection cleared".to_owned(),
            Self::NeedSelection(hint) => hint.to_owned(),
            Self::Page { page, total } => format!("page {page} of {total}"),
            Self::NoMorePages => "no more pages".to_owned(),
            Self::MenuOpen => "menu open".to_owned(),
            Self::MenuClosed => "menu closed".to_owned(),
            Self::StatusSet { label, count } => format!("status {label} set on {count}"),
            Self::TagAdded { label, count } => format!("tag {label} added to {count}"),
            Self::TagRemoved { label, count } => format!("tag {label} removed from {count}"),
            Self::ConfirmDelete(count) => format!("delete {count}? y/n"),
            Self::Deleted(count) => format!("deleted {count}"),
            Self::DeleteCancelled => "delete cancelled".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InternalEvent {
    ClearStatus { token: u64 },
}

/// Terminal mouse reporting. Enabled while the table view is mounted so
/// presses outside an open menu can close it.
struct MouseCapture;

impl PointerSource for MouseCapture {
    type Error = io::Error;

    fn attach(&mut self) -> io::Result<()> {
        execute!(io::stdout(), EnableMouseCapture)
    }

    fn detach(&mut self) {
        if let Err(error) = execute!(io::stdout(), DisableMouseCapture) {
            warn!(%error, "disable mouse capture");
        }
    }
}

/// Records where the user asked to go; the loop turns it into a detail
/// overlay.
#[derive(Debug, Default)]
struct DetailRoute {
    target: Option<(EntityKind, RecordId)>,
}

impl Navigator for DetailRoute {
    fn open_record(&mut self, entity: EntityKind, id: &RecordId) {
        self.target = Some((entity, id.clone()));
    }
}

struct ViewData {
    customers: EntityPane<Customer>,
    work_orders: EntityPane<WorkOrder>,
    invoices: EntityPane<Invoice>,
    detail: Option<DetailView>,
    help_visible: bool,
    status_token: u64,
}

impl ViewData {
    fn new(records: EntityRecords, page_size: usize) -> Self {
        Self {
            customers: EntityPane::new(records.customers, page_size),
            work_orders: EntityPane::new(records.work_orders, page_size),
            invoices: EntityPane::new(records.invoices, page_size),
            detail: None,
            help_visible: false,
            status_token: 0,
        }
    }

    fn pane(&self, entity: EntityKind) -> &dyn Pane {
        match entity {
            EntityKind::Customers => &self.customers,
            EntityKind::WorkOrders => &self.work_orders,
            EntityKind::Invoices => &self.invoices,
        }
    }

    fn pane_mut(&mut self, entity: EntityKind) -> &mut dyn Pane {
        match entity {
            EntityKind::Customers => &mut self.customers,
            EntityKind::WorkOrders => &mut self.work_orders,
            EntityKind::Invoices => &mut self.invoices,
        }
    }
}

pub fn run_app<R: AppRuntime>(state: &mut AppState, runtime: &mut R) -> Result<()> {
    let records = runtime.load_records().context("load records")?;
    let mut view_data = ViewData::new(records, runtime.page_size());

    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;
    let mouse = PointerListener::attach(MouseCapture).context("enable mouse capture")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;
    let (internal_tx, internal_rx) = mpsc::channel();

    let mut result = Ok(());
    loop {
        process_internal_events(state, &mut view_data, &internal_rx);

        if let Err(error) = terminal.draw(|frame| render(frame, state, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }
        match terminal.size() {
            Ok(size) => sync_menu_containers(
                state,
                &mut view_data,
                Rect::new(0, 0, size.width, size.height),
            ),
            Err(error) => {
                result = Err(error).context("read terminal size");
                break;
            }
        }

        let has_event = event::poll(Duration::from_millis(120)).context("poll event")?;
        if has_event {
            match event::read().context("read event")? {
                Event::Key(key) => {
                    if handle_key_event(state, runtime, &mut view_data, &internal_tx, key) {
                        break;
                    }
                }
                Event::Mouse(mouse_event) => {
                    if mouse_event.kind == MouseEventKind::Down(MouseButton::Left) {
                        handle_pointer_down(
                            state,
                            &mut view_data,
                            &internal_tx,
                            Point::new(mouse_event.column, mouse_event.row),
                        );
                    }
                }
                _ => {}
            }
        }
    }

    drop(mouse);
    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn process_internal_events(
    state: &mut AppState,
    view_data: &mut ViewData,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                state.dispatch(AppCommand::ClearStatus);
            }
            InternalEvent::ClearStatus { .. } => {}
        }
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(Duration::from_secs(4));
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn emit_status(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    state.dispatch(AppCommand::SetStatus(message.into()));
    view_data.status_token = view_data.status_token.saturating_add(1);
    schedule_status_clear(internal_tx, view_data.status_token);
}

/// Registers the open menu's screen area with the active table so outside
/// presses can be told apart from presses on the menu.
fn sync_menu_containers(state: &AppState, view_data: &mut ViewData, area: Rect) {
    let pane = view_data.pane_mut(state.active_entity);
    let containers = pane
        .view()
        .menu
        .map(|menu| {
            let rect = menu_area(area, menu.items.len());
            vec![Bounds::new(rect.x, rect.y, rect.width, rect.height)]
        })
        .unwrap_or_default();
    pane.set_menu_containers(containers);
}

fn handle_pointer_down(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    point: Point,
) {
    if view_data.pane_mut(state.active_entity).pointer_down(point) {
        emit_status(state, view_data, internal_tx, TableStatus::MenuClosed.message());
    }
}

/// Returns true when the app should quit.
fn handle_key_event<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    if view_data.detail.is_some() {
        if matches!(
            key.code,
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')
        ) {
            view_data.detail = None;
        }
        return false;
    }

    if view_data.help_visible {
        view_data.help_visible = false;
        return false;
    }

    let entity = state.active_entity;
    if view_data.pane(entity).pending_prompt().is_some() {
        let answer = match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => Some(true),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Some(false),
            _ => None,
        };
        if let Some(confirmed) = answer {
            let status = view_data.pane_mut(entity).resolve_delete(confirmed);
            emit_status(state, view_data, internal_tx, status.message());
        }
        return false;
    }

    if state.mode == AppMode::Search {
        handle_search_key(state, view_data, key);
        return false;
    }

    if view_data.pane(entity).menu_is_open() && handle_menu_key(state, view_data, internal_tx, key)
    {
        return false;
    }

    handle_nav_key(state, runtime, view_data, internal_tx, key)
}

fn handle_search_key(state: &mut AppState, view_data: &mut ViewData, key: KeyEvent) {
    let pane = view_data.pane_mut(state.active_entity);
    match key.code {
        KeyCode::Esc | KeyCode::Enter => {
            state.dispatch(AppCommand::ExitSearch);
        }
        KeyCode::Backspace => pane.pop_query(),
        KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            pane.push_query(ch);
        }
        _ => {}
    }
}

/// Returns whether the key was consumed by the open menu.
fn handle_menu_key(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    let pane = view_data.pane_mut(state.active_entity);
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => pane.move_menu_cursor(1),
        KeyCode::Char('k') | KeyCode::Up => pane.move_menu_cursor(-1),
        KeyCode::Esc => {
            pane.close_menu();
            emit_status(state, view_data, internal_tx, TableStatus::MenuClosed.message());
        }
        KeyCode::Enter => {
            if let Some(status) = pane.choose_menu_item() {
                emit_status(state, view_data, internal_tx, status.message());
            }
        }
        _ => return false,
    }
    true
}

fn handle_nav_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    let entity = state.active_entity;
    let status = match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Tab | KeyCode::BackTab => {
            view_data.pane_mut(entity).close_menu();
            let command = if key.code == KeyCode::Tab {
                AppCommand::NextEntity
            } else {
                AppCommand::PrevEntity
            };
            state.dispatch(command);
            None
        }
        KeyCode::Char('?') => {
            view_data.help_visible = true;
            None
        }
        KeyCode::Char('/') => {
            view_data.pane_mut(entity).close_menu();
            state.dispatch(AppCommand::EnterSearch);
            None
        }
        KeyCode::Char('[') => {
            view_data.pane_mut(entity).cycle_tab(-1);
            None
        }
        KeyCode::Char(']') => {
            view_data.pane_mut(entity).cycle_tab(1);
            None
        }
        KeyCode::Char('j') | KeyCode::Down => {
            view_data.pane_mut(entity).move_cursor(1);
            None
        }
        KeyCode::Char('k') | KeyCode::Up => {
            view_data.pane_mut(entity).move_cursor(-1);
            None
        }
        KeyCode::Char('h') | KeyCode::Left => Some(view_data.pane_mut(entity).change_page(-1)),
        KeyCode::Char('l') | KeyCode::Right => Some(view_data.pane_mut(entity).change_page(1)),
        KeyCode::Char(' ') => Some(view_data.pane_mut(entity).toggle_cursor_row()),
        KeyCode::Char('a') => Some(view_data.pane_mut(entity).toggle_select_all()),
        KeyCode::Char('c') => Some(view_data.pane_mut(entity).clear_selection()),
        KeyCode::Char('s') => Some(view_data.pane_mut(entity).open_bulk_status_menu()),
        KeyCode::Char('t') => Some(view_data.pane_mut(entity).open_tag_menu()),
        KeyCode::Char('e') => Some(view_data.pane_mut(entity).open_row_status_menu()),
        KeyCode::Char('d') => Some(view_data.pane_mut(entity).request_bulk_delete()),
        KeyCode::Char('x') => Some(view_data.pane_mut(entity).request_row_delete()),
        KeyCode::Enter => {
            open_detail(view_data, entity);
            None
        }
        KeyCode::Char('+') => {
            let message = create_record(runtime, view_data, entity);
            emit_status(state, view_data, internal_tx, message);
            None
        }
        KeyCode::Char('E') => {
            let message = export_table(runtime, view_data, entity);
            emit_status(state, view_data, internal_tx, message);
            None
        }
        _ => None,
    };
    if let Some(status) = status {
        emit_status(state, view_data, internal_tx, status.message());
    }
    false
}

fn open_detail(view_data: &mut ViewData, entity: EntityKind) {
    let mut route = DetailRoute::default();
    if !view_data.pane(entity).open_cursor_record(&mut route) {
        return;
    }
    if let Some((target, id)) = route.target {
        view_data.detail = view_data.pane(target).detail(&id);
    }
}

fn create_record<R: AppRuntime>(
    runtime: &mut R,
    view_data: &mut ViewData,
    entity: EntityKind,
) -> String {
    let today = runtime.today();
    let created = runtime
        .draft_form(entity)
        .and_then(|payload| view_data.pane_mut(entity).create(&payload, today));
    match created {
        Ok(id) => {
            info!(entity = entity.as_str(), %id, "record created");
            format!("created {id}")
        }
        Err(error) => {
            let message = format!("create failed: {error:#}");
            warn!(entity = entity.as_str(), "{message}");
            message
        }
    }
}

fn export_table<R: AppRuntime>(
    runtime: &mut R,
    view_data: &ViewData,
    entity: EntityKind,
) -> String {
    let batch = view_data.pane(entity).export_batch();
    let rows = batch.len();
    let scope = batch.scope.as_str();
    match runtime.export(&batch) {
        Ok(destination) => format!("exported {rows} {scope} rows to {destination}"),
        Err(error) => format!("export failed: {error:#}"),
    }
}

fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Neutral => Color::Gray,
        Tone::Info => Color::Cyan,
        Tone::Success => Color::Green,
        Tone::Warning => Color::Yellow,
        Tone::Danger => Color::Red,
        Tone::Accent => Color::Magenta,
    }
}

fn check_glyph(state: CheckState) -> &'static str {
    match state {
        CheckState::Unchecked => "[ ]",
        CheckState::Checked => "[x]",
        CheckState::Indeterminate => "[-]",
    }
}

fn render(frame: &mut ratatui::Frame<'_>, state: &AppState, view_data: &ViewData) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(2),
        ])
        .split(frame.area());

    let selected = EntityKind::ALL
        .iter()
        .position(|entity| *entity == state.active_entity)
        .unwrap_or(0);
    let titles = EntityKind::ALL
        .iter()
        .map(|entity| entity.label().to_owned())
        .collect::<Vec<String>>();
    let tabs = Tabs::new(titles)
        .block(Block::default().title("fieldops").borders(Borders::ALL))
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .select(selected);
    frame.render_widget(tabs, layout[0]);

    let view = view_data.pane(state.active_entity).view();
    frame.render_widget(filter_bar(state, &view), layout[1]);
    frame.render_widget(Paragraph::new(toolbar_line(&view)), layout[2]);
    render_table(frame, layout[3], &view);
    frame.render_widget(Paragraph::new(pager_line(&view)), layout[4]);

    let status = Paragraph::new(status_text(state))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(status, layout[5]);

    if let Some(menu) = &view.menu {
        render_menu(frame, menu);
    }

    if let Some(prompt) = &view.prompt {
        let area = centered_rect(50, 20, frame.area());
        frame.render_widget(Clear, area);
        let dialog = Paragraph::new(format!("{}\n\n[y] delete   [n] cancel", prompt.message))
            .block(
                Block::default()
                    .title(prompt.title.clone())
                    .borders(Borders::ALL)
                    .style(Style::default().fg(Color::Red)),
            );
        frame.render_widget(dialog, area);
    }

    if let Some(detail) = &view_data.detail {
        let area = centered_rect(60, 60, frame.area());
        frame.render_widget(Clear, area);
        let detail_widget = Paragraph::new(render_detail_text(detail)).block(
            Block::default()
                .title(format!("{} {}", detail.entity.singular(), detail.id))
                .borders(Borders::ALL),
        );
        frame.render_widget(detail_widget, area);
    }

    if view_data.help_visible {
        let area = centered_rect(80, 60, frame.area());
        frame.render_widget(Clear, area);
        let help = Paragraph::new(help_overlay_text())
            .block(Block::default().title("help").borders(Borders::ALL));
        frame.render_widget(help, area);
    }
}

fn filter_bar<'a>(state: &AppState, view: &'a PaneView) -> Paragraph<'a> {
    let mut spans = Vec::new();
    for (index, tab) in view.tabs.iter().enumerate() {
        if index > 0 {
            spans.push(Span::raw(" | "));
        }
        let mut style = Style::default().fg(tone_color(tab.tone));
        if tab.active {
            style = style.add_modifier(Modifier::BOLD | Modifier::REVERSED);
        }
        spans.push(Span::styled(format!("{} ({})", tab.label, tab.count), style));
    }
    let searching = state.mode == AppMode::Search;
    let cursor = if searching { "_" } else { "" };
    spans.push(Span::raw("   "));
    spans.push(Span::styled(
        format!("/ {}{cursor}", view.query),
        if searching {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        },
    ));
    Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title(view.entity.label()))
}

fn toolbar_line(view: &PaneView) -> Line<'static> {
    let mut spans = Vec::new();
    if let Some(chip) = &view.selection_chip {
        spans.push(Span::styled(
            format!(" {chip} (c clear) "),
            Style::default().fg(Color::Black).bg(Color::Cyan),
        ));
        spans.push(Span::raw(" "));
    }
    let mut hint = None;
    for item in &view.toolbar {
        let key = match item.action {
            ToolbarAction::SetStatus => "s",
            ToolbarAction::Tags => "t",
            ToolbarAction::Delete => "d",
            ToolbarAction::Export => "E",
        };
        let style = if item.enabled {
            Style::default().fg(Color::White)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(format!("[{key}] {} ", item.action.label()), style));
        if hint.is_none() {
            hint = item.hint;
        }
    }
    if let Some(hint) = hint {
        spans.push(Span::styled(
            format!(" {hint}"),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ));
    }
    Line::from(spans)
}

fn render_table(frame: &mut ratatui::Frame<'_>, area: Rect, view: &PaneView) {
    let status_column = view.columns.iter().position(|column| *column == "status");
    let mut widths = vec![Constraint::Length(3)];
    widths.extend(view.columns.iter().map(|_| Constraint::Min(6)));

    let header = Row::new(
        std::iter::once(check_glyph(view.header_check).to_owned())
            .chain(view.columns.iter().map(|column| (*column).to_owned()))
            .map(|label| {
                Cell::from(label).style(
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                )
            })
            .collect::<Vec<_>>(),
    );

    let rows = view.rows.iter().map(|row| {
        let mut row_style = Style::default();
        if row.selected {
            row_style = row_style.add_modifier(Modifier::BOLD);
        }
        if row.cursor {
            row_style = row_style.bg(Color::DarkGray);
        }
        let check = if row.selected { "[x]" } else { "[ ]" };
        let cells = std::iter::once(Cell::from(check))
            .chain(row.cells.iter().enumerate().map(|(index, value)| {
                let cell = Cell::from(value.clone());
                if Some(index) == status_column {
                    cell.style(Style::default().fg(tone_color(row.tone)))
                } else {
                    cell
                }
            }))
            .collect::<Vec<_>>();
        Row::new(cells).style(row_style)
    });

    let title = if view.rows.is_empty() {
        format!("{} (no matching rows)", view.entity.label())
    } else {
        format!("{} ({} rows)", view.entity.label(), view.filtered)
    };
    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(table, area);
}

fn pager_line(view: &PaneView) -> Line<'static> {
    let enabled = Style::default().fg(Color::White);
    let disabled = Style::default().fg(Color::DarkGray);
    Line::from(vec![
        Span::styled("[h] prev ", if view.has_prev { enabled } else { disabled }),
        Span::raw(format!("page {} of {} ", view.page, view.total_pages)),
        Span::styled("[l] next", if view.has_next { enabled } else { disabled }),
    ])
}

/// Screen area of an open menu. Anchored top-right below the toolbar.
fn menu_area(area: Rect, items: usize) -> Rect {
    let width = MENU_WIDTH.min(area.width);
    let height = (items as u16).saturating_add(2).min(area.height.saturating_sub(MENU_TOP));
    Rect::new(
        area.width.saturating_sub(width + 1),
        MENU_TOP.min(area.height),
        width,
        height,
    )
}

fn render_menu(frame: &mut ratatui::Frame<'_>, menu: &MenuView) {
    let area = menu_area(frame.area(), menu.items.len());
    frame.render_widget(Clear, area);
    let lines = menu
        .items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let marker = if item.marked { "* " } else { "  " };
            let mut style = Style::default().fg(tone_color(item.tone));
            if index == menu.cursor {
                style = style.add_modifier(Modifier::REVERSED);
            }
            Line::from(Span::styled(format!("{marker}{}", item.label), style))
        })
        .collect::<Vec<_>>();
    let widget = Paragraph::new(lines).block(
        Block::default()
            .title(menu.title.clone())
            .borders(Borders::ALL),
    );
    frame.render_widget(widget, area);
}

fn render_detail_text(detail: &DetailView) -> String {
    let width = detail
        .fields
        .iter()
        .map(|(label, _)| label.len())
        .max()
        .unwrap_or(0);
    let mut lines = vec![detail.title.clone(), String::new()];
    lines.extend(
        detail
            .fields
            .iter()
            .map(|(label, value)| format!("{label:<width$}  {value}")),
    );
    lines.push(String::new());
    lines.push("esc close".to_owned());
    lines.join("\n")
}

fn status_text(state: &AppState) -> String {
    if let Some(status) = &state.status_line {
        return status.clone();
    }
    match state.mode {
        AppMode::Search => "search: type to filter | enter/esc done".to_owned(),
        AppMode::Nav => "? help | q quit".to_owned(),
    }
}

fn help_overlay_text() -> &'static str {
    "global: ctrl+c quit | q quit | ? help\n\
nav: tab/shift+tab entity | [/] status tab | / search | j/k row | h/l page\n\
select: space row | a all filtered | c clear\n\
bulk: s status menu | t tag menu | d delete selected | E export\n\
row: e status menu | x delete | enter view | + create\n\
menu: j/k move | enter apply | esc close | click outside closes\n\
confirm: y delete | n cancel"
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::{
        AppRuntime, EntityRecords, InternalEvent, TableStatus, ViewData, handle_key_event,
        handle_pointer_down, help_overlay_text, menu_area, process_internal_events, render,
        render_detail_text, status_text, sync_menu_containers,
    };
    use anyhow::Result;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use fieldops_app::{
        AppMode, AppState, Customer, CustomerStatus, EntityKind, FormPayload, RecordId, TagList,
    };
    use fieldops_table::{CheckState, ExportBatch, ExportScope, Point};
    use fieldops_testkit::{FieldFaker, reference_date};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::layout::Rect;
    use std::sync::mpsc;
    use time::Date;

    const SCREEN: Rect = Rect {
        x: 0,
        y: 0,
        width: 100,
        height: 30,
    };

    struct TestRuntime {
        faker: FieldFaker,
        customers: Vec<Customer>,
        exported: Vec<(ExportScope, usize)>,
    }

    impl TestRuntime {
        fn new(count: usize) -> Self {
            let customers = (1..=count)
                .map(|index| Customer {
                    id: RecordId::new(format!("CUS-{index:04}")),
                    name: format!("Customer {index}"),
                    email: format!("customer{index}@example.com"),
                    phone: format!("(555) 010-01{index:02}"),
                    company: String::new(),
                    address: String::new(),
                    status: CustomerStatus::Active,
                    tags: TagList::new(),
                    total_jobs: 0,
                    lifetime_value_cents: 0,
                    customer_since: reference_date(),
                })
                .collect();
            Self {
                faker: FieldFaker::new(7),
                customers,
                exported: Vec::new(),
            }
        }
    }

    impl AppRuntime for TestRuntime {
        fn load_records(&mut self) -> Result<EntityRecords> {
            Ok(EntityRecords {
                customers: self.customers.clone(),
                ..EntityRecords::default()
            })
        }

        fn page_size(&self) -> usize {
            10
        }

        fn today(&self) -> Date {
            reference_date()
        }

        fn draft_form(&mut self, entity: EntityKind) -> Result<FormPayload> {
            Ok(self.faker.form_draft(entity))
        }

        fn export(&mut self, batch: &ExportBatch) -> Result<String> {
            self.exported.push((batch.scope, batch.len()));
            Ok("memory".to_owned())
        }
    }

    struct Harness {
        state: AppState,
        runtime: TestRuntime,
        view_data: ViewData,
        tx: mpsc::Sender<InternalEvent>,
    }

    impl Harness {
        fn new(count: usize) -> Self {
            Self::with_runtime(TestRuntime::new(count))
        }

        fn with_runtime(mut runtime: TestRuntime) -> Self {
            let records = runtime.load_records().expect("records");
            let view_data = ViewData::new(records, runtime.page_size());
            let (tx, _rx) = mpsc::channel();
            Self {
                state: AppState::default(),
                runtime,
                view_data,
                tx,
            }
        }

        fn key(&mut self, code: KeyCode) -> bool {
            self.key_with(code, KeyModifiers::NONE)
        }

        fn key_with(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
            handle_key_event(
                &mut self.state,
                &mut self.runtime,
                &mut self.view_data,
                &self.tx,
                KeyEvent::new(code, modifiers),
            )
        }

        fn keys(&mut self, script: &str) {
            for ch in script.chars() {
                assert!(!self.key(KeyCode::Char(ch)), "{ch:?} quit the app");
            }
        }

        fn view(&self) -> super::PaneView {
            self.view_data.pane(self.state.active_entity).view()
        }

        fn status(&self) -> Option<&str> {
            self.state.status_line.as_deref()
        }
    }

    #[test]
    fn space_toggles_the_cursor_row() {
        let mut app = Harness::new(12);
        app.keys("j ");
        let view = app.view();
        assert!(view.rows[1].selected);
        assert_eq!(view.header_check, CheckState::Indeterminate);
        assert_eq!(view.selection_chip.as_deref(), Some("1 customer selected"));
        assert_eq!(app.status(), Some("selected CUS-0002"));

        app.keys(" ");
        assert!(!app.view().rows[1].selected);
        assert_eq!(app.status(), Some("deselected CUS-0002"));
    }

    #[test]
    fn select_all_covers_rows_on_every_page() {
        let mut app = Harness::new(12);
        app.keys("a");
        assert_eq!(app.status(), Some("12 selected"));
        assert_eq!(app.view().header_check, CheckState::Checked);

        app.keys("l");
        assert!(app.view().rows.iter().all(|row| row.selected));

        app.keys("c");
        assert_eq!(app.view().selection_chip, None);
        assert_eq!(app.status(), Some("selection cleared"));
    }

    #[test]
    fn bulk_menus_need_a_selection() {
        let mut app = Harness::new(3);
        app.keys("s");
        assert!(app.view().menu.is_none());
        assert_eq!(app.status(), Some("select records to change their status"));

        let toolbar = app.view().toolbar;
        assert!(toolbar.iter().any(|item| !item.enabled && item.hint.is_some()));
    }

    #[test]
    fn status_menu_applies_and_closes() {
        let mut app = Harness::new(3);
        app.keys(" s");
        let menu = app.view().menu.expect("status menu open");
        assert_eq!(menu.items[1].label, "VIP");

        app.keys("j");
        app.key(KeyCode::Enter);
        assert!(app.view().menu.is_none());
        assert_eq!(app.status(), Some("status VIP set on 1"));
        assert_eq!(app.view().rows[0].cells[4], "VIP");
        let vip_tab = app
            .view()
            .tabs
            .into_iter()
            .find(|tab| tab.label == "VIP")
            .expect("vip tab");
        assert_eq!(vip_tab.count, 1);
    }

    #[test]
    fn tag_menu_stays_open_and_toggles() {
        let mut app = Harness::new(3);
        app.keys("at");
        assert!(app.view().menu.is_some());

        app.key(KeyCode::Enter);
        assert_eq!(app.status(), Some("tag VIP added to 3"));
        let menu = app.view().menu.expect("tag menu still open");
        assert!(menu.items[0].marked);

        app.key(KeyCode::Enter);
        assert_eq!(app.status(), Some("tag VIP removed from 3"));
        app.key(KeyCode::Esc);
        assert!(app.view().menu.is_none());
    }

    #[test]
    fn tag_menu_cursor_follows_a_shrinking_list() {
        let mut runtime = TestRuntime::new(2);
        runtime.customers[0].tags.insert("Legacy");
        let mut app = Harness::with_runtime(runtime);
        app.keys(" tk");
        let menu = app.view().menu.expect("tag menu open");
        assert_eq!(menu.items[menu.cursor].label, "Legacy");

        app.key(KeyCode::Enter);
        assert_eq!(app.status(), Some("tag Legacy removed from 1"));
        let menu = app.view().menu.expect("tag menu still open");
        assert_eq!(menu.cursor, menu.items.len() - 1);
        let highlighted = menu.items[menu.cursor].label.clone();

        app.key(KeyCode::Enter);
        let expected = format!("tag {highlighted} added to 1");
        assert_eq!(app.status(), Some(expected.as_str()));
    }

    #[test]
    fn row_status_menu_targets_the_cursor_row_only() {
        let mut app = Harness::new(3);
        app.keys("jje");
        let menu = app.view().menu.expect("row menu");
        assert_eq!(menu.title, "status of CUS-0003");
        assert!(menu.items[0].marked);

        app.keys("jjj");
        app.key(KeyCode::Enter);
        let view = app.view();
        assert_eq!(view.rows[2].cells[4], "Inactive");
        assert_eq!(view.rows[0].cells[4], "Active");
        assert!(view.menu.is_none());
    }

    #[test]
    fn declined_delete_keeps_records() {
        let mut app = Harness::new(3);
        app.keys(" d");
        let prompt = app.view().prompt.expect("confirm prompt");
        assert_eq!(prompt.title, "Delete customers");
        assert_eq!(app.status(), Some("delete 1? y/n"));

        app.keys("n");
        assert!(app.view().prompt.is_none());
        assert_eq!(app.view().filtered, 3);
        assert_eq!(app.status(), Some("delete cancelled"));
        assert!(app.view().rows[0].selected);
    }

    #[test]
    fn confirmed_bulk_delete_clears_selection() {
        let mut app = Harness::new(12);
        app.keys("a");
        app.key(KeyCode::Char('d'));
        app.key(KeyCode::Char('y'));
        let view = app.view();
        assert_eq!(view.filtered, 0);
        assert_eq!(view.selection_chip, None);
        assert_eq!(view.total_pages, 1);
        assert_eq!(app.status(), Some("deleted 12"));
    }

    #[test]
    fn row_delete_removes_only_the_cursor_row() {
        let mut app = Harness::new(3);
        app.keys("j");
        app.keys("x");
        let prompt = app.view().prompt.expect("confirm prompt");
        assert_eq!(prompt.title, "Delete customer");
        app.key(KeyCode::Enter);
        let ids = app
            .view()
            .rows
            .iter()
            .map(|row| row.cells[0].clone())
            .collect::<Vec<_>>();
        assert_eq!(ids, vec!["CUS-0001", "CUS-0003"]);
    }

    #[test]
    fn keys_are_ignored_while_confirming() {
        let mut app = Harness::new(3);
        app.keys(" d");
        assert!(!app.key(KeyCode::Char('q')));
        assert!(app.view().prompt.is_some());
    }

    #[test]
    fn search_resets_to_first_page() {
        let mut app = Harness::new(12);
        app.keys("l");
        assert_eq!(app.view().page, 2);

        app.keys("/customer 1");
        assert_eq!(app.state.mode, AppMode::Search);
        let view = app.view();
        assert_eq!(view.query, "customer 1");
        assert_eq!(view.page, 1);
        assert_eq!(view.filtered, 4);

        app.key(KeyCode::Backspace);
        assert_eq!(app.view().filtered, 12);
        app.key(KeyCode::Esc);
        assert_eq!(app.state.mode, AppMode::Nav);
    }

    #[test]
    fn q_types_into_the_search_box() {
        let mut app = Harness::new(3);
        app.keys("/");
        assert!(!app.key(KeyCode::Char('q')));
        assert_eq!(app.view().query, "q");
        app.key(KeyCode::Enter);
        assert!(app.key(KeyCode::Char('q')));
    }

    #[test]
    fn ctrl_c_quits_from_any_mode() {
        let mut app = Harness::new(3);
        app.keys("/");
        assert!(app.key_with(KeyCode::Char('c'), KeyModifiers::CONTROL));
    }

    #[test]
    fn brackets_cycle_status_tabs() {
        let mut app = Harness::new(3);
        app.keys("]");
        let active = app
            .view()
            .tabs
            .into_iter()
            .find(|tab| tab.active)
            .expect("active tab");
        assert_eq!(active.label, "Active");
        app.keys("]");
        assert_eq!(app.view().filtered, 0);
        app.keys("[[");
        assert_eq!(app.view().filtered, 3);
    }

    #[test]
    fn page_keys_report_the_edges() {
        let mut app = Harness::new(12);
        app.keys("h");
        assert_eq!(app.status(), Some("no more pages"));
        app.keys("l");
        assert_eq!(app.status(), Some("page 2 of 2"));
        app.keys("l");
        assert_eq!(app.status(), Some("no more pages"));
    }

    #[test]
    fn switching_entity_closes_the_open_menu() {
        let mut app = Harness::new(3);
        app.keys(" s");
        app.key(KeyCode::Tab);
        assert_eq!(app.state.active_entity, EntityKind::WorkOrders);
        assert!(app.view_data.customers.table().dropdown().active().is_none());

        app.key(KeyCode::BackTab);
        assert_eq!(app.state.active_entity, EntityKind::Customers);
        assert!(app.view().menu.is_none());
        assert!(app.view().rows[0].selected);
    }

    #[test]
    fn click_outside_the_menu_closes_it() {
        let mut app = Harness::new(3);
        app.keys(" s");
        sync_menu_containers(&app.state, &mut app.view_data, SCREEN);
        let area = menu_area(SCREEN, 4);

        handle_pointer_down(
            &mut app.state,
            &mut app.view_data,
            &app.tx,
            Point::new(area.x + 1, area.y + 1),
        );
        assert!(app.view().menu.is_some());

        handle_pointer_down(&mut app.state, &mut app.view_data, &app.tx, Point::new(0, 0));
        assert!(app.view().menu.is_none());
        assert_eq!(app.status(), Some("menu closed"));
    }

    #[test]
    fn menu_area_stays_on_screen() {
        let area = menu_area(SCREEN, 4);
        assert_eq!(area, Rect::new(65, 7, 34, 6));

        let tiny = menu_area(Rect::new(0, 0, 20, 8), 10);
        assert!(tiny.x + tiny.width <= 20);
        assert!(tiny.y + tiny.height <= 8);
    }

    #[test]
    fn enter_opens_detail_and_esc_closes_it() {
        let mut app = Harness::new(3);
        app.key(KeyCode::Enter);
        let detail = app.view_data.detail.clone().expect("detail open");
        assert_eq!(detail.id, RecordId::new("CUS-0001"));
        assert_eq!(detail.title, "Customer 1");

        let text = render_detail_text(&detail);
        assert!(text.contains("customer1@example.com"));

        app.keys("a");
        assert!(app.view().selection_chip.is_none());
        app.key(KeyCode::Esc);
        assert!(app.view_data.detail.is_none());
    }

    #[test]
    fn plus_creates_a_record_at_the_top() {
        let mut app = Harness::new(12);
        app.keys("l+");
        assert_eq!(app.status(), Some("created CUS-0013"));
        let view = app.view();
        assert_eq!(view.page, 1);
        assert_eq!(view.rows[0].cells[0], "CUS-0013");
        assert!(view.rows[0].cursor);
        assert_eq!(view.tabs[0].count, 13);
    }

    #[test]
    fn export_prefers_the_selection() {
        let mut app = Harness::new(5);
        app.keys("E");
        app.keys(" jE");
        assert_eq!(
            app.runtime.exported,
            vec![(ExportScope::Filtered, 5), (ExportScope::Selection, 1)]
        );
        assert_eq!(app.status(), Some("exported 1 selection rows to memory"));
    }

    #[test]
    fn help_overlay_swallows_the_next_key() {
        let mut app = Harness::new(3);
        app.keys("?");
        assert!(app.view_data.help_visible);
        assert!(!app.key(KeyCode::Char('q')));
        assert!(!app.view_data.help_visible);
        assert!(help_overlay_text().contains("click outside closes"));
    }

    #[test]
    fn stale_clear_tokens_are_ignored() {
        let mut app = Harness::new(3);
        app.keys(" ");
        app.keys(" ");
        let (tx, rx) = mpsc::channel();
        tx.send(InternalEvent::ClearStatus { token: 1 })
            .expect("send stale token");
        process_internal_events(&mut app.state, &mut app.view_data, &rx);
        assert_eq!(app.status(), Some("deselected CUS-0001"));

        tx.send(InternalEvent::ClearStatus { token: 2 })
            .expect("send current token");
        process_internal_events(&mut app.state, &mut app.view_data, &rx);
        assert_eq!(status_text(&app.state), "? help | q quit");
    }

    #[test]
    fn status_messages_read_naturally() {
        assert_eq!(
            TableStatus::StatusSet {
                label: "Paid",
                count: 2
            }
            .message(),
            "status Paid set on 2"
        );
        assert_eq!(
            TableStatus::Page { page: 1, total: 3 }.message(),
            "page 1 of 3"
        );
    }

    #[test]
    fn render_draws_tabs_table_and_pager() {
        let app = Harness::new(12);
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).expect("terminal");
        terminal
            .draw(|frame| render(frame, &app.state, &app.view_data))
            .expect("draw");
        let screen = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect::<String>();
        assert!(screen.contains("fieldops"));
        assert!(screen.contains("All (12)"));
        assert!(screen.contains("page 1 of 2"));
        assert!(screen.contains("[ ]"));
    }
}
