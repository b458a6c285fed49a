use std::{
    cmp, io,
    path::{Path, PathBuf},
    thread,
    time::Duration,
};

use anyhow::{anyhow, Context, Result};
use chrono::Local;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, Borders, Cell, Clear, HighlightSpacing, List, ListItem, ListState, Paragraph, Row,
        Table, TableState, Wrap,
    },
    Frame, Terminal,
};
use tokio::{sync::mpsc, task};
use tracing::{debug, error, info};
use txplayers_core::{
    export::with_csv_extension, loader, AppConfig, Column, EditDraft, EditOutcome, ExportOutcome,
    LoadError, PlayerRecord, Roster,
};

use crate::{
    input::TextInput,
    prompt::{FilePrompt, PromptAction, PromptKind},
    table,
};

const TICK_RATE: Duration = Duration::from_millis(250);
const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];
const CONTEXT_ITEMS: [&str; 1] = ["Edit"];
const EDIT_LABEL_WIDTH: usize = 22;
const KEY_HINTS: &str =
    "o open  x export  / filter  1-3 sort  e edit  m menu  q quit  (right-click a row to edit)";

#[derive(Debug, Clone)]
struct Theme {
    primary_fg: Color,
    accent: Color,
    muted: Color,
    selection_bg: Color,
    success: Color,
    danger: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary_fg: Color::White,
            accent: Color::Cyan,
            muted: Color::DarkGray,
            selection_bg: Color::DarkGray,
            success: Color::Green,
            danger: Color::Red,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Browse,
    Filter,
}

enum AppEvent {
    Input(Event),
    Tick,
    PlayersLoaded {
        path: PathBuf,
        result: Result<Vec<PlayerRecord>, LoadError>,
    },
}

/// Right-click menu anchored at a screen position.
#[derive(Debug, Clone)]
struct ContextMenu {
    row: usize,
    x: u16,
    y: u16,
}

impl ContextMenu {
    fn area(&self, bounds: Rect) -> Rect {
        let width = (CONTEXT_ITEMS.iter().map(|item| item.len()).max().unwrap_or(0) as u16 + 6)
            .min(bounds.width);
        let height = (CONTEXT_ITEMS.len() as u16 + 2).min(bounds.height);
        let x = self
            .x
            .min(bounds.x + bounds.width.saturating_sub(width));
        let y = (self.y + 1).min(bounds.y + bounds.height.saturating_sub(height));
        Rect::new(x, y, width, height)
    }

    fn item_at(&self, bounds: Rect, x: u16, y: u16) -> Option<usize> {
        let area = self.area(bounds);
        let inside = x > area.x && x + 1 < area.x + area.width && y > area.y;
        let index = usize::from(y.saturating_sub(area.y + 1));
        (inside && index < CONTEXT_ITEMS.len()).then_some(index)
    }
}

/// Modal form holding a pending edit.
#[derive(Debug, Clone)]
struct EditModal {
    draft: EditDraft,
    fields: [TextInput; 3],
    active: usize,
}

impl EditModal {
    fn new(draft: EditDraft) -> Self {
        let fields = Column::ALL.map(|column| TextInput::new(draft.value(column)));
        Self {
            draft,
            fields,
            active: 0,
        }
    }

    fn focus(&mut self, delta: isize) {
        let len = self.fields.len() as isize;
        self.active = (self.active as isize + delta).rem_euclid(len) as usize;
    }

    fn field(&mut self) -> &mut TextInput {
        &mut self.fields[self.active]
    }

    fn into_draft(self) -> EditDraft {
        let mut draft = self.draft;
        for (column, field) in Column::ALL.into_iter().zip(self.fields.iter()) {
            draft.set_value(column, field.value());
        }
        draft
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MessageKind {
    Info,
    Error,
}

#[derive(Debug, Clone)]
struct MessageDialog {
    kind: MessageKind,
    title: String,
    text: String,
}

/// Modal layer drawn over the table. Only one is open at a time.
enum Overlay {
    ContextMenu(ContextMenu),
    Edit(EditModal),
    Prompt(FilePrompt),
    ConfirmOverwrite(PathBuf),
    Message(MessageDialog),
}

fn message(kind: MessageKind, title: &str, text: impl Into<String>) -> Overlay {
    Overlay::Message(MessageDialog {
        kind,
        title: title.to_string(),
        text: text.into(),
    })
}

/// Terminal front-end over a [`Roster`].
pub struct PlayersApp {
    config: AppConfig,
    roster: Roster,
    state: UiState,
    overlay: Option<Overlay>,
    browse_dir: PathBuf,
    pending_load: Option<PathBuf>,
    event_tx: Option<mpsc::Sender<AppEvent>>,
    frame_area: Rect,
    table_area: Rect,
    theme: Theme,
}

impl PlayersApp {
    pub fn new(config: AppConfig) -> Self {
        Self {
            roster: Roster::new(&config),
            browse_dir: config.browse_root(),
            config,
            state: UiState::default(),
            overlay: None,
            pending_load: None,
            event_tx: None,
            frame_area: Rect::default(),
            table_area: Rect::default(),
            theme: Theme::default(),
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        self.state
            .set_status("Press o to open a player export".to_string());

        let mut stdout = io::stdout();
        enable_raw_mode().context("failed to enter raw mode")?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
            .context("failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("failed to create terminal")?;
        terminal.hide_cursor()?;
        terminal.clear()?;

        let (event_tx, mut event_rx) = mpsc::channel::<AppEvent>(128);
        spawn_input_thread(event_tx.clone());
        self.event_tx = Some(event_tx);

        let result = loop {
            if let Err(err) = terminal.draw(|frame| self.draw(frame)) {
                break Err(anyhow::Error::new(err).context("failed to draw frame"));
            }
            if self.state.should_quit {
                break Ok(());
            }
            match event_rx.recv().await {
                Some(event) => self.process_app_event(event),
                None => break Ok(()),
            }
        };

        restore_terminal(&mut terminal)?;
        self.event_tx = None;
        result
    }

    fn process_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Input(event) => {
                if let Err(err) = self.handle_input(event) {
                    error!(?err, "Input handling failed");
                    self.overlay = Some(message(MessageKind::Error, "Error", format!("{err:#}")));
                }
            }
            AppEvent::Tick => self.handle_tick(),
            AppEvent::PlayersLoaded { path, result } => self.finish_load(path, result),
        }
    }

    fn handle_tick(&mut self) {
        if self.pending_load.is_some() {
            self.state.spinner = (self.state.spinner + 1) % SPINNER.len();
        }
    }

    fn start_load(&mut self, path: PathBuf) -> Result<()> {
        if let Some(pending) = &self.pending_load {
            self.state
                .set_status(format!("Still loading {}", pending.display()));
            return Ok(());
        }
        let sender = self
            .event_tx
            .clone()
            .ok_or_else(|| anyhow!("event loop is not running"))?;

        info!(path = %path.display(), "Loading player export");
        self.pending_load = Some(path.clone());
        self.state.set_status(format!("Loading {}", path.display()));
        task::spawn_blocking(move || {
            let result = loader::load_players(&path);
            if sender
                .blocking_send(AppEvent::PlayersLoaded { path, result })
                .is_err()
            {
                debug!("load finished after the event loop stopped");
            }
        });
        Ok(())
    }

    fn finish_load(&mut self, path: PathBuf, result: Result<Vec<PlayerRecord>, LoadError>) {
        self.pending_load = None;
        match result {
            Ok(records) => {
                // Open drafts refer to records that no longer exist.
                let dropped_edit = match self.overlay {
                    Some(Overlay::Edit(_)) => true,
                    Some(Overlay::ContextMenu(_)) => {
                        self.overlay = None;
                        false
                    }
                    _ => false,
                };
                let count = records.len();
                self.roster.replace_records(records, Some(path.clone()));
                self.state.move_to(0, self.roster.len());
                self.state.set_status(format!(
                    "Loaded {count} players from {}",
                    path.display()
                ));
                if dropped_edit {
                    info!("Unsaved edit discarded by load");
                    self.overlay = Some(message(
                        MessageKind::Info,
                        "Edit discarded",
                        format!(
                            "{count} players were loaded from {}.\nThe open edit was not saved.",
                            path.display()
                        ),
                    ));
                }
            }
            Err(err) => {
                error!(path = %path.display(), "Load failed: {err}");
                self.state.set_status("Load failed".to_string());
                self.overlay = Some(message(
                    MessageKind::Error,
                    "Error",
                    format!("An error occurred while reading the file: {err}"),
                ));
            }
        }
    }

    fn export_to(&mut self, path: PathBuf) -> Overlay {
        match self.roster.export_csv(&path) {
            Ok(ExportOutcome::Written { path, rows }) => {
                self.state
                    .set_status(format!("Exported {rows} rows to {}", path.display()));
                message(
                    MessageKind::Info,
                    "Success",
                    format!(
                        "The data was successfully exported to CSV.\n{} ({rows} rows)",
                        path.display()
                    ),
                )
            }
            Ok(ExportOutcome::NothingToExport) => {
                message(MessageKind::Info, "Info", "There is no data to export.")
            }
            Err(err) => {
                error!(path = %path.display(), "Export failed: {err}");
                self.state.set_status("Export failed".to_string());
                message(
                    MessageKind::Error,
                    "Error",
                    format!("An error occurred while writing to the file: {err}"),
                )
            }
        }
    }

    fn open_editor(&mut self, row: usize) -> Option<Overlay> {
        match self.roster.begin_edit(row) {
            Some(draft) => Some(Overlay::Edit(EditModal::new(draft))),
            None => {
                self.state.set_status("No player selected".to_string());
                None
            }
        }
    }

    fn save_edit(&mut self, modal: EditModal) {
        let draft = modal.into_draft();
        match self.roster.commit_edit(&draft) {
            EditOutcome::Updated(id) => {
                if let Some(row) = self.roster.position(id) {
                    self.state.move_to(row, self.roster.len());
                } else {
                    self.state.clamp_cursor(self.roster.len());
                }
                self.state.set_status(format!(
                    "Saved changes to {}",
                    draft.value(Column::Name)
                ));
            }
            EditOutcome::NoMatch => {}
        }
    }

    fn sort_by(&mut self, column: Column) {
        let selected = self.roster.row(self.state.cursor).map(|record| record.id);
        let sort = self.roster.sort_by(column);
        if let Some(row) = selected.and_then(|id| self.roster.position(id)) {
            self.state.move_to(row, self.roster.len());
        }
        self.state.set_status(format!(
            "Sorted by {} {}",
            column.heading(),
            sort.direction.marker()
        ));
    }

    fn set_filter(&mut self, text: String) {
        self.roster.set_filter(text);
        self.state.move_to(0, self.roster.len());
    }

    fn open_prompt(&mut self, kind: PromptKind) {
        if kind == PromptKind::Export && self.roster.is_empty() {
            self.overlay = Some(message(
                MessageKind::Info,
                "Info",
                "There is no data to export.",
            ));
            return;
        }
        let file_name = match kind {
            PromptKind::Open => None,
            PromptKind::Export => Some(self.config.default_export_name.as_str()),
        };
        let prompt = FilePrompt::new(kind, self.browse_dir.clone(), file_name);
        self.overlay = Some(Overlay::Prompt(prompt));
    }

    fn handle_input(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            _ => Ok(()),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.state.should_quit = true;
            return Ok(());
        }
        if let Some(overlay) = self.overlay.take() {
            self.overlay = self.handle_overlay_key(overlay, key)?;
            return Ok(());
        }
        match self.state.mode {
            Mode::Filter => self.handle_filter_key(key),
            Mode::Browse => self.handle_browse_key(key),
        }
    }

    fn handle_overlay_key(&mut self, overlay: Overlay, key: KeyEvent) -> Result<Option<Overlay>> {
        let next = match overlay {
            Overlay::ContextMenu(menu) => match key.code {
                KeyCode::Enter | KeyCode::Char('e') => self.open_editor(menu.row),
                KeyCode::Esc | KeyCode::Char('q') => None,
                _ => Some(Overlay::ContextMenu(menu)),
            },
            Overlay::Edit(modal) => self.handle_edit_key(modal, key),
            Overlay::Prompt(prompt) => self.handle_prompt_key(prompt, key)?,
            Overlay::ConfirmOverwrite(path) => match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                    Some(self.export_to(path))
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    self.state.set_status("Export cancelled".to_string());
                    None
                }
                _ => Some(Overlay::ConfirmOverwrite(path)),
            },
            Overlay::Message(dialog) => match key.code {
                KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') => None,
                _ => Some(Overlay::Message(dialog)),
            },
        };
        Ok(next)
    }

    fn handle_edit_key(&mut self, mut modal: EditModal, key: KeyEvent) -> Option<Overlay> {
        match key.code {
            KeyCode::Esc => {
                self.state.set_status("Edit cancelled".to_string());
                return None;
            }
            KeyCode::Enter => {
                self.save_edit(modal);
                return None;
            }
            KeyCode::Tab | KeyCode::Down => modal.focus(1),
            KeyCode::BackTab | KeyCode::Up => modal.focus(-1),
            KeyCode::Left => modal.field().move_cursor(-1),
            KeyCode::Right => modal.field().move_cursor(1),
            KeyCode::Home => modal.field().move_home(),
            KeyCode::End => modal.field().move_end(),
            KeyCode::Backspace => modal.field().backspace(),
            KeyCode::Delete => modal.field().delete(),
            KeyCode::Char(ch) => {
                if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT {
                    modal.field().insert(ch);
                }
            }
            _ => {}
        }
        Some(Overlay::Edit(modal))
    }

    fn handle_prompt_key(&mut self, mut prompt: FilePrompt, key: KeyEvent) -> Result<Option<Overlay>> {
        match key.code {
            KeyCode::Esc => {
                self.state.set_status("Cancelled".to_string());
                return Ok(None);
            }
            KeyCode::Up => prompt.move_selection(-1),
            KeyCode::Down => prompt.move_selection(1),
            KeyCode::Tab => {
                let on_dir = prompt
                    .cursor()
                    .and_then(|index| prompt.entries().get(index))
                    .map(|entry| entry.is_dir)
                    .unwrap_or(false);
                if on_dir {
                    prompt.submit();
                }
            }
            KeyCode::Enter => {
                if let PromptAction::Submit(path) = prompt.submit() {
                    self.browse_dir = prompt.dir().to_path_buf();
                    return match prompt.kind {
                        PromptKind::Open => {
                            self.start_load(path)?;
                            Ok(None)
                        }
                        PromptKind::Export => {
                            let target = with_csv_extension(&path);
                            if target.exists() {
                                Ok(Some(Overlay::ConfirmOverwrite(target)))
                            } else {
                                Ok(Some(self.export_to(target)))
                            }
                        }
                    };
                }
            }
            KeyCode::Left => prompt.input.move_cursor(-1),
            KeyCode::Right => prompt.input.move_cursor(1),
            KeyCode::Home => prompt.input.move_home(),
            KeyCode::End => prompt.input.move_end(),
            KeyCode::Backspace => {
                prompt.input.backspace();
                prompt.edited();
            }
            KeyCode::Delete => {
                prompt.input.delete();
                prompt.edited();
            }
            KeyCode::Char(ch) => {
                if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT {
                    prompt.input.insert(ch);
                    prompt.edited();
                }
            }
            _ => {}
        }
        Ok(Some(Overlay::Prompt(prompt)))
    }

    fn handle_filter_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Esc | KeyCode::Enter => {
                self.state.mode = Mode::Browse;
                self.state.set_status(format!(
                    "Filter applied: {} of {} players",
                    self.roster.len(),
                    self.roster.store().len()
                ));
            }
            KeyCode::Backspace => {
                let mut text = self.roster.filter_text().to_string();
                text.pop();
                self.set_filter(text);
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.set_filter(String::new());
            }
            KeyCode::Char(c) => {
                if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT {
                    let mut text = self.roster.filter_text().to_string();
                    text.push(c);
                    self.set_filter(text);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_browse_key(&mut self, key: KeyEvent) -> Result<()> {
        let len = self.roster.len();
        match key.code {
            KeyCode::Char('q') if key.modifiers.is_empty() => self.state.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => self.state.move_cursor(1, len),
            KeyCode::Char('k') | KeyCode::Up => self.state.move_cursor(-1, len),
            KeyCode::Char('g') if key.modifiers.is_empty() => self.state.move_to(0, len),
            KeyCode::Char('G') => self.state.move_to_end(len),
            KeyCode::Home => self.state.move_to(0, len),
            KeyCode::End => self.state.move_to_end(len),
            KeyCode::PageDown => self.state.page_down(len),
            KeyCode::PageUp => self.state.page_up(len),
            KeyCode::Char('/') => {
                self.state.mode = Mode::Filter;
                self.state.set_status("Type to filter by player name".to_string());
            }
            KeyCode::Esc if !self.roster.filter_text().is_empty() => {
                self.set_filter(String::new());
                self.state.set_status("Filter cleared".to_string());
            }
            KeyCode::Char('o') => self.open_prompt(PromptKind::Open),
            KeyCode::Char('x') => self.open_prompt(PromptKind::Export),
            KeyCode::Char(digit @ '1'..='3') => {
                if let Some(column) = digit
                    .to_digit(10)
                    .and_then(|value| Column::from_index(value as usize - 1))
                {
                    self.sort_by(column);
                }
            }
            KeyCode::Char('e') | KeyCode::Enter => {
                self.overlay = self.open_editor(self.state.cursor);
            }
            KeyCode::Char('m') => {
                if self.roster.row(self.state.cursor).is_some() {
                    let body = table::body(self.table_area);
                    let visible_row = self.state.cursor.saturating_sub(self.state.offset) as u16;
                    self.overlay = Some(Overlay::ContextMenu(ContextMenu {
                        row: self.state.cursor,
                        x: body.x + 2,
                        y: body.y + 1 + visible_row,
                    }));
                } else {
                    self.state.set_status("No player selected".to_string());
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) -> Result<()> {
        let (x, y) = (mouse.column, mouse.row);
        match self.overlay.take() {
            Some(Overlay::ContextMenu(menu)) => match mouse.kind {
                MouseEventKind::Down(MouseButton::Left) => {
                    if menu.item_at(self.frame_area, x, y).is_some() {
                        self.overlay = self.open_editor(menu.row);
                    }
                    return Ok(());
                }
                MouseEventKind::Down(_) => {}
                _ => {
                    self.overlay = Some(Overlay::ContextMenu(menu));
                    return Ok(());
                }
            },
            Some(other) => {
                self.overlay = Some(other);
                return Ok(());
            }
            None => {}
        }

        let len = self.roster.len();
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if table::is_header(self.table_area, x, y) {
                    if let Some(column) = table::column_at(self.table_area, x) {
                        self.sort_by(column);
                    }
                } else if let Some(row) =
                    table::row_at(self.table_area, x, y, self.state.offset, len)
                {
                    self.state.move_to(row, len);
                }
            }
            MouseEventKind::Down(MouseButton::Right) => {
                if let Some(row) = table::row_at(self.table_area, x, y, self.state.offset, len) {
                    self.state.mode = Mode::Browse;
                    self.state.move_to(row, len);
                    self.overlay = Some(Overlay::ContextMenu(ContextMenu { row, x, y }));
                }
            }
            MouseEventKind::ScrollDown => self.state.move_cursor(1, len),
            MouseEventKind::ScrollUp => self.state.move_cursor(-1, len),
            _ => {}
        }
        Ok(())
    }

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.size();
        self.frame_area = area;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(5),
            ])
            .split(area);

        self.render_filter(frame, chunks[0]);
        self.render_table(frame, chunks[1]);
        self.render_status(frame, chunks[2]);

        match &self.overlay {
            Some(Overlay::ContextMenu(menu)) => self.render_context_menu(frame, menu),
            Some(Overlay::Edit(modal)) => self.render_edit_modal(frame, modal),
            Some(Overlay::Prompt(prompt)) => self.render_prompt(frame, prompt),
            Some(Overlay::ConfirmOverwrite(path)) => self.render_confirm(frame, path),
            Some(Overlay::Message(dialog)) => self.render_message(frame, dialog),
            None => {}
        }
    }

    fn render_filter(&self, frame: &mut Frame, area: Rect) {
        let active = self.state.mode == Mode::Filter && self.overlay.is_none();
        let border = if active {
            Style::default().fg(self.theme.accent)
        } else {
            Style::default()
        };
        let text = self.roster.filter_text();
        let content = if text.is_empty() && !active {
            Line::from(Span::styled(
                "press / to filter by player name",
                Style::default().fg(self.theme.muted),
            ))
        } else {
            Line::from(text.to_string())
        };
        let paragraph = Paragraph::new(content).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title("Filter"),
        );
        frame.render_widget(paragraph, area);

        if active {
            let cursor_x = (area.x + 1 + text.chars().count() as u16)
                .min(area.x + area.width.saturating_sub(2));
            frame.set_cursor(cursor_x, area.y + 1);
        }
    }

    fn render_table(&mut self, frame: &mut Frame, area: Rect) {
        self.table_area = area;
        let len = self.roster.len();
        self.state.list_height = table::visible_rows(area);
        self.state.clamp_cursor(len);
        self.state.ensure_cursor_visible(len);

        let sort = self.roster.sort();
        let header_style = Style::default()
            .fg(self.theme.accent)
            .add_modifier(Modifier::BOLD);
        let header = Row::new(Column::ALL.map(|column| {
            let marker = sort
                .filter(|state| state.column == column)
                .map(|state| format!(" {}", state.direction.marker()))
                .unwrap_or_default();
            Cell::from(format!("{}{marker}", column.heading()))
        }))
        .style(header_style);

        let end = cmp::min(self.state.offset + self.state.list_height, len);
        let rows: Vec<Row> = (self.state.offset..end)
            .filter_map(|index| self.roster.row(index))
            .map(|record| {
                Row::new(record.cells().map(|text| Cell::from(text.to_string())))
                    .style(Style::default().fg(self.theme.primary_fg))
            })
            .collect();

        let mut table_state = TableState::default();
        if len > 0 {
            table_state.select(Some(self.state.cursor.saturating_sub(self.state.offset)));
        }

        let title = match self.roster.source() {
            Some(path) => format!(
                "Players {}/{} · {}",
                len,
                self.roster.store().len(),
                path.display()
            ),
            None => "Players (press o to open an export)".to_string(),
        };
        let widget = Table::new(rows, table::column_constraints(table::body(area).width))
            .header(header)
            .block(Block::default().borders(Borders::ALL).title(title))
            .column_spacing(table::COLUMN_SPACING)
            .highlight_symbol(table::HIGHLIGHT_SYMBOL)
            .highlight_spacing(HighlightSpacing::Always)
            .highlight_style(
                Style::default()
                    .bg(self.theme.selection_bg)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_stateful_widget(widget, area, &mut table_state);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Status");
        let primary = match &self.pending_load {
            Some(path) => format!(
                "{} Loading {}",
                SPINNER[self.state.spinner],
                path.display()
            ),
            None => self.state.status.clone(),
        };
        let sort = self
            .roster
            .sort()
            .map(|state| format!("{} {}", state.column.heading(), state.direction.marker()))
            .unwrap_or_else(|| "file order".to_string());
        let summary = format!(
            "{} of {} players shown · sorted by {}",
            self.roster.len(),
            self.roster.store().len(),
            sort
        );
        let paragraph = Paragraph::new(vec![
            Line::from(primary),
            Line::from(Span::styled(summary, Style::default().fg(self.theme.muted))),
            Line::from(Span::styled(KEY_HINTS, Style::default().fg(self.theme.muted))),
        ])
        .block(block)
        .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn render_context_menu(&self, frame: &mut Frame, menu: &ContextMenu) {
        let area = menu.area(self.frame_area);
        frame.render_widget(Clear, area);
        let items: Vec<ListItem> = CONTEXT_ITEMS
            .iter()
            .map(|item| ListItem::new(Line::from(format!(" {item}"))))
            .collect();
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(self.theme.accent)),
            )
            .highlight_style(
                Style::default()
                    .bg(self.theme.accent)
                    .fg(Color::Black)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_stateful_widget(list, area, &mut list_state);
    }

    fn render_edit_modal(&self, frame: &mut Frame, modal: &EditModal) {
        let area = centered_rect(72, 8, frame.size());
        frame.render_widget(Clear, area);

        let value_width = usize::from(area.width.saturating_sub(2)).saturating_sub(EDIT_LABEL_WIDTH);
        let mut lines = Vec::with_capacity(Column::ALL.len() + 2);
        let mut cursor = None;
        for (index, column) in Column::ALL.into_iter().enumerate() {
            let is_active = index == modal.active;
            let (visible, offset) = modal.fields[index].window(value_width);
            if is_active {
                cursor = Some((offset, index));
            }
            let value_style = if is_active {
                Style::default().fg(self.theme.accent)
            } else {
                Style::default()
            };
            lines.push(Line::from(vec![
                Span::styled(
                    format!("{:<width$}", format!("{}:", column.heading()), width = EDIT_LABEL_WIDTH),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::styled(visible, value_style),
            ]));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("Enter", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" save  "),
            Span::styled("Tab", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" next field  "),
            Span::styled("Esc", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" cancel"),
        ]));

        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(self.theme.accent))
                .title("Edit Player Details"),
        );
        frame.render_widget(paragraph, area);

        if let Some((offset, index)) = cursor {
            let x = area.x + 1 + EDIT_LABEL_WIDTH as u16 + offset as u16;
            frame.set_cursor(
                x.min(area.x + area.width.saturating_sub(2)),
                area.y + 1 + index as u16,
            );
        }
    }

    fn render_prompt(&self, frame: &mut Frame, prompt: &FilePrompt) {
        let bounds = frame.size();
        let width = cmp::min(90, bounds.width.saturating_sub(4));
        let height = cmp::min(22, bounds.height.saturating_sub(2));
        let area = centered_rect(width, height, bounds);
        frame.render_widget(Clear, area);

        let outer = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.accent))
            .title(prompt.kind.title());
        let inner = outer.inner(area);
        frame.render_widget(outer, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(3),
                Constraint::Length(1),
            ])
            .split(inner);

        let input_width = usize::from(chunks[0].width.saturating_sub(2));
        let (visible, offset) = prompt.input.window(input_width);
        let input = Paragraph::new(visible)
            .block(Block::default().borders(Borders::ALL).title("Path"));
        frame.render_widget(input, chunks[0]);

        let items: Vec<ListItem> = prompt
            .entries()
            .iter()
            .map(|entry| {
                let style = if entry.is_dir {
                    Style::default().fg(self.theme.accent)
                } else {
                    Style::default().fg(self.theme.primary_fg)
                };
                ListItem::new(Line::from(Span::styled(entry.label.clone(), style)))
            })
            .collect();
        let mut list_state = ListState::default();
        list_state.select(prompt.cursor());
        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(prompt.dir().display().to_string()),
            )
            .highlight_style(Style::default().bg(self.theme.selection_bg))
            .highlight_symbol(table::HIGHLIGHT_SYMBOL);
        frame.render_stateful_widget(list, chunks[1], &mut list_state);

        let help = match &prompt.error {
            Some(err) => Line::from(Span::styled(
                err.clone(),
                Style::default().fg(self.theme.danger),
            )),
            None => Line::from(Span::styled(
                "Enter choose  ↑↓ browse  Tab open folder  Esc cancel",
                Style::default().fg(self.theme.muted),
            )),
        };
        frame.render_widget(Paragraph::new(help), chunks[2]);

        frame.set_cursor(
            chunks[0].x + 1 + offset as u16,
            chunks[0].y + 1,
        );
    }

    fn render_confirm(&self, frame: &mut Frame, path: &Path) {
        let area = centered_rect(64, 6, frame.size());
        frame.render_widget(Clear, area);
        let paragraph = Paragraph::new(vec![
            Line::from(format!("{} already exists.", path.display())),
            Line::from("Do you want to replace it?"),
            Line::from(""),
            Line::from(vec![
                Span::styled("y", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(" replace  "),
                Span::styled("n", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(" cancel"),
            ]),
        ])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(self.theme.accent))
                .title("Confirm Save As"),
        )
        .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn render_message(&self, frame: &mut Frame, dialog: &MessageDialog) {
        let area = centered_rect(64, 8, frame.size());
        frame.render_widget(Clear, area);
        let accent = match dialog.kind {
            MessageKind::Info => self.theme.success,
            MessageKind::Error => self.theme.danger,
        };
        let mut lines: Vec<Line> = dialog
            .text
            .lines()
            .map(|line| Line::from(line.to_string()))
            .collect();
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Enter to dismiss",
            Style::default().fg(self.theme.muted),
        )));
        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(accent))
                    .title(Span::styled(
                        dialog.title.clone(),
                        Style::default().fg(accent).add_modifier(Modifier::BOLD),
                    )),
            )
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .context("failed to leave alternate screen")?;
    terminal.show_cursor()?;
    Ok(())
}

fn spawn_input_thread(sender: mpsc::Sender<AppEvent>) {
    thread::spawn(move || loop {
        match event::poll(TICK_RATE) {
            Ok(true) => match event::read() {
                Ok(evt) => {
                    if sender.blocking_send(AppEvent::Input(evt)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            },
            Ok(false) => {
                if sender.blocking_send(AppEvent::Tick).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    });
}

struct UiState {
    cursor: usize,
    offset: usize,
    list_height: usize,
    status: String,
    mode: Mode,
    should_quit: bool,
    spinner: usize,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            cursor: 0,
            offset: 0,
            list_height: 1,
            status: "Ready".to_string(),
            mode: Mode::Browse,
            should_quit: false,
            spinner: 0,
        }
    }
}

impl UiState {
    fn move_cursor(&mut self, delta: isize, len: usize) {
        if len == 0 {
            return;
        }
        let idx = (self.cursor as isize + delta).clamp(0, len as isize - 1);
        self.cursor = idx as usize;
        self.ensure_cursor_visible(len);
    }

    fn move_to(&mut self, index: usize, len: usize) {
        if len == 0 {
            self.cursor = 0;
            self.offset = 0;
            return;
        }
        self.cursor = index.min(len - 1);
        self.ensure_cursor_visible(len);
    }

    fn move_to_end(&mut self, len: usize) {
        self.move_to(len.saturating_sub(1), len);
    }

    fn page_down(&mut self, len: usize) {
        if len == 0 || self.list_height == 0 {
            return;
        }
        let delta = self.list_height.min(len);
        self.move_cursor(delta as isize, len);
    }

    fn page_up(&mut self, len: usize) {
        if len == 0 || self.list_height == 0 {
            return;
        }
        let delta = self.list_height.min(len);
        self.move_cursor(-(delta as isize), len);
    }

    fn set_status(&mut self, message: String) {
        self.status = format!("[{}] {message}", Local::now().format("%H:%M:%S"));
    }

    fn clamp_cursor(&mut self, len: usize) {
        if len == 0 {
            self.cursor = 0;
            self.offset = 0;
        } else if self.cursor >= len {
            self.cursor = len - 1;
        }
    }

    fn ensure_cursor_visible(&mut self, len: usize) {
        if len == 0 || self.list_height == 0 {
            self.offset = 0;
            return;
        }
        let height = self.list_height;
        let max_offset = len.saturating_sub(height);

        if self.cursor < self.offset {
            self.offset = self.cursor;
        } else if self.cursor >= self.offset + height {
            self.offset = self.cursor + 1 - height;
        }

        if self.offset > max_offset {
            self.offset = max_offset;
        }
    }
}
