//! Kanban board interface.
//!
//! `BoardApp` owns the board store and the two interaction machines and
//! translates terminal events into their commands: mouse press/drag/release
//! drive the drag machine through hit-testing against the regions recorded
//! by the last render, and arrow keys go through the keyboard machine. All
//! other keys are direct store commands.

use std::io;
use std::time::Instant;

use chrono::{Local, Utc};
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame, Terminal,
};
use tracing::{debug, info, warn};

use crate::board::Board;
use crate::config::Config;
use crate::dates::{format_due_relative, truncate};
use crate::drag::{DragMachine, DragOutcome, DragTarget};
use crate::error::{BoardError, Result};
use crate::filter::{cycle_option, filter_columns, FilterCriteria, SearchDebounce};
use crate::keyboard::{FocusTarget, GridPosition, InputContext, KeyboardNav, NavKey, NavOutcome};
use crate::task::{Column, Task};
use crate::tui::colors::{priority_color, DARK_GREEN, DARK_PURPLE, DARK_RED, GOLD};
use crate::tui::enums::{AppState, ConfirmAction, PromptKind};
use crate::tui::input::InputField;
use crate::tui::task_form::{
    TaskForm, ASSIGNEE_FIELD, COLUMN_SELECTOR, DESCRIPTION_FIELD, DUE_FIELD, PRIORITY_SELECTOR,
    TAGS_FIELD, TITLE_FIELD,
};
use crate::tui::utils::{centered_rect, hit};

/// Rows per card, borders included.
const CARD_HEIGHT: u16 = 4;
/// Width of a collapsed column strip.
const COLLAPSED_WIDTH: u16 = 5;

/// Focus as the keyboard machine sees it: the task ids displayed in each
/// column, collapsed columns showing none.
#[derive(Debug, Default)]
struct BoardFocus {
    grid: Vec<Vec<String>>,
    focused: Option<String>,
    announcement: String,
}

impl BoardFocus {
    fn position(&self) -> Option<GridPosition> {
        let id = self.focused.as_deref()?;
        self.grid.iter().enumerate().find_map(|(column, ids)| {
            ids.iter()
                .position(|t| t == id)
                .map(|task| GridPosition { column, task })
        })
    }
}

impl FocusTarget for BoardFocus {
    fn identify(&self, position: GridPosition) -> Option<String> {
        self.grid.get(position.column)?.get(position.task).cloned()
    }

    fn move_focus_to(&mut self, task_id: &str) {
        self.focused = Some(task_id.to_string());
    }

    fn announce(&mut self, text: &str) {
        debug!(announcement = text);
        self.announcement = text.to_string();
    }
}

/// Screen regions from the last render, for mouse hit-testing.
#[derive(Debug, Default)]
struct HitMap {
    columns: Vec<(String, Rect)>,
    cards: Vec<(String, Rect)>,
}

impl HitMap {
    fn card_at(&self, x: u16, y: u16) -> Option<&str> {
        self.cards
            .iter()
            .find(|(_, rect)| hit(*rect, x, y))
            .map(|(id, _)| id.as_str())
    }

    fn column_at(&self, x: u16, y: u16) -> Option<&str> {
        self.columns
            .iter()
            .find(|(_, rect)| hit(*rect, x, y))
            .map(|(id, _)| id.as_str())
    }

    /// Cards win over the column behind them.
    fn target_at(&self, x: u16, y: u16) -> DragTarget {
        if let Some(id) = self.card_at(x, y) {
            DragTarget::Task(id.to_string())
        } else if let Some(id) = self.column_at(x, y) {
            DragTarget::Column(id.to_string())
        } else {
            DragTarget::Nothing
        }
    }
}

/// Parse WIP limit prompt input. Empty input clears the limit.
fn parse_wip_limit(input: &str) -> Result<Option<u32>> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    input
        .parse::<u32>()
        .map(Some)
        .map_err(|_| BoardError::validation("wip_limit", format!("'{input}' is not a whole number")))
}

/// Main board application state.
pub struct BoardApp {
    board: Board,
    config: Config,
    state: AppState,
    criteria: FilterCriteria,
    search: InputField,
    search_active: bool,
    debounce: SearchDebounce,
    /// Filtered projection of the board; recomputed after every change.
    view: Vec<Column>,
    focus: BoardFocus,
    nav: KeyboardNav,
    drag: DragMachine,
    pointer: Option<(u16, u16)>,
    selected_column: usize,
    column_scroll_offsets: Vec<usize>,
    task_form: Option<TaskForm>,
    prompt: InputField,
    confirm_action: Option<ConfirmAction>,
    status_message: String,
    hit_map: HitMap,
}

impl BoardApp {
    pub fn new(board: Board, config: Config) -> Self {
        let debounce = SearchDebounce::new(config.search_debounce());
        let mut app = BoardApp {
            board,
            config,
            state: AppState::Board,
            criteria: FilterCriteria::default(),
            search: InputField::new(),
            search_active: false,
            debounce,
            view: Vec::new(),
            focus: BoardFocus::default(),
            nav: KeyboardNav::new(),
            drag: DragMachine::new(),
            pointer: None,
            selected_column: 0,
            column_scroll_offsets: Vec::new(),
            task_form: None,
            prompt: InputField::new(),
            confirm_action: None,
            status_message: String::new(),
            hit_map: HitMap::default(),
        };
        app.refresh_view();
        app
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Recompute the filtered projection and repair focus against it.
    fn refresh_view(&mut self) {
        self.view = filter_columns(self.board.columns(), &self.criteria);
        self.focus.grid = self
            .view
            .iter()
            .map(|c| {
                if c.collapsed {
                    Vec::new()
                } else {
                    c.tasks.iter().map(|t| t.id.clone()).collect()
                }
            })
            .collect();
        self.column_scroll_offsets.resize(self.view.len(), 0);

        match self.focus.position() {
            Some(pos) => self.selected_column = pos.column,
            None => self.focus.focused = None,
        }
        self.selected_column = self.selected_column.min(self.view.len().saturating_sub(1));
    }

    /// The view as the keyboard machine navigates it.
    fn nav_columns(&self) -> Vec<Column> {
        self.view
            .iter()
            .map(|c| Column {
                id: c.id.clone(),
                title: c.title.clone(),
                tasks: if c.collapsed { Vec::new() } else { c.tasks.clone() },
                wip_limit: c.wip_limit,
                collapsed: c.collapsed,
            })
            .collect()
    }

    fn input_context(&self) -> InputContext {
        match self.state {
            AppState::Board if self.search_active => InputContext::TextEntry,
            AppState::Board => InputContext::Board,
            AppState::Prompt(_) => InputContext::TextEntry,
            AppState::AddTask | AppState::EditTask | AppState::Confirm | AppState::Help => {
                InputContext::Modal
            }
        }
    }

    fn selected_column(&self) -> Option<&Column> {
        self.view.get(self.selected_column)
    }

    fn selected_column_id(&self) -> Option<String> {
        self.selected_column().map(|c| c.id.clone())
    }

    fn focused_task(&self) -> Option<&Task> {
        self.focus.focused.as_deref().and_then(|id| self.board.task(id))
    }

    fn set_status_message(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }

    fn clear_status_message(&mut self) {
        self.status_message.clear();
    }

    fn report(&mut self, error: BoardError) {
        if error.is_user_notice() {
            warn!(error = %error, "operation rejected");
        } else {
            debug!(error = %error, "stale reference ignored");
        }
        self.set_status_message(error.to_string());
    }

    fn navigate(&mut self, key: NavKey) {
        let columns = self.nav_columns();
        let focused = self.focus.focused.clone();
        let context = self.input_context();
        let outcome = self
            .nav
            .key_press(&columns, key, focused.as_deref(), context, &mut self.focus);
        if let NavOutcome::Moved { position, .. } = outcome {
            self.selected_column = position.column;
            self.status_message = self.focus.announcement.clone();
        }
    }

    fn select_column(&mut self, forward: bool) {
        let n = self.view.len();
        if n == 0 {
            return;
        }
        self.selected_column = if forward {
            (self.selected_column + 1) % n
        } else {
            (self.selected_column + n - 1) % n
        };
        self.focus.focused = None;
        if let Some(column) = self.selected_column() {
            let msg = format!("Column: {}", column.title);
            self.set_status_message(msg);
        }
    }

    /// Keyboard move: the focused card goes to the tail of the adjacent column.
    fn move_focused_across(&mut self, forward: bool) {
        let Some(id) = self.focus.focused.clone() else {
            return;
        };
        let Some(loc) = self.board.find_task(&id) else {
            return;
        };
        let dst = if forward {
            loc.column_index + 1
        } else {
            match loc.column_index.checked_sub(1) {
                Some(i) => i,
                None => return,
            }
        };
        let columns = self.board.columns();
        let Some(dest) = columns.get(dst) else {
            return;
        };
        let (source_id, dest_id, dest_title, tail) = (
            columns[loc.column_index].id.clone(),
            dest.id.clone(),
            dest.title.clone(),
            dest.tasks.len(),
        );
        if self.board.move_across_columns(&source_id, &dest_id, loc.task_index, tail) {
            self.selected_column = dst;
            self.refresh_view();
            self.set_status_message(format!("Moved task to {dest_title}"));
        }
    }

    /// Keyboard move: swap the focused card with its neighbour.
    fn move_focused_within(&mut self, up: bool) {
        let Some(id) = self.focus.focused.clone() else {
            return;
        };
        let Some(loc) = self.board.find_task(&id) else {
            return;
        };
        let to = if up {
            match loc.task_index.checked_sub(1) {
                Some(i) => i,
                None => return,
            }
        } else {
            loc.task_index + 1
        };
        let column_id = self.board.columns()[loc.column_index].id.clone();
        if self.board.reorder_within_column(&column_id, loc.task_index, to) {
            self.refresh_view();
        }
    }

    fn open_add_form(&mut self) {
        let Some(column_id) = self
            .selected_column_id()
            .or_else(|| self.board.columns().first().map(|c| c.id.clone()))
        else {
            self.set_status_message("No column to add a task to");
            return;
        };
        let task = self
            .board
            .add_task_at(&column_id, Utc::now(), self.config.default_due());
        self.task_form = Some(TaskForm::from_task(&task, self.board.columns()));
        self.state = AppState::AddTask;
        self.clear_status_message();
    }

    fn open_edit_form(&mut self) {
        let Some(id) = self.focus.focused.clone() else {
            self.set_status_message("No task focused");
            return;
        };
        let Some(task) = self.board.task(&id) else {
            self.report(BoardError::TaskNotFound { id });
            return;
        };
        let form = TaskForm::from_task(task, self.board.columns());
        self.task_form = Some(form);
        self.state = AppState::EditTask;
        self.clear_status_message();
    }

    fn close_form(&mut self) {
        self.task_form = None;
        self.state = AppState::Board;
    }

    /// Hand the form's record to the store. Rejections keep the form open.
    fn submit_form(&mut self) {
        let Some(form) = &self.task_form else {
            return;
        };
        let today = Local::now().date_naive();
        let is_new = form.is_new();
        match form.to_task(today).and_then(|task| self.board.save_task(task)) {
            Ok(id) => {
                info!(task = %id, new = is_new, "task saved");
                self.close_form();
                self.focus.focused = Some(id);
                self.refresh_view();
                self.set_status_message(if is_new { "Task created" } else { "Task updated" });
            }
            Err(e) => self.report(e),
        }
    }

    fn duplicate_focused(&mut self) {
        let Some(task) = self.focused_task().cloned() else {
            return;
        };
        if let Some(id) = self.board.duplicate_task(&task) {
            self.focus.focused = Some(id);
            self.refresh_view();
            self.set_status_message(format!("Duplicated '{}'", task.title));
        }
    }

    fn add_column(&mut self) {
        match self.board.add_column() {
            Ok(id) => {
                self.refresh_view();
                if let Some(index) = self.view.iter().position(|c| c.id == id) {
                    self.selected_column = index;
                    self.focus.focused = None;
                }
                self.set_status_message("Column added");
            }
            Err(e) => self.report(e),
        }
    }

    fn toggle_collapse(&mut self) {
        if let Some(id) = self.selected_column_id() {
            self.board.toggle_collapse(&id);
            self.refresh_view();
        }
    }

    fn open_prompt(&mut self, kind: PromptKind) {
        let Some(column) = self.selected_column() else {
            return;
        };
        let initial = match kind {
            PromptKind::RenameColumn => column.title.clone(),
            PromptKind::WipLimit => column.wip_limit.map(|l| l.to_string()).unwrap_or_default(),
        };
        self.prompt = InputField::with_value(&initial);
        self.prompt.active = true;
        self.state = AppState::Prompt(kind);
    }

    fn apply_prompt(&mut self, kind: PromptKind) {
        let Some(column_id) = self.selected_column_id() else {
            self.state = AppState::Board;
            return;
        };
        let value = self.prompt.value.trim().to_string();
        match kind {
            PromptKind::RenameColumn => {
                if value.is_empty() {
                    self.report(BoardError::validation("title", "column title is required"));
                    return;
                }
                self.board.rename_column(&column_id, &value);
            }
            PromptKind::WipLimit => match parse_wip_limit(&value) {
                Ok(limit) => {
                    self.board.set_wip_limit(&column_id, limit);
                }
                Err(e) => {
                    self.report(e);
                    return;
                }
            },
        }
        self.state = AppState::Board;
        self.refresh_view();
        self.clear_status_message();
    }

    fn ask_confirm(&mut self, action: ConfirmAction) {
        self.confirm_action = Some(action);
        self.state = AppState::Confirm;
    }

    fn confirm_delete_task(&mut self) {
        if let Some(task) = self.focused_task() {
            let action = ConfirmAction::DeleteTask {
                id: task.id.clone(),
                title: task.title.clone(),
            };
            self.ask_confirm(action);
        }
    }

    fn confirm_delete_column(&mut self) {
        if let Some(column) = self.selected_column() {
            let action = ConfirmAction::DeleteColumn {
                id: column.id.clone(),
                title: column.title.clone(),
            };
            self.ask_confirm(action);
        }
    }

    fn execute_confirmed(&mut self) {
        match self.confirm_action.take() {
            Some(ConfirmAction::DeleteTask { id, title }) => {
                if self.board.delete_task(&id) {
                    self.set_status_message(format!("Deleted '{title}'"));
                }
            }
            Some(ConfirmAction::DeleteColumn { id, title }) => {
                if self.board.delete_column(&id) {
                    self.set_status_message(format!("Deleted column '{title}'"));
                }
            }
            None => {}
        }
        self.state = AppState::Board;
        self.refresh_view();
    }

    fn apply_query(&mut self, query: String) {
        debug!(query = %query, "search applied");
        self.criteria.query = query;
        self.refresh_view();
    }

    fn clear_filters(&mut self) {
        self.criteria = FilterCriteria::default();
        self.search.clear();
        self.debounce.cancel();
        self.refresh_view();
        self.set_status_message("Filters cleared");
    }

    fn filters_changed(&mut self) {
        self.refresh_view();
        let msg = if self.criteria.is_empty() {
            "Filters cleared".to_string()
        } else {
            format!("Filter: {}", self.criteria.describe())
        };
        self.set_status_message(msg);
    }

    fn cycle_assignee_filter(&mut self) {
        let names: Vec<String> = self.board.assignees().into_iter().map(|a| a.name).collect();
        self.criteria.assignee = cycle_option(&names, self.criteria.assignee.as_ref());
        self.filters_changed();
    }

    fn cycle_priority_filter(&mut self) {
        let priorities: Vec<_> = self.board.priorities().into_iter().collect();
        self.criteria.priority = cycle_option(&priorities, self.criteria.priority.as_ref());
        self.filters_changed();
    }

    fn cycle_tag_filter(&mut self) {
        let tags: Vec<String> = self.board.tags().into_iter().collect();
        self.criteria.tag = cycle_option(&tags, self.criteria.tag.as_ref());
        self.filters_changed();
    }

    /// Apply debounced search text once the quiet period has passed.
    pub fn on_tick(&mut self, now: Instant) {
        if let Some(query) = self.debounce.poll(now) {
            self.apply_query(query);
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent, now: Instant) {
        match key.code {
            KeyCode::Esc => {
                self.search_active = false;
                self.search.clear();
                self.debounce.cancel();
                self.apply_query(String::new());
                self.clear_status_message();
            }
            KeyCode::Enter => {
                self.search_active = false;
                if let Some(query) = self.debounce.flush() {
                    self.apply_query(query);
                }
            }
            KeyCode::Backspace => {
                self.search.handle_backspace();
                self.debounce.input(self.search.value.clone(), now);
            }
            KeyCode::Delete => {
                self.search.handle_delete();
                self.debounce.input(self.search.value.clone(), now);
            }
            KeyCode::Left => self.search.move_cursor_left(),
            KeyCode::Right => self.search.move_cursor_right(),
            KeyCode::Char(c) => {
                self.search.handle_char(c);
                self.debounce.input(self.search.value.clone(), now);
            }
            _ => {}
        }
    }

    /// Board keys. Returns true when the user asked to quit.
    fn handle_board_key(&mut self, key: KeyEvent) -> bool {
        if self.search_active {
            self.handle_search_key(key, Instant::now());
            return false;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Char('c') if ctrl => return true,
            KeyCode::Char('q') => return true,
            KeyCode::Esc => {
                if self.criteria.is_empty() {
                    return true;
                }
                self.clear_filters();
            }

            // Keyboard moves (check before plain navigation)
            KeyCode::Left if ctrl => self.move_focused_across(false),
            KeyCode::Right if ctrl => self.move_focused_across(true),
            KeyCode::Up if ctrl => self.move_focused_within(true),
            KeyCode::Down if ctrl => self.move_focused_within(false),

            KeyCode::Up => self.navigate(NavKey::Up),
            KeyCode::Down => self.navigate(NavKey::Down),
            KeyCode::Left => self.navigate(NavKey::Left),
            KeyCode::Right => self.navigate(NavKey::Right),
            KeyCode::Home => self.navigate(NavKey::Home),
            KeyCode::End => self.navigate(NavKey::End),
            KeyCode::Enter => {
                if self.focus.focused.is_some() {
                    self.open_edit_form();
                } else {
                    self.navigate(NavKey::Enter);
                }
            }
            KeyCode::Tab => self.select_column(true),
            KeyCode::BackTab => self.select_column(false),

            KeyCode::Char('a') => self.open_add_form(),
            KeyCode::Char('e') => self.open_edit_form(),
            KeyCode::Char('x') | KeyCode::Delete => self.confirm_delete_task(),
            KeyCode::Char('y') => self.duplicate_focused(),
            KeyCode::Char('n') => self.add_column(),
            KeyCode::Char('r') => self.open_prompt(PromptKind::RenameColumn),
            KeyCode::Char('w') => self.open_prompt(PromptKind::WipLimit),
            KeyCode::Char('z') => self.toggle_collapse(),
            KeyCode::Char('D') => self.confirm_delete_column(),
            KeyCode::Char('/') => {
                self.search_active = true;
                self.search.active = true;
                self.search.move_cursor_end();
            }
            KeyCode::Char('f') => self.cycle_assignee_filter(),
            KeyCode::Char('p') => self.cycle_priority_filter(),
            KeyCode::Char('g') => self.cycle_tag_filter(),
            KeyCode::Char('c') => self.clear_filters(),
            KeyCode::Char('h') | KeyCode::Char('?') | KeyCode::F(1) => self.state = AppState::Help,
            _ => {}
        }
        false
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        let Some(form) = self.task_form.as_mut() else {
            self.state = AppState::Board;
            return;
        };
        match key.code {
            KeyCode::Esc => {
                self.close_form();
                self.set_status_message("Cancelled");
            }
            KeyCode::Enter => self.submit_form(),
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.prev_field(),
            KeyCode::Left => form.handle_left_right(false),
            KeyCode::Right => form.handle_left_right(true),
            KeyCode::Backspace => form.handle_backspace(),
            KeyCode::Delete => form.handle_delete(),
            KeyCode::Char(c) => form.handle_char(c),
            _ => {}
        }
    }

    fn handle_prompt_key(&mut self, kind: PromptKind, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.state = AppState::Board,
            KeyCode::Enter => self.apply_prompt(kind),
            KeyCode::Backspace => self.prompt.handle_backspace(),
            KeyCode::Delete => self.prompt.handle_delete(),
            KeyCode::Left => self.prompt.move_cursor_left(),
            KeyCode::Right => self.prompt.move_cursor_right(),
            KeyCode::Char(c) => self.prompt.handle_char(c),
            _ => {}
        }
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => self.execute_confirmed(),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.confirm_action = None;
                self.state = AppState::Board;
            }
            _ => {}
        }
    }

    /// Dispatch a key event. Returns true when the app should exit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.kind != KeyEventKind::Press {
            return false;
        }
        match self.state {
            AppState::Board => return self.handle_board_key(key),
            AppState::AddTask | AppState::EditTask => self.handle_form_key(key),
            AppState::Prompt(kind) => self.handle_prompt_key(kind, key),
            AppState::Confirm => self.handle_confirm_key(key),
            AppState::Help => {
                if matches!(
                    key.code,
                    KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('h') | KeyCode::Char('?')
                ) {
                    self.state = AppState::Board;
                }
            }
        }
        false
    }

    /// Drive the drag machine from pointer events.
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.state != AppState::Board {
            return;
        }
        let (x, y) = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(id) = self.hit_map.card_at(x, y).map(str::to_string) {
                    if self.drag.start(&self.board, &id) {
                        self.pointer = Some((x, y));
                        self.focus.focused = Some(id);
                        self.refresh_view();
                    }
                } else if let Some(id) = self.hit_map.column_at(x, y).map(str::to_string) {
                    if let Some(index) = self.view.iter().position(|c| c.id == id) {
                        self.selected_column = index;
                        self.focus.focused = None;
                    }
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if !self.drag.is_dragging() {
                    return;
                }
                self.pointer = Some((x, y));
                let target = self.hit_map.target_at(x, y);
                if self.drag.over(&mut self.board, &target) {
                    self.refresh_view();
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.pointer = None;
                let target = self.hit_map.target_at(x, y);
                match self.drag.end(&mut self.board, &target) {
                    DragOutcome::Reordered { .. } => self.set_status_message("Task reordered"),
                    DragOutcome::Dropped { column_id } => {
                        let title = self
                            .board
                            .column(&column_id)
                            .map_or(column_id.clone(), |c| c.title.clone());
                        self.set_status_message(format!("Task in {title}"));
                    }
                    DragOutcome::Ignored => {}
                }
                self.refresh_view();
            }
            _ => {}
        }
    }

    /// Render the board and whatever overlay the current state needs.
    fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Board
                Constraint::Length(1), // Status bar
            ])
            .split(f.area());

        self.render_header(f, chunks[0]);
        self.render_board(f, chunks[1]);
        self.render_status_bar(f, chunks[2]);

        match self.state {
            AppState::Board => {}
            AppState::AddTask | AppState::EditTask => self.render_task_form(f, chunks[1]),
            AppState::Prompt(kind) => self.render_prompt(f, chunks[1], kind),
            AppState::Confirm => self.render_confirm(f, chunks[1]),
            AppState::Help => self.render_help(f, chunks[1]),
        }
        self.render_drag_overlay(f);
    }

    fn render_header(&self, f: &mut Frame, area: Rect) {
        let shown: usize = self.view.iter().map(|c| c.tasks.len()).sum();
        let mut spans = vec![
            Span::styled("TASKBOARD", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(format!("  {shown}/{} tasks", self.board.task_count())),
        ];
        if !self.criteria.is_empty() {
            spans.push(Span::styled(
                format!("  Filter: {}", self.criteria.describe()),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
            ));
        }
        let header = Paragraph::new(Line::from(spans))
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Center);
        f.render_widget(header, area);
    }

    fn render_board(&mut self, f: &mut Frame, area: Rect) {
        if self.view.is_empty() {
            self.hit_map = HitMap::default();
            let empty = Paragraph::new("No columns. Press 'n' to add one.")
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL));
            f.render_widget(empty, area);
            return;
        }

        let constraints: Vec<Constraint> = self
            .view
            .iter()
            .map(|c| {
                if c.collapsed {
                    Constraint::Length(COLLAPSED_WIDTH)
                } else {
                    Constraint::Fill(1)
                }
            })
            .collect();
        let areas = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(constraints)
            .split(area);

        let mut regions = HitMap::default();
        let mut offsets = Vec::with_capacity(self.view.len());
        for (index, column) in self.view.iter().enumerate() {
            let offset = self.column_scroll_offsets.get(index).copied().unwrap_or(0);
            offsets.push(self.render_column(f, areas[index], index, column, offset, &mut regions));
        }
        self.column_scroll_offsets = offsets;
        self.hit_map = regions;
    }

    /// Render one column and return its scroll offset after keeping the
    /// focused card visible.
    fn render_column(
        &self,
        f: &mut Frame,
        area: Rect,
        index: usize,
        column: &Column,
        offset: usize,
        regions: &mut HitMap,
    ) -> usize {
        regions.columns.push((column.id.clone(), area));

        let is_selected = index == self.selected_column;
        let exceeded = column.is_over_wip_limit();
        let count = match column.wip_limit {
            Some(limit) => format!("{}/{limit}", column.tasks.len()),
            None => column.tasks.len().to_string(),
        };

        let mut border_style = if is_selected {
            Style::default().fg(GOLD).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        if exceeded {
            border_style = border_style.fg(Color::Red);
        }

        if column.collapsed {
            let block = Block::default().borders(Borders::ALL).border_style(border_style);
            let height = block.inner(area).height as usize;
            let mut lines = vec![Line::from(count)];
            lines.extend(
                column
                    .title
                    .chars()
                    .take(height.saturating_sub(1))
                    .map(|c| Line::from(c.to_string())),
            );
            f.render_widget(
                Paragraph::new(lines).block(block).alignment(Alignment::Center),
                area,
            );
            return 0;
        }

        let marker = if exceeded { " !" } else { "" };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ({count}){marker} ", column.title))
            .border_style(border_style);
        let inner = block.inner(area);
        f.render_widget(block, area);

        let cards = &column.tasks;
        if cards.is_empty() {
            return 0;
        }

        let visible = usize::from((inner.height / CARD_HEIGHT).max(1));
        let mut offset = offset.min(cards.len() - 1);
        if let Some(focused) = self.focus.focused.as_deref().and_then(|id| column.position_of(id)) {
            if focused < offset {
                offset = focused;
            } else if focused >= offset + visible {
                offset = focused + 1 - visible;
            }
        }

        let mut current_y = 0;
        let mut rendered = 0;
        for task in cards.iter().skip(offset) {
            if current_y + CARD_HEIGHT > inner.height {
                break;
            }
            let card_area = Rect {
                x: inner.x,
                y: inner.y + current_y,
                width: inner.width,
                height: CARD_HEIGHT,
            };
            let is_focused = self.focus.focused.as_deref() == Some(task.id.as_str());
            self.render_card(f, card_area, task, is_focused);
            regions.cards.push((task.id.clone(), card_area));
            current_y += CARD_HEIGHT;
            rendered += 1;
        }

        if offset > 0 {
            let indicator = Paragraph::new(format!("▲ +{offset} above"))
                .style(Style::default().fg(Color::Cyan));
            f.render_widget(indicator, Rect { height: 1, ..inner });
        }
        let remaining = cards.len() - offset - rendered;
        if remaining > 0 && inner.height > 0 {
            let indicator = Paragraph::new(format!("▼ +{remaining} below"))
                .style(Style::default().fg(Color::Cyan));
            f.render_widget(
                indicator,
                Rect {
                    y: inner.y + inner.height - 1,
                    height: 1,
                    ..inner
                },
            );
        }
        offset
    }

    fn render_card(&self, f: &mut Frame, area: Rect, task: &Task, is_focused: bool) {
        let being_dragged = self.drag.active_task().is_some_and(|t| t.id == task.id);
        let style = if is_focused {
            Style::default().bg(GOLD).fg(Color::Black).add_modifier(Modifier::BOLD)
        } else if being_dragged {
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM)
        } else {
            Style::default()
        };

        let width = area.width.saturating_sub(2) as usize;
        let title = Line::from(Span::styled(
            truncate(&task.title, width),
            Style::default().add_modifier(Modifier::BOLD),
        ));

        let mut meta = vec![Span::styled(
            task.priority.label(),
            Style::default().fg(priority_color(task.priority)),
        )];
        if task.due_date.is_some() {
            let due = format_due_relative(task.due_date, Local::now().date_naive());
            let due_style = if task.is_overdue(Utc::now()) {
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            meta.push(Span::raw(" "));
            meta.push(Span::styled(due, due_style));
        }
        if let Some(assignee) = &task.assignee {
            meta.push(Span::raw(format!(" @{}", assignee.initials())));
        }
        if !task.tags.is_empty() {
            meta.push(Span::styled(
                format!(" #{}", task.tags.join(" #")),
                Style::default().fg(Color::Magenta),
            ));
        }

        let card = Paragraph::new(vec![title, Line::from(meta)])
            .block(Block::default().borders(Borders::ALL))
            .style(style);
        f.render_widget(card, area);
    }

    /// The dragged card follows the pointer.
    fn render_drag_overlay(&self, f: &mut Frame) {
        let (Some(task), Some((x, y))) = (self.drag.active_task(), self.pointer) else {
            return;
        };
        let screen = f.area();
        let width = (task.title.chars().count() as u16 + 4).min(30).min(screen.width);
        let height = 3.min(screen.height);
        let area = Rect {
            x: x.min(screen.width.saturating_sub(width)),
            y: y.min(screen.height.saturating_sub(height)),
            width,
            height,
        };
        let overlay = Paragraph::new(truncate(&task.title, usize::from(width.saturating_sub(2))))
            .block(Block::default().borders(Borders::ALL))
            .style(Style::default().bg(DARK_PURPLE).fg(Color::White));
        f.render_widget(Clear, area);
        f.render_widget(overlay, area);
    }

    fn render_status_bar(&self, f: &mut Frame, area: Rect) {
        let status_text = if self.search_active {
            let pending = if self.debounce.is_pending() { " (searching…)" } else { "" };
            format!("Search: {}{pending} | Enter to apply, Esc to clear", self.search.value)
        } else if !self.status_message.is_empty() {
            self.status_message.clone()
        } else {
            "a: Add | e: Edit | x: Delete | /: Search | f/p/g: Filter | n: Column | h: Help | q: Quit"
                .to_string()
        };
        let status = Paragraph::new(status_text)
            .style(Style::default().bg(DARK_GREEN).fg(Color::White))
            .alignment(Alignment::Left);
        f.render_widget(status, area);

        if self.search_active {
            let x = area.x + "Search: ".len() as u16 + self.search.cursor as u16;
            f.set_cursor_position((x.min(area.right().saturating_sub(1)), area.y));
        }
    }

    fn render_task_form(&self, f: &mut Frame, area: Rect) {
        let Some(form) = &self.task_form else {
            return;
        };
        let area = centered_rect(70, 90, area);
        f.render_widget(Clear, area);

        let title = if form.is_new() { "Add Task" } else { "Edit Task" };
        let outer = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(GOLD));
        let inner = outer.inner(area);
        f.render_widget(outer, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Length(3), // Description
                Constraint::Length(3), // Assignee
                Constraint::Length(3), // Tags
                Constraint::Length(3), // Due
                Constraint::Length(3), // Priority
                Constraint::Length(3), // Column
                Constraint::Min(0),    // Instructions
            ])
            .split(inner);

        let field_style = |index: usize| {
            if form.current_field == index {
                Style::default().fg(GOLD)
            } else {
                Style::default()
            }
        };
        let text_fields = [
            (TITLE_FIELD, "Title *", &form.title),
            (DESCRIPTION_FIELD, "Description", &form.description),
            (ASSIGNEE_FIELD, "Assignee", &form.assignee),
            (TAGS_FIELD, "Tags (comma-separated)", &form.tags),
            (DUE_FIELD, "Due (YYYY-MM-DD, today, in 3d, friday)", &form.due),
        ];
        for (index, label, input) in text_fields {
            let widget = Paragraph::new(input.value.as_str()).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(label)
                    .border_style(field_style(index)),
            );
            f.render_widget(widget, rows[index]);
            if input.active {
                let rect = rows[index];
                let x = (rect.x + 1 + input.cursor as u16).min(rect.right().saturating_sub(2));
                f.set_cursor_position((x, rect.y + 1));
            }
        }

        let priority = Paragraph::new(Line::from(vec![
            Span::raw("< "),
            Span::styled(
                form.priority.label(),
                Style::default().fg(priority_color(form.priority)),
            ),
            Span::raw(" >"),
        ]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Priority")
                .border_style(field_style(PRIORITY_SELECTOR)),
        );
        f.render_widget(priority, rows[PRIORITY_SELECTOR]);

        let column = Paragraph::new(format!("< {} >", form.selected_column_title())).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Column")
                .border_style(field_style(COLUMN_SELECTOR)),
        );
        f.render_widget(column, rows[COLUMN_SELECTOR]);

        let help = Paragraph::new("Tab/↑↓: Field | ←→: Cursor or selector | Enter: Save | Esc: Cancel")
            .style(Style::default().fg(Color::DarkGray))
            .wrap(Wrap { trim: true });
        f.render_widget(help, rows[7]);
    }

    fn render_prompt(&self, f: &mut Frame, area: Rect, kind: PromptKind) {
        let area = centered_rect(50, 20, area);
        f.render_widget(Clear, area);
        let block = Block::default()
            .borders(Borders::ALL)
            .title(kind.title())
            .border_style(Style::default().fg(GOLD));
        let inner = block.inner(area);
        f.render_widget(Paragraph::new(self.prompt.value.as_str()).block(block), area);
        if inner.width > 0 && inner.height > 0 {
            let x = (inner.x + self.prompt.cursor as u16).min(inner.right().saturating_sub(1));
            f.set_cursor_position((x, inner.y));
        }
    }

    /// Render a confirmation dialog for destructive actions.
    fn render_confirm(&self, f: &mut Frame, area: Rect) {
        let block = Block::default()
            .title("Confirm Action")
            .borders(Borders::ALL)
            .style(Style::default().bg(DARK_RED));

        let area = centered_rect(50, 30, area);
        f.render_widget(Clear, area);

        let action = self
            .confirm_action
            .as_ref()
            .map(ConfirmAction::describe)
            .unwrap_or_default();
        let mut text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Are you sure you want to:",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(action),
            Line::from(""),
        ];
        if let Some(ConfirmAction::DeleteColumn { id, .. }) = &self.confirm_action {
            let first = self.board.columns().first().map(|c| c.id.as_str());
            text.push(Line::from(if first == Some(id.as_str()) {
                "Its tasks will be deleted too."
            } else {
                "Its tasks will move to the first column."
            }));
        }
        text.push(Line::from("Press 'y' to confirm, 'n' to cancel"));

        let paragraph = Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }

    fn render_help(&self, f: &mut Frame, area: Rect) {
        let heading = |s: &'static str| {
            Line::from(Span::styled(s, Style::default().add_modifier(Modifier::BOLD)))
        };
        let help_text = vec![
            heading("Navigation:"),
            Line::from("  ←↑↓→ Home End   Move focus between cards"),
            Line::from("  Enter           Focus first To Do card, or edit focused card"),
            Line::from("  Tab/Shift+Tab   Select column"),
            Line::from("  Mouse drag      Move a card; drop on a card to reorder"),
            Line::from(""),
            heading("Cards:"),
            Line::from("  a / e           Add / edit task"),
            Line::from("  x               Delete focused task"),
            Line::from("  y               Duplicate focused task"),
            Line::from("  Ctrl+←/→        Move card to adjacent column"),
            Line::from("  Ctrl+↑/↓        Move card up/down"),
            Line::from(""),
            heading("Columns:"),
            Line::from("  n               Add column"),
            Line::from("  r               Rename column"),
            Line::from("  w               Set WIP limit"),
            Line::from("  z               Collapse/expand column"),
            Line::from("  D               Delete column"),
            Line::from(""),
            heading("Filters:"),
            Line::from("  /               Search title, description, assignee, tags"),
            Line::from("  f / p / g       Cycle assignee / priority / tag filter"),
            Line::from("  c               Clear filters"),
            Line::from(""),
            Line::from("  h/?             Show this help"),
            Line::from("  q/Ctrl+C/Esc    Quit"),
        ];

        let area = centered_rect(70, 90, area);
        f.render_widget(Clear, area);
        let paragraph = Paragraph::new(help_text)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Help - Esc to return"),
            )
            .wrap(Wrap { trim: false });
        f.render_widget(paragraph, area);
    }

    /// Main event loop.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        let tick = self.config.tick();
        loop {
            terminal.draw(|f| self.render(f))?;

            if event::poll(tick)? {
                let quit = match event::read()? {
                    Event::Key(key) => self.handle_key(key),
                    Event::Mouse(mouse) => {
                        self.handle_mouse(mouse);
                        false
                    }
                    _ => false,
                };
                if quit {
                    break;
                }
            }
            self.on_tick(Instant::now());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::tests::board;
    use crate::fields::Priority;
    use ratatui::backend::TestBackend;
    use rstest::{fixture, rstest};
    use std::time::Duration;

    #[fixture]
    fn app(board: Board) -> BoardApp {
        BoardApp::new(board, Config::default())
    }

    fn draw(app: &mut BoardApp) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn press(app: &mut BoardApp, code: KeyCode) -> bool {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ctrl(app: &mut BoardApp, code: KeyCode) -> bool {
        app.handle_key(KeyEvent::new(code, KeyModifiers::CONTROL))
    }

    fn type_text(app: &mut BoardApp, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn pointer(app: &mut BoardApp, kind: MouseEventKind, (column, row): (u16, u16)) {
        app.handle_mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        });
    }

    fn card_point(app: &BoardApp, id: &str) -> (u16, u16) {
        let (_, rect) = app
            .hit_map
            .cards
            .iter()
            .find(|(card, _)| card == id)
            .unwrap();
        (rect.x + rect.width / 2, rect.y + 1)
    }

    fn ids(app: &BoardApp, column_id: &str) -> Vec<String> {
        app.board()
            .column(column_id)
            .unwrap()
            .tasks
            .iter()
            .map(|t| t.id.clone())
            .collect()
    }

    fn shown(app: &BoardApp) -> Vec<usize> {
        app.view.iter().map(|c| c.tasks.len()).collect()
    }

    #[rstest]
    fn test_enter_focuses_todo_and_arrows_move(mut app: BoardApp) {
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.focus.focused.as_deref(), Some("t1"));
        assert_eq!(app.status_message, "Task t1, task 1 of 3 in To Do");
        press(&mut app, KeyCode::End);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.focus.focused.as_deref(), Some("t4"));
        assert_eq!(app.selected_column, 1);
    }

    #[rstest]
    fn test_keyboard_move_across_and_within(mut app: BoardApp) {
        press(&mut app, KeyCode::Enter);
        ctrl(&mut app, KeyCode::Right);
        assert_eq!(ids(&app, "doing"), vec!["t4", "t1"]);
        assert_eq!(app.board().task("t1").unwrap().column_id, "doing");
        assert_eq!(app.focus.focused.as_deref(), Some("t1"));
        ctrl(&mut app, KeyCode::Up);
        assert_eq!(ids(&app, "doing"), vec!["t1", "t4"]);
        ctrl(&mut app, KeyCode::Up);
        assert_eq!(ids(&app, "doing"), vec!["t1", "t4"]);
        app.board().validate().unwrap();
    }

    #[rstest]
    fn test_add_task_through_form(mut app: BoardApp) {
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.state, AppState::AddTask);
        type_text(&mut app, "New card");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.state, AppState::Board);
        let todo = app.board().column("todo").unwrap();
        assert_eq!(todo.tasks.len(), 4);
        let added = &todo.tasks[3];
        assert_eq!(added.title, "New card");
        assert!(added.due_date.is_some());
        assert_eq!(app.focus.focused.as_deref(), Some(added.id.as_str()));
    }

    #[rstest]
    fn test_empty_title_keeps_form_open(mut app: BoardApp) {
        let before = app.board().clone();
        press(&mut app, KeyCode::Char('a'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.state, AppState::AddTask);
        assert!(app.status_message.contains("title"));
        assert_eq!(app.board(), &before);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.state, AppState::Board);
    }

    #[rstest]
    fn test_form_swallows_navigation_keys(mut app: BoardApp) {
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('e'));
        press(&mut app, KeyCode::Down);
        assert_eq!(app.task_form.as_ref().unwrap().current_field, DESCRIPTION_FIELD);
        assert_eq!(app.focus.focused.as_deref(), Some("t1"));
    }

    #[rstest]
    fn test_mouse_drag_previews_and_keeps_drop(mut app: BoardApp) {
        draw(&mut app);
        let from = card_point(&app, "t1");
        let over = card_point(&app, "t4");
        pointer(&mut app, MouseEventKind::Down(MouseButton::Left), from);
        assert!(app.drag.is_dragging());
        pointer(&mut app, MouseEventKind::Drag(MouseButton::Left), over);
        assert_eq!(ids(&app, "doing"), vec!["t4", "t1"]);
        let screen = draw(&mut app);
        assert!(screen.contains("Task t1"));
        pointer(&mut app, MouseEventKind::Up(MouseButton::Left), (0, 0));
        assert!(!app.drag.is_dragging());
        assert_eq!(ids(&app, "todo"), vec!["t2", "t3"]);
        assert_eq!(ids(&app, "doing"), vec!["t4", "t1"]);
    }

    #[rstest]
    fn test_mouse_drop_on_same_column_card_reorders(mut app: BoardApp) {
        draw(&mut app);
        let from = card_point(&app, "t1");
        let onto = card_point(&app, "t3");
        pointer(&mut app, MouseEventKind::Down(MouseButton::Left), from);
        pointer(&mut app, MouseEventKind::Drag(MouseButton::Left), onto);
        pointer(&mut app, MouseEventKind::Up(MouseButton::Left), onto);
        assert_eq!(ids(&app, "todo"), vec!["t2", "t3", "t1"]);
        assert_eq!(app.status_message, "Task reordered");
    }

    #[rstest]
    fn test_search_is_debounced(mut app: BoardApp) {
        press(&mut app, KeyCode::Char('/'));
        type_text(&mut app, "t5");
        assert_eq!(shown(&app), vec![3, 1, 2]);
        app.on_tick(Instant::now() + Duration::from_secs(1));
        assert_eq!(shown(&app), vec![0, 0, 1]);
        press(&mut app, KeyCode::Esc);
        assert_eq!(shown(&app), vec![3, 1, 2]);
        assert!(!app.search_active);
    }

    #[rstest]
    fn test_status_bar_shows_pending_search(mut app: BoardApp) {
        press(&mut app, KeyCode::Char('/'));
        type_text(&mut app, "t5");
        assert!(draw(&mut app).contains("Search: t5 (searching…)"));
        app.on_tick(Instant::now() + Duration::from_secs(1));
        let screen = draw(&mut app);
        assert!(screen.contains("Search: t5 | Enter to apply"));
        assert!(!screen.contains("searching"));
    }

    #[rstest]
    fn test_search_enter_applies_immediately(mut app: BoardApp) {
        press(&mut app, KeyCode::Char('/'));
        type_text(&mut app, "task t2");
        press(&mut app, KeyCode::Enter);
        assert_eq!(shown(&app), vec![1, 0, 0]);
        // Board keys work again, and Esc first clears the filter.
        assert!(!press(&mut app, KeyCode::Esc));
        assert_eq!(shown(&app), vec![3, 1, 2]);
        assert!(press(&mut app, KeyCode::Esc));
    }

    #[rstest]
    fn test_priority_filter_cycles_through_values_in_use(mut app: BoardApp) {
        press(&mut app, KeyCode::Char('p'));
        assert_eq!(app.criteria.priority, Some(Priority::Medium));
        press(&mut app, KeyCode::Char('p'));
        assert_eq!(app.criteria.priority, None);
    }

    #[rstest]
    fn test_add_column_until_capacity(mut app: BoardApp) {
        for _ in 0..3 {
            press(&mut app, KeyCode::Char('n'));
        }
        assert_eq!(app.board().columns().len(), 6);
        assert_eq!(app.selected_column, 5);
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.board().columns().len(), 6);
        assert!(app.status_message.contains("at most 6"));
    }

    #[rstest]
    fn test_delete_column_after_confirm(mut app: BoardApp) {
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Char('D'));
        assert_eq!(app.state, AppState::Confirm);
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.board().columns().len(), 3);
        press(&mut app, KeyCode::Char('D'));
        press(&mut app, KeyCode::Char('y'));
        assert_eq!(app.board().columns().len(), 2);
        assert_eq!(ids(&app, "todo"), vec!["t1", "t2", "t3", "t4"]);
    }

    #[rstest]
    fn test_delete_task_after_confirm(mut app: BoardApp) {
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('x'));
        press(&mut app, KeyCode::Char('y'));
        assert_eq!(ids(&app, "todo"), vec!["t2", "t3"]);
        assert_eq!(app.focus.focused, None);
    }

    #[rstest]
    fn test_wip_limit_prompt_marks_column(mut app: BoardApp) {
        press(&mut app, KeyCode::Char('w'));
        type_text(&mut app, "2");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.board().column("todo").unwrap().wip_limit, Some(2));
        assert!(app.board().column_exceeds_wip("todo"));
        assert!(draw(&mut app).contains("To Do (3/2) !"));
    }

    #[rstest]
    fn test_wip_limit_prompt_rejects_garbage(mut app: BoardApp) {
        press(&mut app, KeyCode::Char('w'));
        type_text(&mut app, "lots");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.state, AppState::Prompt(PromptKind::WipLimit));
        assert_eq!(app.board().column("todo").unwrap().wip_limit, None);
    }

    #[rstest]
    fn test_rename_column(mut app: BoardApp) {
        press(&mut app, KeyCode::Char('r'));
        for _ in 0.."To Do".len() {
            press(&mut app, KeyCode::Backspace);
        }
        type_text(&mut app, "Backlog");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.board().column("todo").unwrap().title, "Backlog");
    }

    #[rstest]
    fn test_collapsed_column_is_skipped_by_navigation(mut app: BoardApp) {
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Char('z'));
        assert!(app.board().column("doing").unwrap().collapsed);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.focus.focused.as_deref(), Some("t1"));
        press(&mut app, KeyCode::Right);
        assert_eq!(app.focus.focused.as_deref(), Some("t1"));
    }

    #[rstest]
    fn test_duplicate_focuses_copy(mut app: BoardApp) {
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('y'));
        let todo = app.board().column("todo").unwrap();
        assert_eq!(todo.tasks.len(), 4);
        assert_eq!(todo.tasks[3].title, "Task t1 (Copy)");
        assert_eq!(app.focus.focused.as_deref(), Some(todo.tasks[3].id.as_str()));
    }

    #[rstest]
    #[case("", None)]
    #[case(" 4 ", Some(4))]
    #[case("0", Some(0))]
    fn test_parse_wip_limit(#[case] input: &str, #[case] expected: Option<u32>) {
        assert_eq!(parse_wip_limit(input).unwrap(), expected);
    }

    #[test]
    fn test_parse_wip_limit_rejects_negative() {
        assert!(parse_wip_limit("-1").is_err());
    }
}
