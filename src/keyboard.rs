//! Keyboard navigation state machine.
//!
//! Focus moves over a grid whose columns are the displayed board columns and
//! whose rows are each column's tasks. The current position is always
//! derived from the id of the focused task, so there is no cursor that can
//! drift away from what is actually focused. The machine never mutates the
//! board; it only asks a [`FocusTarget`] to move focus and announce it.

use tracing::trace;

use crate::task::Column;

/// Navigation keys understood by the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    Enter,
}

/// A cell in the navigation grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridPosition {
    pub column: usize,
    pub task: usize,
}

/// What currently owns keyboard input outside the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputContext {
    /// The board itself has focus.
    #[default]
    Board,
    /// A modal (the task form) is open.
    Modal,
    /// A text input, text area or select control has focus.
    TextEntry,
}

/// Port to whatever actually owns focus (the terminal view, in practice).
pub trait FocusTarget {
    /// Resolve a grid position to the id of the element displayed there.
    fn identify(&self, position: GridPosition) -> Option<String>;
    /// Focus the element and scroll it into view.
    fn move_focus_to(&mut self, task_id: &str);
    /// Emit a textual announcement for assistive technology.
    fn announce(&mut self, text: &str);
}

/// Result of a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavOutcome {
    /// Focus moved to the given task.
    Moved { task_id: String, position: GridPosition },
    /// The key was valid but there was nowhere to go.
    NoMovement,
    /// The machine is suppressed in the current input context.
    Suppressed,
}

/// Column titles or ids that mark the default entry column for `Enter`.
const ENTRY_COLUMN_TITLE: &str = "to do";
const ENTRY_COLUMN_ID: &str = "todo";

/// Stateless navigator over a column slice.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeyboardNav;

impl KeyboardNav {
    pub fn new() -> Self {
        Self
    }

    /// Handle a navigation key.
    ///
    /// `focused` is the id of the currently focused task, if any.
    pub fn key_press(
        &self,
        columns: &[Column],
        key: NavKey,
        focused: Option<&str>,
        context: InputContext,
        focus: &mut dyn FocusTarget,
    ) -> NavOutcome {
        if context != InputContext::Board {
            trace!(?key, ?context, "navigation suppressed");
            return NavOutcome::Suppressed;
        }

        let current = focused.and_then(|id| locate(columns, id));
        let target = match (key, current) {
            (NavKey::Enter, None) => entry_position(columns),
            (_, None) => None,
            (key, Some(pos)) => next_position(columns, key, pos),
        };

        let Some(position) = target else {
            return NavOutcome::NoMovement;
        };
        let Some(task_id) = focus.identify(position) else {
            return NavOutcome::NoMovement;
        };

        focus.move_focus_to(&task_id);
        focus.announce(&announcement(columns, position));
        NavOutcome::Moved { task_id, position }
    }
}

/// Find the grid position of a task by id.
pub fn locate(columns: &[Column], task_id: &str) -> Option<GridPosition> {
    columns.iter().enumerate().find_map(|(column, c)| {
        c.position_of(task_id)
            .map(|task| GridPosition { column, task })
    })
}

/// Compute the target of a directional key from `pos`.
pub fn next_position(columns: &[Column], key: NavKey, pos: GridPosition) -> Option<GridPosition> {
    let len = |c: usize| columns.get(c).map_or(0, |col| col.tasks.len());
    match key {
        NavKey::Up => {
            if pos.task > 0 {
                Some(GridPosition { task: pos.task - 1, ..pos })
            } else if pos.column > 0 && len(pos.column - 1) > 0 {
                Some(GridPosition {
                    column: pos.column - 1,
                    task: len(pos.column - 1) - 1,
                })
            } else {
                None
            }
        }
        NavKey::Down => {
            if pos.task + 1 < len(pos.column) {
                Some(GridPosition { task: pos.task + 1, ..pos })
            } else if len(pos.column + 1) > 0 {
                Some(GridPosition {
                    column: pos.column + 1,
                    task: 0,
                })
            } else {
                None
            }
        }
        NavKey::Left => {
            let column = pos.column.checked_sub(1)?;
            sideways(len(column), column, pos.task)
        }
        NavKey::Right => sideways(len(pos.column + 1), pos.column + 1, pos.task),
        NavKey::Home => (len(pos.column) > 0).then_some(GridPosition { task: 0, ..pos }),
        NavKey::End => {
            let n = len(pos.column);
            (n > 0).then(|| GridPosition { task: n - 1, ..pos })
        }
        NavKey::Enter => None,
    }
}

fn sideways(target_len: usize, column: usize, task: usize) -> Option<GridPosition> {
    (target_len > 0).then(|| GridPosition {
        column,
        task: task.min(target_len - 1),
    })
}

/// First task of the "To Do" column, else of the first non-empty column.
pub fn entry_position(columns: &[Column]) -> Option<GridPosition> {
    let is_entry = |c: &Column| {
        c.title.trim().eq_ignore_ascii_case(ENTRY_COLUMN_TITLE)
            || c.id.eq_ignore_ascii_case(ENTRY_COLUMN_ID)
    };
    columns
        .iter()
        .position(|c| is_entry(c) && !c.tasks.is_empty())
        .or_else(|| columns.iter().position(|c| !c.tasks.is_empty()))
        .map(|column| GridPosition { column, task: 0 })
}

/// Text announced after focus lands on `position`.
pub fn announcement(columns: &[Column], position: GridPosition) -> String {
    let column = &columns[position.column];
    let title = column
        .tasks
        .get(position.task)
        .map_or("", |t| t.title.as_str());
    format!(
        "{}, task {} of {} in {}",
        title,
        position.task + 1,
        column.tasks.len(),
        column.title
    )
}
