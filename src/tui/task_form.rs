//! Task form state for the add/edit modal.
//!
//! The form edits a copy of a task record. Nothing reaches the board until
//! [`TaskForm::to_task`] produces the finished record and the app hands it to
//! `Board::save_task`.

use chrono::NaiveDate;

use crate::dates::{end_of_day, parse_due_input};
use crate::error::{BoardError, Result};
use crate::fields::{Assignee, Priority};
use crate::task::{Column, Task};
use crate::tui::input::InputField;

pub const TITLE_FIELD: usize = 0;
pub const DESCRIPTION_FIELD: usize = 1;
pub const ASSIGNEE_FIELD: usize = 2;
pub const TAGS_FIELD: usize = 3;
pub const DUE_FIELD: usize = 4;
pub const PRIORITY_SELECTOR: usize = 5;
pub const COLUMN_SELECTOR: usize = 6;
const FIELD_COUNT: usize = 7;

/// Form state for creating and editing tasks.
#[derive(Debug, Clone)]
pub struct TaskForm {
    pub title: InputField,
    pub description: InputField,
    pub assignee: InputField,
    pub tags: InputField,
    pub due: InputField,
    pub priority: Priority,
    /// (id, title) of every column, in board order.
    pub columns: Vec<(String, String)>,
    pub column: usize,
    pub current_field: usize,
    base: Task,
}

impl TaskForm {
    /// Load a task record (provisional or existing) into the form.
    pub fn from_task(task: &Task, columns: &[Column]) -> Self {
        let choices: Vec<(String, String)> = columns
            .iter()
            .map(|c| (c.id.clone(), c.title.clone()))
            .collect();
        let column = choices
            .iter()
            .position(|(id, _)| *id == task.column_id)
            .unwrap_or(0);
        let due = task
            .due_date
            .map(|d| d.date_naive().format("%Y-%m-%d").to_string())
            .unwrap_or_default();

        let mut form = Self {
            title: InputField::with_value(&task.title),
            description: InputField::with_value(&task.description),
            assignee: InputField::with_value(task.assignee_name().unwrap_or("")),
            tags: InputField::with_value(&task.tags.join(", ")),
            due: InputField::with_value(&due),
            priority: task.priority,
            columns: choices,
            column,
            current_field: TITLE_FIELD,
            base: task.clone(),
        };
        form.update_active_field();
        form
    }

    /// Whether the form is creating a task rather than editing one.
    pub fn is_new(&self) -> bool {
        self.base.is_provisional()
    }

    pub fn selected_column_title(&self) -> &str {
        self.columns.get(self.column).map_or("-", |(_, title)| title.as_str())
    }

    fn fields_mut(&mut self) -> [&mut InputField; 5] {
        [
            &mut self.title,
            &mut self.description,
            &mut self.assignee,
            &mut self.tags,
            &mut self.due,
        ]
    }

    fn active_input(&mut self) -> Option<&mut InputField> {
        match self.current_field {
            TITLE_FIELD => Some(&mut self.title),
            DESCRIPTION_FIELD => Some(&mut self.description),
            ASSIGNEE_FIELD => Some(&mut self.assignee),
            TAGS_FIELD => Some(&mut self.tags),
            DUE_FIELD => Some(&mut self.due),
            _ => None,
        }
    }

    pub fn next_field(&mut self) {
        self.current_field = (self.current_field + 1) % FIELD_COUNT;
        self.update_active_field();
    }

    pub fn prev_field(&mut self) {
        self.current_field = (self.current_field + FIELD_COUNT - 1) % FIELD_COUNT;
        self.update_active_field();
    }

    fn update_active_field(&mut self) {
        for field in self.fields_mut() {
            field.active = false;
        }
        if let Some(field) = self.active_input() {
            field.active = true;
        }
    }

    pub fn handle_char(&mut self, c: char) {
        if let Some(field) = self.active_input() {
            field.handle_char(c);
        }
    }

    pub fn handle_backspace(&mut self) {
        if let Some(field) = self.active_input() {
            field.handle_backspace();
        }
    }

    pub fn handle_delete(&mut self) {
        if let Some(field) = self.active_input() {
            field.handle_delete();
        }
    }

    /// Left/right moves the cursor in text fields and cycles selectors.
    pub fn handle_left_right(&mut self, right: bool) {
        match self.current_field {
            PRIORITY_SELECTOR => {
                self.priority = if right { self.priority.next() } else { self.priority.prev() };
            }
            COLUMN_SELECTOR if !self.columns.is_empty() => {
                let n = self.columns.len();
                self.column = if right { (self.column + 1) % n } else { (self.column + n - 1) % n };
            }
            _ => {
                if let Some(field) = self.active_input() {
                    if right {
                        field.move_cursor_right();
                    } else {
                        field.move_cursor_left();
                    }
                }
            }
        }
    }

    /// Build the finished task record.
    ///
    /// Title emptiness is left to the store; only the due date is checked
    /// here because its text form is local to the modal.
    pub fn to_task(&self, today: NaiveDate) -> Result<Task> {
        let mut task = self.base.clone();
        task.title = self.title.value.trim().to_string();
        task.description = self.description.value.trim().to_string();
        task.priority = self.priority;
        if let Some((id, _)) = self.columns.get(self.column) {
            task.column_id = id.clone();
        }

        let name = self.assignee.value.trim();
        task.assignee = match &self.base.assignee {
            _ if name.is_empty() => None,
            Some(existing) if existing.name == name => Some(existing.clone()),
            _ => Some(Assignee::new(name)),
        };

        task.tags = self
            .tags
            .value
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect();

        let due = self.due.value.trim();
        task.due_date = if due.is_empty() {
            None
        } else {
            let date = parse_due_input(due, today).ok_or_else(|| {
                BoardError::validation("due", format!("cannot read due date '{due}'"))
            })?;
            match self.base.due_date {
                // Unchanged date keeps its exact instant.
                Some(existing) if existing.date_naive() == date => Some(existing),
                _ => Some(end_of_day(date)),
            }
        };
        Ok(task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::tests::{board, task};
    use crate::board::Board;
    use chrono::{Duration, TimeZone, Utc};
    use rstest::rstest;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 14).unwrap()
    }

    fn type_text(form: &mut TaskForm, text: &str) {
        for c in text.chars() {
            form.handle_char(c);
        }
    }

    #[rstest]
    fn test_new_task_form_round_trip(board: Board) {
        let now = Utc.with_ymd_and_hms(2026, 10, 14, 9, 0, 0).unwrap();
        let provisional = board.add_task_at("doing", now, Duration::days(3));
        let mut form = TaskForm::from_task(&provisional, board.columns());
        assert!(form.is_new());
        assert_eq!(form.selected_column_title(), "In Progress");
        assert_eq!(form.due.value, "2026-10-17");

        type_text(&mut form, "  Write docs ");
        form.next_field();
        type_text(&mut form, "for the CLI");
        form.next_field();
        type_text(&mut form, "Ada Lovelace");
        form.next_field();
        type_text(&mut form, "docs, ,cli");

        let saved = form.to_task(today()).unwrap();
        assert_eq!(saved.title, "Write docs");
        assert_eq!(saved.description, "for the CLI");
        assert_eq!(saved.assignee_name(), Some("Ada Lovelace"));
        assert_eq!(saved.tags, vec!["docs", "cli"]);
        assert_eq!(saved.due_date, provisional.due_date);
        assert!(saved.is_provisional());
    }

    #[rstest]
    fn test_selectors_cycle(board: Board) {
        let mut form = TaskForm::from_task(&task("t1", "One", "todo"), board.columns());
        form.current_field = PRIORITY_SELECTOR;
        form.handle_left_right(true);
        assert_eq!(form.priority, Priority::High);
        form.next_field();
        assert_eq!(form.current_field, COLUMN_SELECTOR);
        form.handle_left_right(false);
        assert_eq!(form.to_task(today()).unwrap().column_id, "done");
        form.next_field();
        assert_eq!(form.current_field, TITLE_FIELD);
        assert!(form.title.active);
    }

    #[rstest]
    fn test_typed_due_date_is_end_of_day(board: Board) {
        let mut form = TaskForm::from_task(&task("t1", "One", "todo"), board.columns());
        form.current_field = DUE_FIELD;
        type_text(&mut form, "tomorrow");
        let saved = form.to_task(today()).unwrap();
        assert_eq!(saved.due_date, Some(end_of_day(NaiveDate::from_ymd_opt(2026, 10, 15).unwrap())));
    }

    #[rstest]
    #[case("someday")]
    #[case("in 100000000d")]
    fn test_bad_due_date_is_a_validation_error(board: Board, #[case] input: &str) {
        let mut form = TaskForm::from_task(&task("t1", "One", "todo"), board.columns());
        form.current_field = DUE_FIELD;
        type_text(&mut form, input);
        assert!(matches!(
            form.to_task(today()),
            Err(BoardError::ValidationFailed { ref field, .. }) if field == "due"
        ));
    }

    #[rstest]
    fn test_clearing_assignee(board: Board) {
        let mut existing = task("t1", "One", "todo");
        existing.assignee = Some(Assignee {
            name: "Ada".into(),
            avatar: "ada.png".into(),
        });
        let mut form = TaskForm::from_task(&existing, board.columns());
        assert_eq!(form.to_task(today()).unwrap().assignee, existing.assignee);
        form.assignee.clear();
        assert_eq!(form.to_task(today()).unwrap().assignee, None);
    }
}
