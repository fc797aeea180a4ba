//! The board store.
//!
//! `Board` owns the authoritative, ordered list of columns. Every mutation
//! computes the complete next column list and only then swaps it in, so no
//! caller can ever observe a half-applied change. Lookups that miss are
//! absorbed as no-ops to keep interaction responsive against a momentarily
//! stale view; validation and capacity failures are returned as errors and
//! leave the board untouched.

use std::collections::{BTreeSet, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use ulid::Ulid;

use crate::config::ColumnSeed;
use crate::error::{BoardError, Result};
use crate::fields::{Assignee, Priority};
use crate::filter;
use crate::ordering::{move_between, reorder};
use crate::task::{Column, Task};

/// Hard cap on the number of columns a board may hold.
pub const MAX_COLUMNS: usize = 6;

/// Days between task creation and its default due date.
pub const DEFAULT_DUE_DAYS: i64 = 3;

/// Suffix appended to the title of a duplicated task.
const COPY_SUFFIX: &str = " (Copy)";

/// Where a task currently lives on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskLocation {
    pub column_index: usize,
    pub task_index: usize,
}

/// In-memory board of ordered columns.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Board {
    columns: Vec<Column>,
}

impl Board {
    /// Build a board from an explicit column list, checking every invariant.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let board = Board { columns };
        board.validate()?;
        Ok(board)
    }

    /// Build an empty board from configured column seeds.
    ///
    /// Seeds beyond the column cap are dropped with a warning. Seeds whose
    /// ids collide or come out empty are rejected.
    pub fn from_seeds(seeds: &[ColumnSeed]) -> Result<Self> {
        if seeds.len() > MAX_COLUMNS {
            warn!(
                seeds = seeds.len(),
                max = MAX_COLUMNS,
                "ignoring column seeds beyond the column cap"
            );
        }
        let columns = seeds
            .iter()
            .take(MAX_COLUMNS)
            .map(|seed| {
                let mut column = Column::new(seed.column_id(), seed.title.clone());
                column.wip_limit = seed.wip_limit.filter(|&limit| limit > 0);
                column
            })
            .collect();
        Board::new(columns)
    }

    /// Load a seed board from a JSON file.
    ///
    /// The file is only ever read; mutations are never written back.
    pub fn load(path: &Path) -> Result<Self> {
        let mut buf = String::new();
        File::open(path)?.read_to_string(&mut buf)?;
        let mut board: Board = serde_json::from_str(&buf)?;
        // A zero limit means no limit, as in `set_wip_limit`.
        for column in &mut board.columns {
            column.wip_limit = column.wip_limit.filter(|&limit| limit > 0);
        }
        board.validate()?;
        info!(path = %path.display(), columns = board.columns.len(), tasks = board.task_count(), "loaded seed board");
        Ok(board)
    }

    /// Serialise the board as pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, column_id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == column_id)
    }

    pub fn column_index(&self, column_id: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.id == column_id)
    }

    /// Locate a task by id.
    pub fn find_task(&self, task_id: &str) -> Option<TaskLocation> {
        self.columns.iter().enumerate().find_map(|(column_index, column)| {
            column.position_of(task_id).map(|task_index| TaskLocation {
                column_index,
                task_index,
            })
        })
    }

    /// Get a task by id.
    pub fn task(&self, task_id: &str) -> Option<&Task> {
        let loc = self.find_task(task_id)?;
        self.columns[loc.column_index].tasks.get(loc.task_index)
    }

    pub fn task_count(&self) -> usize {
        self.columns.iter().map(|c| c.tasks.len()).sum()
    }

    /// Whether the named column is over its advisory WIP limit.
    pub fn column_exceeds_wip(&self, column_id: &str) -> bool {
        self.column(column_id).is_some_and(Column::is_over_wip_limit)
    }

    /// Distinct assignees on the board, sorted by name.
    pub fn assignees(&self) -> Vec<Assignee> {
        filter::assignees(&self.columns)
    }

    /// Distinct tags on the board.
    pub fn tags(&self) -> BTreeSet<String> {
        filter::tags(&self.columns)
    }

    /// Distinct priorities in use on the board.
    pub fn priorities(&self) -> BTreeSet<Priority> {
        filter::priorities(&self.columns)
    }

    /// Check the structural invariants: column cap, unique column ids,
    /// unique task ids, and every task's `column_id` naming its holder.
    pub fn validate(&self) -> Result<()> {
        if self.columns.len() > MAX_COLUMNS {
            return Err(BoardError::CapacityExceeded { max: MAX_COLUMNS });
        }
        let mut column_ids = HashSet::new();
        let mut task_ids = HashSet::new();
        for column in &self.columns {
            if column.id.is_empty() {
                return Err(BoardError::validation(
                    "column",
                    format!("column '{}' has no id", column.title),
                ));
            }
            if !column_ids.insert(column.id.as_str()) {
                return Err(BoardError::validation(
                    "column",
                    format!("duplicate column id '{}'", column.id),
                ));
            }
            for task in &column.tasks {
                if task.id.is_empty() {
                    return Err(BoardError::validation(
                        "task",
                        format!("task '{}' in column '{}' has no id", task.title, column.id),
                    ));
                }
                if !task_ids.insert(task.id.as_str()) {
                    return Err(BoardError::validation(
                        "task",
                        format!("duplicate task id '{}'", task.id),
                    ));
                }
                if task.column_id != column.id {
                    return Err(BoardError::validation(
                        "task",
                        format!(
                            "task '{}' claims column '{}' but is held by '{}'",
                            task.id, task.column_id, column.id
                        ),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Swap in the next column list.
    fn commit(&mut self, next: Vec<Column>, op: &'static str) {
        self.columns = next;
        debug!(op, columns = self.columns.len(), tasks = self.task_count(), "board committed");
    }

    /// Produce a provisional task for `column_id`, due three days from now.
    ///
    /// The board is not touched until the task is passed to [`Board::save_task`].
    pub fn add_task(&self, column_id: &str) -> Task {
        self.add_task_at(column_id, Utc::now(), Duration::days(DEFAULT_DUE_DAYS))
    }

    /// Produce a provisional task with an explicit clock and due offset.
    pub fn add_task_at(&self, column_id: &str, now: DateTime<Utc>, due_in: Duration) -> Task {
        let mut task = Task::provisional(column_id);
        task.due_date = Some(now + due_in);
        task
    }

    /// Save a task record produced by the task form.
    ///
    /// Returns the id of the saved task.
    pub fn save_task(&mut self, task: Task) -> Result<String> {
        let mut task = task;
        task.title = task.title.trim().to_string();
        if task.title.is_empty() {
            warn!(column = %task.column_id, "rejected task with empty title");
            return Err(BoardError::validation("title", "title is required"));
        }
        let Some(dest) = self.column_index(&task.column_id) else {
            warn!(column = %task.column_id, "rejected task for unknown column");
            return Err(BoardError::column_not_found(task.column_id));
        };

        let mut next = self.columns.clone();
        let existing = if task.is_provisional() {
            task.id = Ulid::new().to_string();
            None
        } else {
            self.find_task(&task.id)
        };
        let id = task.id.clone();

        match existing {
            Some(loc) if loc.column_index == dest => {
                next[dest].tasks[loc.task_index] = task;
            }
            Some(loc) => {
                next[loc.column_index].tasks.remove(loc.task_index);
                next[dest].tasks.push(task);
            }
            None => next[dest].tasks.push(task),
        }

        self.commit(next, "save_task");
        Ok(id)
    }

    /// Remove a task from whichever column holds it. Returns whether
    /// anything was removed.
    pub fn delete_task(&mut self, task_id: &str) -> bool {
        let Some(loc) = self.find_task(task_id) else {
            return false;
        };
        let mut next = self.columns.clone();
        next[loc.column_index].tasks.remove(loc.task_index);
        self.commit(next, "delete_task");
        true
    }

    /// Append a copy of `task` with a fresh id to the end of its column.
    ///
    /// Returns the new task's id, or `None` if the column no longer exists.
    pub fn duplicate_task(&mut self, task: &Task) -> Option<String> {
        let dest = self.column_index(&task.column_id)?;
        let mut copy = task.clone();
        copy.id = Ulid::new().to_string();
        copy.title = format!("{}{}", task.title, COPY_SUFFIX);
        let id = copy.id.clone();

        let mut next = self.columns.clone();
        next[dest].tasks.push(copy);
        self.commit(next, "duplicate_task");
        Some(id)
    }

    /// Apply `update` to a copy of the named column and commit it.
    fn update_column(&mut self, column_id: &str, op: &'static str, update: impl FnOnce(&mut Column)) -> bool {
        let Some(index) = self.column_index(column_id) else {
            return false;
        };
        let mut next = self.columns.clone();
        update(&mut next[index]);
        self.commit(next, op);
        true
    }

    pub fn rename_column(&mut self, column_id: &str, title: &str) -> bool {
        let title = title.trim().to_string();
        self.update_column(column_id, "rename_column", |c| c.title = title)
    }

    /// Set or clear the advisory WIP limit. A limit of zero clears it.
    pub fn set_wip_limit(&mut self, column_id: &str, limit: Option<u32>) -> bool {
        let limit = limit.filter(|&l| l > 0);
        self.update_column(column_id, "set_wip_limit", |c| c.wip_limit = limit)
    }

    pub fn toggle_collapse(&mut self, column_id: &str) -> bool {
        self.update_column(column_id, "toggle_collapse", |c| c.collapsed = !c.collapsed)
    }

    /// Append a new empty column with a generated title.
    pub fn add_column(&mut self) -> Result<String> {
        if self.columns.len() >= MAX_COLUMNS {
            warn!(max = MAX_COLUMNS, "rejected add_column at capacity");
            return Err(BoardError::CapacityExceeded { max: MAX_COLUMNS });
        }
        let column = Column::new(
            Ulid::new().to_string(),
            format!("Column {}", self.columns.len() + 1),
        );
        let id = column.id.clone();
        let mut next = self.columns.clone();
        next.push(column);
        self.commit(next, "add_column");
        Ok(id)
    }

    /// Delete a column. Confirmation is the caller's responsibility.
    ///
    /// Tasks of a non-first column are appended to the first column in
    /// their original order; tasks of the first column are discarded.
    pub fn delete_column(&mut self, column_id: &str) -> bool {
        let Some(index) = self.column_index(column_id) else {
            return false;
        };
        let mut next = self.columns.clone();
        let removed = next.remove(index);
        if index != 0 {
            let first_id = next[0].id.clone();
            next[0].tasks.extend(removed.tasks.into_iter().map(|mut t| {
                t.column_id = first_id.clone();
                t
            }));
        } else if !removed.tasks.is_empty() {
            info!(column = %removed.id, discarded = removed.tasks.len(), "deleted first column with its tasks");
        }
        self.commit(next, "delete_column");
        true
    }

    /// Reorder a task inside one column. Out-of-range indices are a no-op.
    pub fn reorder_within_column(&mut self, column_id: &str, from: usize, to: usize) -> bool {
        let Some(index) = self.column_index(column_id) else {
            return false;
        };
        let len = self.columns[index].tasks.len();
        if from >= len || to >= len {
            return false;
        }
        if from == to {
            return true;
        }
        let mut next = self.columns.clone();
        next[index].tasks = reorder(&self.columns[index].tasks, from, to);
        self.commit(next, "reorder_within_column");
        true
    }

    /// Move a task between columns, rewriting its `column_id` in the same
    /// step. `dest_index` is clamped to the destination length.
    pub fn move_across_columns(
        &mut self,
        source_id: &str,
        dest_id: &str,
        source_index: usize,
        dest_index: usize,
    ) -> bool {
        let (Some(src), Some(dst)) = (self.column_index(source_id), self.column_index(dest_id)) else {
            return false;
        };
        if source_index >= self.columns[src].tasks.len() {
            return false;
        }
        if src == dst {
            let last = self.columns[src].tasks.len() - 1;
            return self.reorder_within_column(source_id, source_index, dest_index.min(last));
        }

        let dest_index = dest_index.min(self.columns[dst].tasks.len());
        let (source_tasks, mut dest_tasks) = move_between(
            &self.columns[src].tasks,
            &self.columns[dst].tasks,
            source_index,
            dest_index,
        );
        dest_tasks[dest_index].column_id = dest_id.to_string();

        let mut next = self.columns.clone();
        next[src].tasks = source_tasks;
        next[dst].tasks = dest_tasks;
        self.commit(next, "move_across_columns");
        true
    }
}
