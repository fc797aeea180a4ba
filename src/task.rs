//! Task and column data structures.
//!
//! A `Task` is a single work item; a `Column` is a named, ordered bucket of
//! tasks. Both are plain values: the board store replaces them wholesale on
//! every mutation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::fields::{Assignee, Priority};

/// A work item on the board.
///
/// An empty `id` marks a provisional task that has not been saved yet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    pub column_id: String,
    #[serde(default)]
    pub assignee: Option<Assignee>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
}

impl Task {
    /// Create a provisional task bound to a column.
    pub fn provisional(column_id: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            title: String::new(),
            description: String::new(),
            priority: Priority::Medium,
            column_id: column_id.into(),
            assignee: None,
            tags: Vec::new(),
            due_date: None,
        }
    }

    /// Whether the task has not been assigned a durable id yet.
    pub fn is_provisional(&self) -> bool {
        self.id.is_empty()
    }

    /// A task is overdue when its due date is strictly before `now`.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.due_date.is_some_and(|due| due < now)
    }

    pub fn assignee_name(&self) -> Option<&str> {
        self.assignee.as_ref().map(|a| a.name.as_str())
    }
}

/// A named, ordered bucket of tasks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Column {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub tasks: Vec<Task>,
    /// Advisory cap; exceeding it never blocks a mutation.
    #[serde(default)]
    pub wip_limit: Option<u32>,
    #[serde(default)]
    pub collapsed: bool,
}

impl Column {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            tasks: Vec::new(),
            wip_limit: None,
            collapsed: false,
        }
    }

    /// Whether the column holds more tasks than its WIP limit allows.
    pub fn is_over_wip_limit(&self) -> bool {
        self.wip_limit
            .is_some_and(|limit| self.tasks.len() > limit as usize)
    }

    pub fn position_of(&self, task_id: &str) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == task_id)
    }
}
