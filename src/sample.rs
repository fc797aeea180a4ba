//! Built-in demo board for `--demo`.

use chrono::{DateTime, Duration, Utc};

use crate::board::Board;
use crate::error::Result;
use crate::fields::{Assignee, Priority};
use crate::task::{Column, Task};

struct SampleTask {
    id: &'static str,
    title: &'static str,
    description: &'static str,
    priority: Priority,
    column_id: &'static str,
    assignee: &'static str,
    tags: &'static [&'static str],
    due_in_days: i64,
}

const COLUMNS: [(&str, &str); 4] = [
    ("todo", "To Do"),
    ("in-progress", "In Progress"),
    ("review", "Review"),
    ("done", "Done"),
];

const TASKS: [SampleTask; 5] = [
    SampleTask {
        id: "task-1",
        title: "Create UI Components",
        description: "Build reusable UI components for the application",
        priority: Priority::High,
        column_id: "todo",
        assignee: "John Doe",
        tags: &["UI", "Design", "Frontend"],
        due_in_days: 3,
    },
    SampleTask {
        id: "task-2",
        title: "Implement Drag and Drop",
        description: "Add drag and drop functionality to the board",
        priority: Priority::Medium,
        column_id: "in-progress",
        assignee: "Jane Smith",
        tags: &["Feature", "Interaction"],
        due_in_days: 5,
    },
    SampleTask {
        id: "task-3",
        title: "Write Unit Tests",
        description: "Create unit tests for all components",
        priority: Priority::Low,
        column_id: "todo",
        assignee: "Bob Johnson",
        tags: &["Testing", "QA"],
        due_in_days: 7,
    },
    SampleTask {
        id: "task-4",
        title: "Fix Accessibility Issues",
        description: "Ensure all components are accessible",
        priority: Priority::Urgent,
        column_id: "review",
        assignee: "Alice Brown",
        tags: &["A11y", "Bug"],
        due_in_days: -1,
    },
    SampleTask {
        id: "task-5",
        title: "Deploy to Production",
        description: "Deploy the application to production environment",
        priority: Priority::High,
        column_id: "done",
        assignee: "Charlie Wilson",
        tags: &["DevOps", "Release"],
        due_in_days: -2,
    },
];

/// A four-column board with five cards, due dates relative to `now`.
pub fn sample_board(now: DateTime<Utc>) -> Result<Board> {
    let columns = COLUMNS
        .iter()
        .map(|&(id, title)| {
            let mut column = Column::new(id, title);
            column.tasks = TASKS
                .iter()
                .filter(|t| t.column_id == id)
                .map(|t| Task {
                    id: t.id.to_string(),
                    title: t.title.to_string(),
                    description: t.description.to_string(),
                    priority: t.priority,
                    column_id: id.to_string(),
                    assignee: Some(Assignee::new(t.assignee)),
                    tags: t.tags.iter().map(|s| s.to_string()).collect(),
                    due_date: Some(now + Duration::days(t.due_in_days)),
                })
                .collect();
            column
        })
        .collect();
    Board::new(columns)
}
