//! Enumerations for TUI state management.

/// What currently owns the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Board,
    AddTask,
    EditTask,
    Prompt(PromptKind),
    Confirm,
    Help,
}

/// Single-line prompts over the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    RenameColumn,
    WipLimit,
}

impl PromptKind {
    pub fn title(self) -> &'static str {
        match self {
            PromptKind::RenameColumn => "Rename column",
            PromptKind::WipLimit => "WIP limit (empty or 0 clears)",
        }
    }
}

/// Destructive actions waiting for a yes/no.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    DeleteTask { id: String, title: String },
    DeleteColumn { id: String, title: String },
}

impl ConfirmAction {
    pub fn describe(&self) -> String {
        match self {
            ConfirmAction::DeleteTask { title, .. } => format!("Delete task '{title}'"),
            ConfirmAction::DeleteColumn { title, .. } => format!("Delete column '{title}'"),
        }
    }
}
