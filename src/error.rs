//! Error types for the board engine.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for board operations.
pub type Result<T> = std::result::Result<T, BoardError>;

/// Errors that can occur while mutating or loading a board.
///
/// Lookup failures are mostly absorbed as no-ops by the store; only
/// `save_task` reports an unknown column. Capacity and validation failures
/// always leave the board untouched.
#[derive(Debug, Error)]
pub enum BoardError {
    /// Task not found
    #[error("task not found: {id}")]
    TaskNotFound { id: String },

    /// Column not found
    #[error("column not found: {id}")]
    ColumnNotFound { id: String },

    /// The board already holds the maximum number of columns
    #[error("a board can hold at most {max} columns")]
    CapacityExceeded { max: usize },

    /// A record failed validation
    #[error("invalid {field}: {message}")]
    ValidationFailed { field: String, message: String },

    /// Configuration could not be read or parsed
    #[error("config error in {path}: {message}")]
    Config { path: PathBuf, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BoardError {
    /// Create a validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a column-not-found error
    pub fn column_not_found(id: impl Into<String>) -> Self {
        Self::ColumnNotFound { id: id.into() }
    }

    /// Whether the error should be shown to the user as a blocking notice
    /// rather than silently ignored.
    pub fn is_user_notice(&self) -> bool {
        matches!(
            self,
            Self::CapacityExceeded { .. } | Self::ValidationFailed { .. } | Self::ColumnNotFound { .. }
        )
    }
}
