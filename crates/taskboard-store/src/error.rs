//! Error types for task store operations.

use taskboard_models::TaskStatus;
use thiserror::Error;

/// Errors that can occur during task store operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A list with this name already exists.
    #[error("list already exists: {0}")]
    DuplicateList(String),

    /// No list with this name.
    #[error("list not found: {0}")]
    ListNotFound(String),

    /// No matching task.
    #[error("task not found: {0}")]
    TaskNotFound(String),

    /// The requested status does not directly follow the current one.
    #[error("cannot move task {task} from {from} to {to}")]
    InvalidTransition {
        /// Task id.
        task: String,
        /// Current status.
        from: TaskStatus,
        /// Requested status.
        to: TaskStatus,
    },

    /// List names must contain something other than whitespace.
    #[error("invalid list name: {0:?}")]
    InvalidListName(String),

    /// Lock poisoned (thread panicked while holding lock).
    #[error("lock poisoned: {0}")]
    LockPoisoned(String),
}

/// Result type alias for task store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
