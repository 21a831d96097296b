//! Error types for command processing.
//!
//! The `Display` text of every variant is the feedback line shown to the
//! issuer when their command is rejected.

use thiserror::Error;

use taskboard_commands::{DenyReason, ParseError};
use taskboard_models::TaskStatus;
use taskboard_store::StoreError;

/// Why a command was not applied. A rejected command never changes the board.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// Malformed command text.
    #[error("{0}")]
    Parse(#[from] ParseError),

    /// Verb not in the authorization table.
    #[error("Unknown command: !{0}")]
    UnknownCommand(String),

    /// Issuer role is below the verb's minimum.
    #[error("!{verb} requires {required} role")]
    Forbidden {
        verb: String,
        required: taskboard_models::Role,
    },

    /// A required argument is missing; carries the usage line.
    #[error("Usage: {0}")]
    MissingArgument(&'static str),

    /// An argument could not be interpreted.
    #[error("{0}")]
    InvalidArgument(String),

    /// No list with that name.
    #[error("List \"{0}\" not found.")]
    ListNotFound(String),

    /// No task matched the command's target.
    #[error("{0}")]
    TaskNotFound(String),

    /// A list with that name already exists.
    #[error("List \"{0}\" already exists.")]
    DuplicateList(String),

    /// The user already has a matching open submission.
    #[error("@{user}, you already have a pending or active task.")]
    DuplicateRequest { user: String },

    /// Status change outside the forward order.
    #[error("Task {task} cannot move from {from} to {to}.")]
    InvalidTransition {
        task: String,
        from: TaskStatus,
        to: TaskStatus,
    },

    /// The viewer list reached its approved task limit.
    #[error("The task list for \"{0}\" is full.")]
    ListFull(String),

    /// Too many pending submissions.
    #[error("The submission queue is currently full. Please try again later.")]
    QueueFull,

    /// List name is empty or blank.
    #[error("Invalid list name: {0:?}")]
    InvalidListName(String),

    /// The store could not be locked.
    #[error("Board unavailable: {0}")]
    Unavailable(String),
}

impl CommandError {
    /// Short machine-readable name of the error kind, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            CommandError::Parse(_) => "parse",
            CommandError::UnknownCommand(_) => "unknown_command",
            CommandError::Forbidden { .. } => "forbidden",
            CommandError::MissingArgument(_) => "missing_argument",
            CommandError::InvalidArgument(_) => "invalid_argument",
            CommandError::ListNotFound(_) => "list_not_found",
            CommandError::TaskNotFound(_) => "task_not_found",
            CommandError::DuplicateList(_) => "duplicate_list",
            CommandError::DuplicateRequest { .. } => "duplicate_request",
            CommandError::InvalidTransition { .. } => "invalid_transition",
            CommandError::ListFull(_) => "list_full",
            CommandError::QueueFull => "queue_full",
            CommandError::InvalidListName(_) => "invalid_list_name",
            CommandError::Unavailable(_) => "unavailable",
        }
    }
}

impl From<StoreError> for CommandError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateList(name) => CommandError::DuplicateList(name),
            StoreError::ListNotFound(name) => CommandError::ListNotFound(name),
            StoreError::TaskNotFound(task) => {
                CommandError::TaskNotFound(format!("Task {task} not found."))
            }
            StoreError::InvalidTransition { task, from, to } => {
                CommandError::InvalidTransition { task, from, to }
            }
            StoreError::InvalidListName(name) => CommandError::InvalidListName(name),
            StoreError::LockPoisoned(msg) => CommandError::Unavailable(msg),
        }
    }
}

impl From<DenyReason> for CommandError {
    fn from(reason: DenyReason) -> Self {
        match reason {
            DenyReason::UnknownCommand(verb) => CommandError::UnknownCommand(verb),
            DenyReason::InsufficientRole { verb, required, .. } => CommandError::Forbidden {
                verb: verb.name().to_string(),
                required,
            },
        }
    }
}

/// Result type for command processing.
pub type Result<T> = std::result::Result<T, CommandError>;
