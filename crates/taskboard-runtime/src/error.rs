//! Error types for the runtime crate.

use thiserror::Error;

use taskboard_core::CommandError;

/// Errors that can occur in the runtime.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The command was rejected; the board is unchanged.
    #[error(transparent)]
    Command(#[from] CommandError),

    /// Runtime not started.
    #[error("runtime not started")]
    NotStarted,

    /// Runtime already started.
    #[error("runtime already started")]
    AlreadyStarted,

    /// Shutdown error.
    #[error("shutdown error: {0}")]
    Shutdown(String),

    /// Channel error.
    #[error("channel error: {0}")]
    Channel(String),
}

impl RuntimeError {
    /// Returns the command rejection, if this is one.
    pub fn as_command(&self) -> Option<&CommandError> {
        match self {
            RuntimeError::Command(err) => Some(err),
            _ => None,
        }
    }
}

/// Result type for runtime operations.
pub type Result<T> = std::result::Result<T, RuntimeError>;
