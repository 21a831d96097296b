//! Error types for the CLI.

use thiserror::Error;

use taskboard_core::ConfigError;
use taskboard_runtime::RuntimeError;

/// Errors that end a CLI invocation.
#[derive(Debug, Error)]
pub enum CliError {
    /// Board config failed to load.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// Board runtime failure.
    #[error("runtime error: {0}")]
    Runtime(#[from] RuntimeError),

    /// Line editor failure.
    #[error("line editor error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;
