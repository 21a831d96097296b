//! Error types for command parsing.

use thiserror::Error;

/// Errors produced while turning raw chat text into a command.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Input was empty or whitespace only.
    #[error("empty command")]
    Empty,

    /// Input does not start with `!`.
    #[error("commands must start with '!'")]
    MissingPrefix,

    /// The text after `!` is not an identifier.
    #[error("invalid command name: {0:?}")]
    InvalidVerb(String),

    /// A quote was opened but never closed.
    #[error("unterminated {quote} quote starting at position {position}")]
    UnterminatedQuote {
        /// The quote character.
        quote: char,
        /// Byte offset of the opening quote.
        position: usize,
    },
}

/// Result type alias for parsing.
pub type Result<T> = std::result::Result<T, ParseError>;
