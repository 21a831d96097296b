//! Chat command parsing and role-based authorization for Taskboard.
//!
//! Raw chat text such as `!addtask 'Stream Goals' MyTestTask` flows through
//! two pure stages:
//!
//! 1. [`parse`] tokenizes the text into a [`Command`] (verb, arguments, issuer).
//! 2. [`authorize`] checks the verb against the [`POLICY`] table and, on
//!    success, wraps the command in an [`AuthorizedCommand`] token.
//!
//! Only the gate can construct an `AuthorizedCommand`, so anything that
//! accepts one never has to re-check roles.
//!
//! # Example
//!
//! ```
//! use taskboard_commands::{authorize, parse, Verb};
//! use taskboard_models::User;
//!
//! let cmd = parse(r#"!task "Fix bug""#, User::viewer("Alice")).unwrap();
//! assert_eq!(cmd.args, vec!["Fix bug"]);
//!
//! let authorized = authorize(cmd).unwrap();
//! assert_eq!(authorized.verb(), Verb::Task);
//! ```

pub mod command;
pub mod error;
pub mod gate;
pub mod parser;

pub use command::{Command, Verb};
pub use error::{ParseError, Result};
pub use gate::{
    authorize, check, minimum_role, AuthorizedCommand, Authorization, DenyReason, POLICY,
};
pub use parser::{is_command, parse, tokenize};
