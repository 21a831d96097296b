//! Terminal front end for Taskboard.
//!
//! Runs a board in-process and lets one terminal play every role: chat
//! lines are submitted as the current identity, and slash commands render
//! the widget, the management panel and the overlay.

pub mod cli;
pub mod commands;
pub mod error;
pub mod render;
pub mod repl;
pub mod session;

pub use error::{CliError, Result};
pub use session::{Outcome, ReplCommand, Session};
