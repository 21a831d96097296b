//! Command processing and board configuration for Taskboard.
//!
//! The [`CommandProcessor`] is the only writer of the task store. It takes
//! commands that already passed the authorization gate, applies each one
//! as a single store transaction and reports what changed.
//!
//! # Example
//!
//! ```
//! use taskboard_core::{BoardConfig, CommandProcessor};
//! use taskboard_models::{TaskStatus, User};
//!
//! let processor = CommandProcessor::seeded(BoardConfig::default());
//!
//! processor.process_line(r#"!task "Fix bug""#, User::viewer("Alice")).unwrap();
//! let applied = processor.process_line("!approve Alice", User::moderator("Mod")).unwrap();
//!
//! let task = applied.board.find_task("Viewers", "alice", None).unwrap();
//! assert_eq!(task.status, TaskStatus::Approved);
//! ```

pub mod change;
pub mod config;
pub mod error;
pub mod processor;

pub use change::{Applied, Change};
pub use config::{AddTaskOwner, BoardConfig, ConfigError, DuplicateScope};
pub use error::{CommandError, Result};
pub use processor::{CommandProcessor, TaskTarget};
