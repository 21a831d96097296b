//! Core data models for Taskboard.
//!
//! This crate provides the fundamental data types shared by every other
//! Taskboard crate: tasks and their lifecycle, task lists, the issuing
//! user, and the board aggregate that owns all lists.

pub mod board;
pub mod ids;
pub mod list;
pub mod task;
pub mod user;

// Re-export main types
pub use board::{Board, Progress, TierThresholds, STREAMER_LIST};
pub use ids::TaskId;
pub use list::TaskList;
pub use task::{Activity, Task, TaskStatus};
pub use user::{Role, User};
