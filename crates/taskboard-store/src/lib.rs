//! Authoritative in-memory task store for Taskboard.
//!
//! This crate provides the `TaskStore`, which owns the current [`Board`]:
//! - Readers take a cheap `Arc<Board>` snapshot and never block writers
//! - Writers are serialized and work on a private copy (a [`Draft`])
//! - A transaction either publishes the whole edited copy or nothing
//!
//! # Example
//!
//! ```
//! use taskboard_store::TaskStore;
//! use taskboard_models::TaskStatus;
//!
//! let store = TaskStore::new();
//! store.create_list("Viewers", None).unwrap();
//!
//! let task = store
//!     .add_task("Viewers", "Fix bug", Some("Alice"), TaskStatus::Pending)
//!     .unwrap();
//!
//! let found = store.find_task("Viewers", "alice", Some(TaskStatus::Pending)).unwrap();
//! assert_eq!(found.id, task.id);
//! ```
//!
//! [`Board`]: taskboard_models::Board

pub mod draft;
pub mod error;
pub mod filter;
pub mod store;

pub use draft::{Draft, TaskRef};
pub use error::{Result, StoreError};
pub use filter::TaskFilter;
pub use store::{Commit, TaskStore};
