//! TaskStore - the single source of truth for board state.
//!
//! Concurrency model:
//! - `RwLock<Arc<Board>>` holds the published snapshot; readers clone the
//!   `Arc` and release the lock immediately
//! - `Mutex<()>` serializes writers so commits never interleave
//! - A writer edits a private clone and swaps it in only on success, so a
//!   reader sees either the old board or the new one, never a mix

use std::sync::{Arc, Mutex, RwLock};

use tracing::debug;

use taskboard_models::{Board, Task, TaskStatus};

use crate::draft::{Draft, TaskRef};
use crate::error::{Result, StoreError};
use crate::filter::TaskFilter;

/// The outcome of a committed transaction.
#[derive(Debug, Clone)]
pub struct Commit<T> {
    /// Whatever the transaction returned.
    pub value: T,
    /// The board as published by this commit.
    pub board: Arc<Board>,
}

/// Authoritative, shareable task store.
///
/// Cloning a `TaskStore` yields another handle to the same state.
#[derive(Debug, Clone, Default)]
pub struct TaskStore {
    /// Published snapshot.
    current: Arc<RwLock<Arc<Board>>>,
    /// Serializes writers.
    writer: Arc<Mutex<()>>,
}

impl TaskStore {
    /// Creates a store holding an empty board.
    pub fn new() -> Self {
        Self::with_board(Board::new())
    }

    /// Creates a store holding `board`.
    pub fn with_board(board: Board) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(board))),
            writer: Arc::new(Mutex::new(())),
        }
    }

    /// Returns the latest committed board.
    pub fn snapshot(&self) -> Arc<Board> {
        match self.current.read() {
            Ok(board) => Arc::clone(&board),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Returns the version of the latest committed board.
    pub fn version(&self) -> u64 {
        self.snapshot().version
    }

    /// Runs `f` against a private copy of the board.
    ///
    /// If `f` returns `Ok`, the copy gets the next version and becomes the
    /// published board. If it returns `Err`, nothing is published and the
    /// store is exactly as it was.
    pub fn transaction<T, E, F>(&self, f: F) -> std::result::Result<Commit<T>, E>
    where
        F: FnOnce(&mut Draft<'_>) -> std::result::Result<T, E>,
        E: From<StoreError>,
    {
        let _writer = self
            .writer
            .lock()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;

        let mut board = (*self.snapshot()).clone();
        let value = {
            let mut draft = Draft::new(&mut board);
            f(&mut draft)?
        };
        board.version += 1;

        let board = Arc::new(board);
        {
            let mut current = self
                .current
                .write()
                .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
            *current = Arc::clone(&board);
        }

        debug!(version = board.version, "board committed");

        Ok(Commit { value, board })
    }

    /// Creates a list. Fails with `DuplicateList` if the name exists.
    pub fn create_list(&self, name: &str, summary: Option<&str>) -> Result<Commit<()>> {
        self.transaction(|draft| draft.create_list(name, summary))
    }

    /// Removes a list and its tasks.
    pub fn delete_list(&self, name: &str) -> Result<Commit<()>> {
        self.transaction(|draft| draft.delete_list(name).map(|_| ()))
    }

    /// Adds a task. Fails with `ListNotFound` if the list does not exist.
    pub fn add_task(
        &self,
        list_name: &str,
        description: &str,
        owner: Option<&str>,
        status: TaskStatus,
    ) -> Result<Task> {
        self.transaction(|draft| draft.add_task(list_name, description, owner, status))
            .map(|commit| commit.value)
    }

    /// Finds the most recent task in a list owned by `owner`, optionally
    /// restricted to one status.
    pub fn find_task(
        &self,
        list_name: &str,
        owner: &str,
        status: Option<TaskStatus>,
    ) -> Option<Task> {
        self.snapshot().find_task(list_name, owner, status).cloned()
    }

    /// Moves a task one step forward. Fails with `InvalidTransition` otherwise.
    pub fn transition_task(&self, task_ref: &TaskRef, to: TaskStatus) -> Result<Task> {
        self.transaction(|draft| draft.transition_task(task_ref, to))
            .map(|commit| commit.value)
    }

    /// Lists tasks matching a filter, in board order.
    pub fn list(&self, filter: Option<TaskFilter>) -> Vec<Task> {
        let board = self.snapshot();
        board
            .tasks()
            .filter(|t| filter.as_ref().map(|f| f.matches(t)).unwrap_or(true))
            .cloned()
            .collect()
    }
}
