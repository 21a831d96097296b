//! Named, ordered task lists.

use serde::{Deserialize, Serialize};

use crate::ids::TaskId;
use crate::task::{Task, TaskStatus};

/// A named collection of tasks, kept in creation order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskList {
    /// Unique name within a board.
    pub name: String,
    /// Display heading; defaults to the name.
    pub summary: String,
    /// Tasks in insertion order.
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl TaskList {
    /// Creates an empty list whose heading is its name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            summary: name.clone(),
            name,
            tasks: Vec::new(),
        }
    }

    /// Sets a display heading different from the name.
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        let summary = summary.into();
        if !summary.trim().is_empty() {
            self.summary = summary;
        }
        self
    }

    /// Looks up a task by id.
    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    /// Looks up a task by id for mutation.
    pub fn task_mut(&mut self, id: &TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| &t.id == id)
    }

    /// Returns the task at a 1-based position.
    pub fn task_at(&self, position: usize) -> Option<&Task> {
        position.checked_sub(1).and_then(|i| self.tasks.get(i))
    }

    /// Counts tasks with the given status.
    pub fn count_status(&self, status: TaskStatus) -> usize {
        self.tasks.iter().filter(|t| t.status == status).count()
    }

    /// Number of tasks in the list.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns true if the list holds no tasks.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
