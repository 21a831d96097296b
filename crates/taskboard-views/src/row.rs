//! Task rows shared by every view.

use chrono::{DateTime, Utc};
use serde::Serialize;

use taskboard_models::{Activity, Task, TaskStatus};

/// One task as rendered in a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskRow {
    /// Task id.
    pub id: String,
    /// 1-based position within its list.
    pub position: usize,
    /// Owning list.
    pub list_name: String,
    /// Description text.
    pub description: String,
    /// Owner, if any.
    pub owner: Option<String>,
    /// Lifecycle status.
    pub status: TaskStatus,
    /// Owner presence.
    pub activity: Activity,
    /// When the task was completed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl TaskRow {
    /// Builds the row for the task at `position` (1-based).
    pub fn new(task: &Task, position: usize) -> Self {
        Self {
            id: task.id.as_str().to_string(),
            position,
            list_name: task.list_name.clone(),
            description: task.description.clone(),
            owner: task.owner.clone(),
            status: task.status,
            activity: task.activity,
            completed_at: task.completed_at,
        }
    }

    /// Returns true if the task is completed.
    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }
}
