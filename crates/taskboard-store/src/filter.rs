//! Task filtering for queries.

use serde::{Deserialize, Serialize};
use taskboard_models::{Activity, Task, TaskStatus};

/// Filter criteria for querying tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskFilter {
    /// Filter by list name.
    pub list_name: Option<String>,
    /// Filter by owner (case-insensitive).
    pub owner: Option<String>,
    /// Filter by lifecycle status.
    pub status: Option<TaskStatus>,
    /// Filter by owner activity.
    pub activity: Option<Activity>,
}

impl TaskFilter {
    /// Creates a new empty filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the list filter.
    pub fn with_list(mut self, list_name: impl Into<String>) -> Self {
        self.list_name = Some(list_name.into());
        self
    }

    /// Sets the owner filter.
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    /// Sets the status filter.
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets an optional status filter.
    pub fn with_status_opt(mut self, status: Option<TaskStatus>) -> Self {
        self.status = status;
        self
    }

    /// Sets the activity filter.
    pub fn with_activity(mut self, activity: Activity) -> Self {
        self.activity = Some(activity);
        self
    }

    /// Returns true if the task matches this filter.
    pub fn matches(&self, task: &Task) -> bool {
        if let Some(ref list_name) = self.list_name {
            if &task.list_name != list_name {
                return false;
            }
        }

        if let Some(ref owner) = self.owner {
            if !task.is_owned_by(owner) {
                return false;
            }
        }

        if let Some(status) = self.status {
            if task.status != status {
                return false;
            }
        }

        if let Some(activity) = self.activity {
            if task.activity != activity {
                return false;
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_task(list: &str, owner: &str, status: TaskStatus) -> Task {
        Task::new(list, "Task", Some(owner.to_string()), status)
    }

    #[test]
    fn test_empty_filter_matches_all() {
        let filter = TaskFilter::new();
        assert!(filter.matches(&make_task("Viewers", "alice", TaskStatus::Pending)));
    }

    #[test]
    fn test_filter_by_list() {
        let filter = TaskFilter::new().with_list("Viewers");

        assert!(filter.matches(&make_task("Viewers", "alice", TaskStatus::Pending)));
        assert!(!filter.matches(&make_task("Stream Goals", "alice", TaskStatus::Pending)));
    }

    #[test]
    fn test_filter_by_owner_ignores_case() {
        let filter = TaskFilter::new().with_owner("ALICE");

        assert!(filter.matches(&make_task("Viewers", "alice", TaskStatus::Pending)));
        assert!(!filter.matches(&make_task("Viewers", "bob", TaskStatus::Pending)));
    }

    #[test]
    fn test_filter_by_status() {
        let filter = TaskFilter::new().with_status(TaskStatus::Approved);

        assert!(filter.matches(&make_task("Viewers", "alice", TaskStatus::Approved)));
        assert!(!filter.matches(&make_task("Viewers", "alice", TaskStatus::Pending)));
    }

    #[test]
    fn test_filter_by_activity() {
        let filter = TaskFilter::new().with_activity(Activity::Offline);

        let mut offline = make_task("Viewers", "alice", TaskStatus::Approved);
        offline.activity = Activity::Offline;

        assert!(filter.matches(&offline));
        assert!(!filter.matches(&make_task("Viewers", "alice", TaskStatus::Approved)));
    }

    #[test]
    fn test_combined_filters() {
        let filter = TaskFilter::new()
            .with_list("Viewers")
            .with_owner("alice")
            .with_status(TaskStatus::Pending);

        assert!(filter.matches(&make_task("Viewers", "Alice", TaskStatus::Pending)));
        assert!(!filter.matches(&make_task("Other", "Alice", TaskStatus::Pending))); // wrong list
        assert!(!filter.matches(&make_task("Viewers", "Bob", TaskStatus::Pending))); // wrong owner
        // wrong status
        assert!(!filter.matches(&make_task("Viewers", "Alice", TaskStatus::Approved)));
    }
}
