//! Task types for Taskboard.
//!
//! A task moves strictly forward through `pending -> approved -> completed`.
//! Its description, owner and list never change after creation; only the
//! status, the activity flag and the last-seen stamp are mutable.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ids::TaskId;

/// Lifecycle status of a task.
///
/// Variants are declared in lifecycle order, so the derived `Ord` matches
/// the only direction a task may move in.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Requested by a viewer, waiting for a moderator.
    #[default]
    Pending,
    /// Accepted onto a list.
    Approved,
    /// Done. Terminal.
    Completed,
}

impl TaskStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [TaskStatus; 3] = [
        TaskStatus::Pending,
        TaskStatus::Approved,
        TaskStatus::Completed,
    ];

    /// Returns the status that directly follows this one, if any.
    pub fn next(self) -> Option<TaskStatus> {
        match self {
            TaskStatus::Pending => Some(TaskStatus::Approved),
            TaskStatus::Approved => Some(TaskStatus::Completed),
            TaskStatus::Completed => None,
        }
    }

    /// Returns true if a task in this status may move to `target`.
    pub fn can_transition_to(self, target: TaskStatus) -> bool {
        self.next() == Some(target)
    }

    /// Lowercase name used in feedback and views.
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Approved => "approved",
            TaskStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Ok(TaskStatus::Pending),
            "approved" => Ok(TaskStatus::Approved),
            "completed" | "complete" | "done" => Ok(TaskStatus::Completed),
            other => Err(format!("unknown task status: {}", other)),
        }
    }
}

/// Presence of the task owner, independent of lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Activity {
    /// Owner has been seen recently.
    #[default]
    Active,
    /// Owner paused their task.
    Paused,
    /// Owner has not been seen within the offline threshold.
    Offline,
}

/// A unit of work attributed to a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier.
    pub id: TaskId,

    /// Name of the list that owns this task.
    pub list_name: String,

    /// Free-text description.
    pub description: String,

    /// User who requested or was assigned the task.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,

    /// Lifecycle status.
    pub status: TaskStatus,

    /// Owner presence.
    #[serde(default)]
    pub activity: Activity,

    /// Monotonic creation sequence, unique within a board.
    pub sequence: u64,

    /// Wall-clock creation time.
    pub created_at: DateTime<Utc>,

    /// Last time the owner was seen in chat.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_seen: Option<DateTime<Utc>>,

    /// When the task reached `completed`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Creates a new task. The sequence is assigned by the board on insert.
    pub fn new(
        list_name: impl Into<String>,
        description: impl Into<String>,
        owner: Option<String>,
        status: TaskStatus,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: TaskId::new(),
            list_name: list_name.into(),
            description: description.into(),
            owner,
            status,
            activity: Activity::Active,
            sequence: 0,
            created_at: now,
            last_seen: Some(now),
            completed_at: if status == TaskStatus::Completed {
                Some(now)
            } else {
                None
            },
        }
    }

    /// Returns true if the task is owned by `name` (case-insensitive).
    pub fn is_owned_by(&self, name: &str) -> bool {
        self.owner
            .as_deref()
            .map(|owner| owner.eq_ignore_ascii_case(name))
            .unwrap_or(false)
    }

    /// Returns true if the task has reached its terminal status.
    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    /// Returns true if this is an owned, approved, active task whose owner
    /// has not been seen for longer than `threshold`.
    pub fn is_idle(&self, now: DateTime<Utc>, threshold: Duration) -> bool {
        self.owner.is_some()
            && self.status == TaskStatus::Approved
            && self.activity == Activity::Active
            && self
                .last_seen
                .map(|seen| now - seen > threshold)
                .unwrap_or(false)
    }

    /// Moves the task one step forward. Returns false if `target` is not the next status.
    pub fn advance(&mut self, target: TaskStatus) -> bool {
        if !self.status.can_transition_to(target) {
            return false;
        }
        self.status = target;
        if target == TaskStatus::Completed {
            self.completed_at = Some(Utc::now());
        }
        true
    }
}
