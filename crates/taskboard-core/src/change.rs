//! Records of what a committed command changed.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use taskboard_models::{Activity, Board, TaskStatus};
use taskboard_store::TaskRef;

/// A single committed mutation, as seen by subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Change {
    /// A list was created.
    ListCreated {
        /// List name.
        list: String,
    },
    /// A list and its tasks were removed.
    ListDeleted {
        /// List name.
        list: String,
    },
    /// A task was created.
    TaskAdded {
        /// The new task.
        task: TaskRef,
        /// Its initial status.
        status: TaskStatus,
    },
    /// A task moved forward in its lifecycle.
    TaskTransitioned {
        /// The task.
        task: TaskRef,
        /// Previous status.
        from: TaskStatus,
        /// New status.
        to: TaskStatus,
    },
    /// A pending task was withdrawn.
    TaskRemoved {
        /// The removed task.
        task: TaskRef,
    },
    /// Owner activity changed on one or more tasks.
    ActivityChanged {
        /// Affected tasks.
        tasks: Vec<TaskRef>,
        /// New activity.
        activity: Activity,
    },
    /// A task owner was seen in chat; only timestamps moved.
    OwnerSeen {
        /// The owner.
        owner: String,
    },
}

impl Change {
    /// Short label used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Change::ListCreated { .. } => "list_created",
            Change::ListDeleted { .. } => "list_deleted",
            Change::TaskAdded { .. } => "task_added",
            Change::TaskTransitioned { .. } => "task_transitioned",
            Change::TaskRemoved { .. } => "task_removed",
            Change::ActivityChanged { .. } => "activity_changed",
            Change::OwnerSeen { .. } => "owner_seen",
        }
    }
}

/// A successfully committed command.
#[derive(Debug, Clone)]
pub struct Applied {
    /// Message for the issuer.
    pub feedback: String,
    /// What changed.
    pub change: Change,
    /// The board as published by the commit.
    pub board: Arc<Board>,
}

impl Applied {
    /// Version of the published board.
    pub fn version(&self) -> u64 {
        self.board.version
    }
}
