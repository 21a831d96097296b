//! The board aggregate: every task list plus board-wide counters.
//!
//! `Board` is plain data. Mutation goes through the store crate, which
//! clones a board, edits the clone and publishes it as the new snapshot.

use serde::{Deserialize, Serialize};

use crate::ids::TaskId;
use crate::list::TaskList;
use crate::task::{Task, TaskStatus};

/// Name of the streamer's own list on a seeded board.
pub const STREAMER_LIST: &str = "Stream Goals";

const SEED_TASKS: [&str; 2] = ["Example Streamer Task 1", "Example Streamer Task 2"];

/// All task lists, in creation order, plus board-wide counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Board {
    /// Lists in creation order.
    pub lists: Vec<TaskList>,
    /// Number of tasks completed on this board.
    #[serde(default)]
    pub progress_points: u32,
    /// Next creation sequence to hand out.
    #[serde(default)]
    pub next_sequence: u64,
    /// Commit counter, bumped once per committed mutation.
    #[serde(default)]
    pub version: u64,
}

impl Board {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the starter board: the streamer's goal list with two example
    /// tasks, headed by `session_summary`, followed by an empty viewer list.
    pub fn seeded(session_summary: &str, viewer_list: &str) -> Self {
        let mut board = Self::new();

        let mut goals = TaskList::new(STREAMER_LIST).with_summary(session_summary);
        for description in SEED_TASKS {
            let mut task = Task::new(STREAMER_LIST, description, None, TaskStatus::Approved);
            task.sequence = board.next_sequence;
            board.next_sequence += 1;
            goals.tasks.push(task);
        }
        board.lists.push(goals);

        if viewer_list != STREAMER_LIST {
            board.lists.push(TaskList::new(viewer_list));
        }
        board
    }

    /// Looks up a list by exact name.
    pub fn list(&self, name: &str) -> Option<&TaskList> {
        self.lists.iter().find(|l| l.name == name)
    }

    /// Looks up a list by exact name for mutation.
    pub fn list_mut(&mut self, name: &str) -> Option<&mut TaskList> {
        self.lists.iter_mut().find(|l| l.name == name)
    }

    /// Returns true if a list with this name exists.
    pub fn has_list(&self, name: &str) -> bool {
        self.list(name).is_some()
    }

    /// Names of all lists in creation order.
    pub fn list_names(&self) -> Vec<String> {
        self.lists.iter().map(|l| l.name.clone()).collect()
    }

    /// Iterates over every task on the board, list by list.
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.lists.iter().flat_map(|l| l.tasks.iter())
    }

    /// Looks up a task by id anywhere on the board.
    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.tasks().find(|t| &t.id == id)
    }

    /// Finds the most recently created task in `list_name` owned by `owner`,
    /// optionally restricted to one status.
    pub fn find_task(
        &self,
        list_name: &str,
        owner: &str,
        status: Option<TaskStatus>,
    ) -> Option<&Task> {
        self.list(list_name)?
            .tasks
            .iter()
            .filter(|t| t.is_owned_by(owner))
            .filter(|t| status.map(|s| t.status == s).unwrap_or(true))
            .max_by_key(|t| t.sequence)
    }

    /// Returns true if `owner` owns any task on the board.
    pub fn owns_any_task(&self, owner: &str) -> bool {
        self.tasks().any(|t| t.is_owned_by(owner))
    }

    /// Counts tasks with the given status across all lists.
    pub fn count_status(&self, status: TaskStatus) -> usize {
        self.tasks().filter(|t| t.status == status).count()
    }

    /// Computes the progress bar state for the given thresholds.
    pub fn progress(&self, thresholds: &TierThresholds) -> Progress {
        Progress::new(self.progress_points, thresholds)
    }
}

/// Progress thresholds for the three celebration tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierThresholds {
    /// Points needed for tier 1.
    pub tier1: u32,
    /// Points needed for tier 2.
    pub tier2: u32,
    /// Points needed for tier 3; also the bar maximum.
    pub tier3: u32,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            tier1: 3,
            tier2: 7,
            tier3: 12,
        }
    }
}

impl TierThresholds {
    /// Returns the highest tier reached with `points`, 0 if none.
    pub fn tier_for(&self, points: u32) -> u8 {
        if points >= self.tier3 {
            3
        } else if points >= self.tier2 {
            2
        } else if points >= self.tier1 {
            1
        } else {
            0
        }
    }
}

/// Progress bar state derived from the board.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    /// Completed task count.
    pub points: u32,
    /// Bar maximum (tier 3 threshold).
    pub max: u32,
    /// Fill percentage, capped at 100.
    pub percent: f32,
    /// Highest tier reached.
    pub tier: u8,
}

impl Progress {
    /// Computes progress for `points` against `thresholds`.
    pub fn new(points: u32, thresholds: &TierThresholds) -> Self {
        let max = thresholds.tier3;
        let percent = if max == 0 {
            100.0
        } else {
            (points as f32 / max as f32 * 100.0).min(100.0)
        };
        Self {
            points,
            max,
            percent,
            tier: thresholds.tier_for(points),
        }
    }
}
