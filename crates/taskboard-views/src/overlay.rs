//! The floating overlay: a flat, cross-list feed.
//!
//! Completed tasks stay in the feed and are marked struck through. Pending
//! submissions are not shown until a moderator approves them.

use serde::Serialize;

use taskboard_models::{Board, TaskStatus};

use crate::projector::Projector;
use crate::row::TaskRow;

/// One line of the overlay feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverlayItem {
    /// The task.
    #[serde(flatten)]
    pub task: TaskRow,
    /// Render the description struck through.
    pub struck_through: bool,
}

/// The overlay feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverlayView {
    /// Board version this view was projected from.
    pub version: u64,
    /// Items, list by list in creation order.
    pub items: Vec<OverlayItem>,
}

impl OverlayView {
    /// Finds an item by task id.
    pub fn item(&self, task_id: &str) -> Option<&OverlayItem> {
        self.items.iter().find(|i| i.task.id == task_id)
    }
}

/// Projects boards into [`OverlayView`]s.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverlayProjector;

impl Projector for OverlayProjector {
    type View = OverlayView;

    fn project(&self, board: &Board) -> OverlayView {
        let items = board
            .lists
            .iter()
            .flat_map(|list| {
                list.tasks
                    .iter()
                    .enumerate()
                    .filter(|(_, task)| task.status != TaskStatus::Pending)
                    .map(|(i, task)| TaskRow::new(task, i + 1))
            })
            .map(|task| OverlayItem {
                struck_through: task.is_completed(),
                task,
            })
            .collect();

        OverlayView {
            version: board.version,
            items,
        }
    }
}
