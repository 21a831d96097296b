//! The widget view: every list, every task, and the progress bar.

use serde::Serialize;

use taskboard_models::{Board, Progress, TaskList, TierThresholds};

use crate::projector::Projector;
use crate::row::TaskRow;

/// One list as shown in the widget.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListView {
    /// List name, used to address it in commands.
    pub name: String,
    /// Heading shown above the tasks.
    pub heading: String,
    /// Tasks in creation order.
    pub tasks: Vec<TaskRow>,
}

impl From<&TaskList> for ListView {
    fn from(list: &TaskList) -> Self {
        Self {
            name: list.name.clone(),
            heading: list.summary.clone(),
            tasks: list
                .tasks
                .iter()
                .enumerate()
                .map(|(i, task)| TaskRow::new(task, i + 1))
                .collect(),
        }
    }
}

/// The main widget.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WidgetView {
    /// Board version this view was projected from.
    pub version: u64,
    /// Lists in creation order.
    pub lists: Vec<ListView>,
    /// Progress bar.
    pub progress: Progress,
}

impl WidgetView {
    /// Headings of every list, in order.
    pub fn headings(&self) -> Vec<&str> {
        self.lists.iter().map(|l| l.heading.as_str()).collect()
    }

    /// Looks up a list by name.
    pub fn list(&self, name: &str) -> Option<&ListView> {
        self.lists.iter().find(|l| l.name == name)
    }
}

/// Projects boards into [`WidgetView`]s.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WidgetProjector {
    tiers: TierThresholds,
}

impl WidgetProjector {
    /// Creates a projector using the given tier thresholds.
    pub fn new(tiers: TierThresholds) -> Self {
        Self { tiers }
    }
}

impl Projector for WidgetProjector {
    type View = WidgetView;

    fn project(&self, board: &Board) -> WidgetView {
        WidgetView {
            version: board.version,
            lists: board.lists.iter().map(ListView::from).collect(),
            progress: board.progress(&self.tiers),
        }
    }
}
