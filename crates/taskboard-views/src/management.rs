//! The management view: one list, filterable, with per-row actions.
//!
//! Actions are offered only when the viewing role passes the same gate
//! that the processor relies on. Hiding a button is cosmetic; the command
//! it builds is still authorized when submitted.

use serde::Serialize;

use taskboard_commands::{check, Command, Verb};
use taskboard_models::{Board, Role, TaskStatus, User};
use taskboard_store::TaskFilter;

use crate::projector::Projector;
use crate::row::TaskRow;

/// An action control on a management row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskAction {
    /// Approve a pending submission.
    Approve,
    /// Reject a pending submission.
    Reject,
    /// Complete an approved task.
    Complete,
}

impl TaskAction {
    /// The verb this action submits.
    pub fn verb(self) -> Verb {
        match self {
            TaskAction::Approve => Verb::Approve,
            TaskAction::Reject => Verb::Reject,
            TaskAction::Complete => Verb::Complete,
        }
    }

    /// Button label.
    pub fn label(self) -> &'static str {
        match self {
            TaskAction::Approve => "Approve",
            TaskAction::Reject => "Reject",
            TaskAction::Complete => "Complete",
        }
    }

    fn applies_to(self, row: &TaskRow) -> bool {
        match self {
            TaskAction::Approve | TaskAction::Reject => {
                row.status == TaskStatus::Pending && row.owner.is_some()
            }
            TaskAction::Complete => row.status == TaskStatus::Approved,
        }
    }
}

/// Selection and filter for a management view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagementQuery {
    /// List to show; the first list when unset.
    pub list: Option<String>,
    /// Only rows with this status.
    pub status: Option<TaskStatus>,
    /// Role of whoever looks at the view.
    pub viewer_role: Role,
}

impl ManagementQuery {
    /// Query for `role` with no selection or filter.
    pub fn new(viewer_role: Role) -> Self {
        Self {
            list: None,
            status: None,
            viewer_role,
        }
    }

    /// Selects a list.
    pub fn with_list(mut self, list: impl Into<String>) -> Self {
        self.list = Some(list.into());
        self
    }

    /// Filters by status.
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }
}

/// One row with its permitted actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManagementRow {
    /// The task.
    pub task: TaskRow,
    /// Actions the viewer may take.
    pub actions: Vec<TaskAction>,
}

impl ManagementRow {
    /// Builds the command an action control submits for this row.
    ///
    /// Every action names the row's list and task id, so it acts on exactly
    /// this task. Returns `None` if the action is not offered on this row.
    pub fn command(&self, action: TaskAction, issuer: User) -> Option<Command> {
        if !self.actions.contains(&action) {
            return None;
        }
        let args = match action {
            TaskAction::Complete => vec![self.task.list_name.clone(), self.task.id.clone()],
            TaskAction::Approve | TaskAction::Reject => vec![
                self.task.owner.clone()?,
                self.task.list_name.clone(),
                self.task.id.clone(),
            ],
        };
        Some(Command::action(action.verb(), args, issuer))
    }
}

/// The moderation panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManagementView {
    /// Board version this view was projected from.
    pub version: u64,
    /// Selected list, if it exists.
    pub selected: Option<String>,
    /// Every list name, for the selector.
    pub available_lists: Vec<String>,
    /// Active status filter.
    pub status_filter: Option<TaskStatus>,
    /// Rows of the selected list.
    pub rows: Vec<ManagementRow>,
}

impl ManagementView {
    /// Finds the row of a task.
    pub fn row(&self, task_id: &str) -> Option<&ManagementRow> {
        self.rows.iter().find(|r| r.task.id == task_id)
    }
}

impl Projector for ManagementQuery {
    type View = ManagementView;

    fn project(&self, board: &Board) -> ManagementView {
        let selected = match &self.list {
            Some(name) => board.list(name),
            None => board.lists.first(),
        };

        let allowed: Vec<TaskAction> = [
            TaskAction::Approve,
            TaskAction::Reject,
            TaskAction::Complete,
        ]
        .into_iter()
        .filter(|a| check(a.verb().name(), self.viewer_role).is_authorized())
        .collect();

        let filter = TaskFilter::new().with_status_opt(self.status);
        let rows = selected
            .map(|list| {
                list.tasks
                    .iter()
                    .enumerate()
                    .filter(|(_, task)| filter.matches(task))
                    .map(|(i, task)| {
                        let task = TaskRow::new(task, i + 1);
                        let actions = allowed
                            .iter()
                            .copied()
                            .filter(|a| a.applies_to(&task))
                            .collect();
                        ManagementRow { task, actions }
                    })
                    .collect()
            })
            .unwrap_or_default();

        ManagementView {
            version: board.version,
            selected: selected.map(|l| l.name.clone()),
            available_lists: board.list_names(),
            status_filter: self.status,
            rows,
        }
    }
}
