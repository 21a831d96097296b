//! CommandProcessor - applies authorized commands to the task store.
//!
//! Every command runs as exactly one store transaction. Validation that
//! needs the board happens inside the transaction, so a rejected command
//! leaves the published board untouched.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use taskboard_commands::{authorize, parse, AuthorizedCommand, Command, Verb};
use taskboard_models::{Activity, Board, Task, TaskId, TaskList, TaskStatus, User};
use taskboard_store::{Draft, TaskRef, TaskStore};

use crate::change::{Applied, Change};
use crate::config::{AddTaskOwner, BoardConfig, DuplicateScope};
use crate::error::{CommandError, Result};

/// How `!complete` names its task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskTarget {
    /// A task id such as `task-…`.
    Id(TaskId),
    /// A 1-based position in the list.
    Position(usize),
}

impl TaskTarget {
    /// Finds the targeted task in `list`.
    pub fn resolve<'a>(&self, list: &'a TaskList) -> Option<&'a Task> {
        match self {
            TaskTarget::Id(id) => list.task(id),
            TaskTarget::Position(position) => list.task_at(*position),
        }
    }
}

impl FromStr for TaskTarget {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self> {
        if TaskId::is_formatted(s) {
            return Ok(TaskTarget::Id(TaskId::from_string(s)));
        }
        match s.parse::<usize>() {
            Ok(position) if position > 0 => Ok(TaskTarget::Position(position)),
            _ => Err(CommandError::InvalidArgument(format!(
                "\"{s}\" is not a task id or position."
            ))),
        }
    }
}

impl fmt::Display for TaskTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskTarget::Id(id) => write!(f, "{}", id),
            TaskTarget::Position(position) => write!(f, "#{}", position),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusUpdate {
    Complete,
    Pause,
    Resume,
}

impl FromStr for StatusUpdate {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "complete" | "done" => Ok(StatusUpdate::Complete),
            "pause" => Ok(StatusUpdate::Pause),
            "resume" => Ok(StatusUpdate::Resume),
            _ => Err(CommandError::InvalidArgument(
                "Invalid status. Use 'complete', 'pause', or 'resume'.".to_string(),
            )),
        }
    }
}

/// The only writer of board state.
#[derive(Debug, Clone)]
pub struct CommandProcessor {
    store: TaskStore,
    config: BoardConfig,
}

impl CommandProcessor {
    /// Creates a processor over an existing store.
    pub fn new(store: TaskStore, config: BoardConfig) -> Self {
        Self { store, config }
    }

    /// Creates a processor over a freshly seeded board.
    pub fn seeded(config: BoardConfig) -> Self {
        let board = Board::seeded(&config.session_summary, &config.default_list_name);
        Self::new(TaskStore::with_board(board), config)
    }

    /// The underlying store.
    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    /// Board settings.
    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// Latest committed board.
    pub fn snapshot(&self) -> Arc<Board> {
        self.store.snapshot()
    }

    /// Parses, authorizes and applies one chat line.
    pub fn process_line(&self, text: &str, issuer: User) -> Result<Applied> {
        let command = parse(text, issuer)?;
        self.process(command)
    }

    /// Authorizes and applies a parsed command.
    pub fn process(&self, command: Command) -> Result<Applied> {
        let authorized = authorize(command)?;
        self.execute(authorized)
    }

    /// Applies a command that already passed the gate.
    pub fn execute(&self, authorized: AuthorizedCommand) -> Result<Applied> {
        let verb = authorized.verb();
        let command = authorized.into_command();

        let result = match verb {
            Verb::Task => self.submit_task(&command),
            Verb::Approve => self.approve(&command),
            Verb::AddTask => self.add_task(&command),
            Verb::Complete => self.complete(&command),
            Verb::Reject => self.reject(&command),
            Verb::DoneTask => self.done_task(&command),
            Verb::Status => self.update_status(&command),
            Verb::AddList => self.add_list(&command),
            Verb::DeleteList => self.delete_list(&command),
        };

        match &result {
            Ok(applied) => info!(
                verb = %verb,
                issuer = %command.issuer.name,
                change = applied.change.kind(),
                version = applied.version(),
                "command applied"
            ),
            Err(err) => debug!(
                verb = %verb,
                issuer = %command.issuer.name,
                error = err.kind(),
                "command rejected"
            ),
        }
        result
    }

    /// Records that `owner` spoke in chat.
    ///
    /// Refreshes `last_seen` on every task they own and brings offline
    /// tasks back to active. Returns `None` without committing if they own
    /// nothing.
    pub fn observe_presence(&self, owner: &str, now: DateTime<Utc>) -> Result<Option<Applied>> {
        if !self.store.snapshot().owns_any_task(owner) {
            return Ok(None);
        }

        let applied = self.commit(|draft| {
            let revived = draft.touch(owner, now);
            let change = if revived.is_empty() {
                Change::OwnerSeen {
                    owner: owner.to_string(),
                }
            } else {
                Change::ActivityChanged {
                    tasks: revived,
                    activity: Activity::Active,
                }
            };
            Ok((change, String::new()))
        })?;
        Ok(Some(applied))
    }

    /// Marks idle owners offline. Returns `None` without committing if no
    /// task went idle.
    pub fn sweep_offline(&self, now: DateTime<Utc>) -> Result<Option<Applied>> {
        let threshold = chrono::Duration::from_std(self.config.offline_threshold())
            .map_err(|e| CommandError::InvalidArgument(e.to_string()))?;

        if !self
            .store
            .snapshot()
            .tasks()
            .any(|t| t.is_idle(now, threshold))
        {
            return Ok(None);
        }

        let applied = self.commit(|draft| {
            let swept = draft.sweep_offline(now, threshold);
            let feedback = format!("{} task(s) marked offline.", swept.len());
            Ok((
                Change::ActivityChanged {
                    tasks: swept,
                    activity: Activity::Offline,
                },
                feedback,
            ))
        })?;
        info!(version = applied.version(), "offline sweep committed");
        Ok(Some(applied))
    }

    fn commit<F>(&self, f: F) -> Result<Applied>
    where
        F: FnOnce(&mut Draft<'_>) -> Result<(Change, String)>,
    {
        let commit = self.store.transaction(f)?;
        let (change, feedback) = commit.value;
        Ok(Applied {
            feedback,
            change,
            board: commit.board,
        })
    }

    fn default_list<'b>(&self, board: &'b Board) -> Result<&'b TaskList> {
        let name = &self.config.default_list_name;
        board
            .list(name)
            .ok_or_else(|| CommandError::ListNotFound(name.clone()))
    }

    /// The pending task `!approve` / `!reject` act on: the `<list> <task>`
    /// target when one is given, otherwise the user's most recent pending
    /// task in the default list.
    fn pending_target<'b>(
        &self,
        board: &'b Board,
        command: &Command,
        verb: Verb,
    ) -> Result<&'b Task> {
        let usage = CommandError::MissingArgument(verb.usage());
        let user = command.arg(0).ok_or_else(|| usage.clone())?;
        let not_found =
            || CommandError::TaskNotFound(format!("No pending task found for {user}."));
        let is_pending = |t: &&Task| t.is_owned_by(user) && t.status == TaskStatus::Pending;

        match command.arg(1) {
            Some(list_name) => {
                let target: TaskTarget = command.arg(2).ok_or(usage)?.parse()?;
                let list = board
                    .list(list_name)
                    .ok_or_else(|| CommandError::ListNotFound(list_name.to_string()))?;
                target.resolve(list).filter(is_pending).ok_or_else(not_found)
            }
            None => self
                .default_list(board)?
                .tasks
                .iter()
                .filter(is_pending)
                .max_by_key(|t| t.sequence)
                .ok_or_else(not_found),
        }
    }

    fn is_duplicate(&self, list: &TaskList, user: &str, description: &str) -> bool {
        list.tasks
            .iter()
            .filter(|t| t.is_owned_by(user))
            .any(|t| match self.config.duplicate_scope {
                DuplicateScope::SameDescription => {
                    t.status == TaskStatus::Pending && t.description == description
                }
                DuplicateScope::OpenTask => t.status != TaskStatus::Completed,
                DuplicateScope::Disabled => false,
            })
    }

    fn submit_task(&self, command: &Command) -> Result<Applied> {
        let description = command
            .rest_from(0)
            .ok_or(CommandError::MissingArgument(Verb::Task.usage()))?;
        let user = command.issuer.name.as_str();

        self.commit(|draft| {
            let board = draft.board();
            let list = self.default_list(board)?;
            if board.count_status(TaskStatus::Pending) >= self.config.pending_limit {
                return Err(CommandError::QueueFull);
            }
            if self.is_duplicate(list, user, &description) {
                return Err(CommandError::DuplicateRequest {
                    user: user.to_string(),
                });
            }

            let list_name = list.name.clone();
            let task = draft.add_task(&list_name, &description, Some(user), TaskStatus::Pending)?;
            Ok((
                Change::TaskAdded {
                    task: TaskRef::of(&task),
                    status: task.status,
                },
                format!("@{user}, your task has been submitted for approval!"),
            ))
        })
    }

    fn approve(&self, command: &Command) -> Result<Applied> {
        self.commit(|draft| {
            let pending = self.pending_target(draft.board(), command, Verb::Approve)?;

            if pending.list_name == self.config.default_list_name {
                let list = self.default_list(draft.board())?;
                let filled = list.count_status(TaskStatus::Approved)
                    + list.count_status(TaskStatus::Completed);
                if filled >= self.config.viewer_task_limit {
                    return Err(CommandError::ListFull(list.name.clone()));
                }
            }

            let task_ref = TaskRef::of(pending);
            let owner = pending.owner.clone().unwrap_or_default();
            draft.transition_task(&task_ref, TaskStatus::Approved)?;
            Ok((
                Change::TaskTransitioned {
                    task: task_ref,
                    from: TaskStatus::Pending,
                    to: TaskStatus::Approved,
                },
                format!("@{owner}'s task has been approved and added to the list!"),
            ))
        })
    }

    fn add_task(&self, command: &Command) -> Result<Applied> {
        let usage = CommandError::MissingArgument(Verb::AddTask.usage());
        let list_name = command.arg(0).ok_or_else(|| usage.clone())?;
        let description = command.rest_from(1).ok_or(usage)?;
        let owner = match self.config.addtask_owner {
            AddTaskOwner::Issuer => Some(command.issuer.name.as_str()),
            AddTaskOwner::Unassigned => None,
        };

        self.commit(|draft| {
            let task = draft.add_task(list_name, &description, owner, TaskStatus::Approved)?;
            Ok((
                Change::TaskAdded {
                    task: TaskRef::of(&task),
                    status: task.status,
                },
                format!("Task added to {list_name}."),
            ))
        })
    }

    fn complete(&self, command: &Command) -> Result<Applied> {
        let usage = CommandError::MissingArgument(Verb::Complete.usage());
        let list_name = command.arg(0).ok_or_else(|| usage.clone())?;
        let target: TaskTarget = command.arg(1).ok_or(usage)?.parse()?;

        self.commit(|draft| {
            let list = draft
                .board()
                .list(list_name)
                .ok_or_else(|| CommandError::ListNotFound(list_name.to_string()))?;
            let task = target.resolve(list).ok_or_else(|| {
                CommandError::TaskNotFound(format!("Task {target} not found in {list_name}."))
            })?;

            let task_ref = TaskRef::of(task);
            let from = task.status;
            let done = draft.transition_task(&task_ref, TaskStatus::Completed)?;
            Ok((
                Change::TaskTransitioned {
                    task: task_ref,
                    from,
                    to: TaskStatus::Completed,
                },
                format!(
                    "Task \"{}\" in {list_name} marked as complete.",
                    done.description
                ),
            ))
        })
    }

    fn reject(&self, command: &Command) -> Result<Applied> {
        self.commit(|draft| {
            let pending = self.pending_target(draft.board(), command, Verb::Reject)?;
            let task_ref = TaskRef::of(pending);
            let owner = pending.owner.clone().unwrap_or_default();
            draft.remove_task(&task_ref)?;
            Ok((
                Change::TaskRemoved { task: task_ref },
                format!("@{owner}'s task has been rejected."),
            ))
        })
    }

    fn done_task(&self, command: &Command) -> Result<Applied> {
        let user = command
            .arg(0)
            .ok_or(CommandError::MissingArgument(Verb::DoneTask.usage()))?;

        self.commit(|draft| {
            let task = latest_owned(draft.board(), user, |_| true).ok_or_else(|| {
                CommandError::TaskNotFound(format!("No active task found for user {user}."))
            })?;

            let task_ref = TaskRef::of(task);
            let from = task.status;
            draft.transition_task(&task_ref, TaskStatus::Completed)?;
            Ok((
                Change::TaskTransitioned {
                    task: task_ref,
                    from,
                    to: TaskStatus::Completed,
                },
                format!("Task for {user} marked as done. Progress increased!"),
            ))
        })
    }

    fn update_status(&self, command: &Command) -> Result<Applied> {
        let update: StatusUpdate = command
            .arg(0)
            .ok_or(CommandError::MissingArgument(Verb::Status.usage()))?
            .parse()?;
        let user = command.issuer.name.as_str();

        self.commit(|draft| {
            let task = latest_owned(draft.board(), user, |t| t.status != TaskStatus::Pending)
                .ok_or_else(|| {
                    CommandError::TaskNotFound(format!("@{user}, you don't have an active task."))
                })?;
            let task_ref = TaskRef::of(task);
            let from = task.status;

            if update == StatusUpdate::Complete {
                draft.transition_task(&task_ref, TaskStatus::Completed)?;
                return Ok((
                    Change::TaskTransitioned {
                        task: task_ref,
                        from,
                        to: TaskStatus::Completed,
                    },
                    format!("@{user}'s task is now complete! Great job!"),
                ));
            }

            if from == TaskStatus::Completed {
                return Err(CommandError::InvalidArgument(format!(
                    "@{user}'s task is already completed."
                )));
            }
            let (activity, feedback) = match update {
                StatusUpdate::Pause => (Activity::Paused, format!("@{user}'s task is paused.")),
                _ => (
                    Activity::Active,
                    format!("@{user}'s task has been resumed."),
                ),
            };
            draft.set_activity(&task_ref, activity)?;
            Ok((
                Change::ActivityChanged {
                    tasks: vec![task_ref],
                    activity,
                },
                feedback,
            ))
        })
    }

    fn add_list(&self, command: &Command) -> Result<Applied> {
        let name = command
            .arg(0)
            .ok_or(CommandError::MissingArgument(Verb::AddList.usage()))?;
        let summary = command.rest_from(1);

        self.commit(|draft| {
            draft.create_list(name, summary.as_deref())?;
            Ok((
                Change::ListCreated {
                    list: name.to_string(),
                },
                format!("List \"{name}\" created."),
            ))
        })
    }

    fn delete_list(&self, command: &Command) -> Result<Applied> {
        let name = command
            .arg(0)
            .ok_or(CommandError::MissingArgument(Verb::DeleteList.usage()))?;

        self.commit(|draft| {
            let removed = draft.delete_list(name)?;
            Ok((
                Change::ListDeleted {
                    list: removed.name.clone(),
                },
                format!("List \"{name}\" deleted."),
            ))
        })
    }
}

/// Most recent task owned by `owner` across all lists, preferring approved
/// tasks over anything else that passes `eligible`.
fn latest_owned<'b>(
    board: &'b Board,
    owner: &str,
    eligible: impl Fn(&Task) -> bool,
) -> Option<&'b Task> {
    let candidates: Vec<&Task> = board
        .tasks()
        .filter(|t| t.is_owned_by(owner) && eligible(*t))
        .collect();

    candidates
        .iter()
        .filter(|t| t.status == TaskStatus::Approved)
        .max_by_key(|t| t.sequence)
        .or_else(|| candidates.iter().max_by_key(|t| t.sequence))
        .copied()
}
