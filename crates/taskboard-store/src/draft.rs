//! Draft - the mutable copy of a board inside a transaction.
//!
//! Every mutation rule of the store lives here: list uniqueness, list
//! existence, sequence assignment and forward-only status transitions.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::trace;

use taskboard_models::{Activity, Board, Task, TaskId, TaskList, TaskStatus};

use crate::error::{Result, StoreError};
use crate::filter::TaskFilter;

/// Weak reference to a task: the list that owns it plus its id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskRef {
    /// Owning list.
    pub list_name: String,
    /// Task id within that list.
    pub task_id: TaskId,
}

impl TaskRef {
    /// Creates a reference.
    pub fn new(list_name: impl Into<String>, task_id: TaskId) -> Self {
        Self {
            list_name: list_name.into(),
            task_id,
        }
    }

    /// Builds the reference for an existing task.
    pub fn of(task: &Task) -> Self {
        Self::new(task.list_name.clone(), task.id.clone())
    }
}

impl fmt::Display for TaskRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.list_name, self.task_id)
    }
}

/// Private working copy of the board for one transaction.
///
/// Nothing written through a draft is visible until the transaction
/// returns `Ok`; on error the copy is dropped.
pub struct Draft<'a> {
    board: &'a mut Board,
}

impl<'a> Draft<'a> {
    pub(crate) fn new(board: &'a mut Board) -> Self {
        Self { board }
    }

    /// Read access to the working copy.
    pub fn board(&self) -> &Board {
        &*self.board
    }

    /// Creates an empty list. Fails with `DuplicateList` if the name is taken.
    pub fn create_list(&mut self, name: &str, summary: Option<&str>) -> Result<()> {
        if name.trim().is_empty() {
            return Err(StoreError::InvalidListName(name.to_string()));
        }
        if self.board.has_list(name) {
            return Err(StoreError::DuplicateList(name.to_string()));
        }

        let list = TaskList::new(name).with_summary(summary.unwrap_or_default());
        self.board.lists.push(list);
        trace!(list = %name, "list created");
        Ok(())
    }

    /// Removes a list and every task in it.
    pub fn delete_list(&mut self, name: &str) -> Result<TaskList> {
        let index = self
            .board
            .lists
            .iter()
            .position(|l| l.name == name)
            .ok_or_else(|| StoreError::ListNotFound(name.to_string()))?;
        Ok(self.board.lists.remove(index))
    }

    /// Appends a new task to `list_name` with the given status.
    pub fn add_task(
        &mut self,
        list_name: &str,
        description: &str,
        owner: Option<&str>,
        status: TaskStatus,
    ) -> Result<Task> {
        let sequence = self.board.next_sequence;
        let list = self
            .board
            .list_mut(list_name)
            .ok_or_else(|| StoreError::ListNotFound(list_name.to_string()))?;

        let mut task = Task::new(list_name, description, owner.map(str::to_string), status);
        task.sequence = sequence;
        list.tasks.push(task.clone());

        self.board.next_sequence = sequence + 1;
        if status == TaskStatus::Completed {
            self.board.progress_points += 1;
        }

        trace!(list = %list_name, task = %task.id, status = %status, "task added");
        Ok(task)
    }

    /// Finds the most recent task in a list owned by `owner`.
    pub fn find_task(
        &self,
        list_name: &str,
        owner: &str,
        status: Option<TaskStatus>,
    ) -> Option<Task> {
        self.board.find_task(list_name, owner, status).cloned()
    }

    /// Returns every task matching `filter`, in board order.
    pub fn query(&self, filter: &TaskFilter) -> Vec<Task> {
        self.board
            .tasks()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect()
    }

    /// Looks up a referenced task.
    pub fn get(&self, task_ref: &TaskRef) -> Result<&Task> {
        self.board
            .list(&task_ref.list_name)
            .ok_or_else(|| StoreError::ListNotFound(task_ref.list_name.clone()))?
            .task(&task_ref.task_id)
            .ok_or_else(|| StoreError::TaskNotFound(task_ref.to_string()))
    }

    fn get_mut(&mut self, task_ref: &TaskRef) -> Result<&mut Task> {
        self.board
            .list_mut(&task_ref.list_name)
            .ok_or_else(|| StoreError::ListNotFound(task_ref.list_name.clone()))?
            .task_mut(&task_ref.task_id)
            .ok_or_else(|| StoreError::TaskNotFound(task_ref.to_string()))
    }

    /// Moves a task one step forward. Completing a task earns a progress point.
    pub fn transition_task(&mut self, task_ref: &TaskRef, to: TaskStatus) -> Result<Task> {
        let task = self.get_mut(task_ref)?;
        let from = task.status;

        if !task.advance(to) {
            return Err(StoreError::InvalidTransition {
                task: task.id.to_string(),
                from,
                to,
            });
        }

        let task = task.clone();
        if to == TaskStatus::Completed {
            self.board.progress_points += 1;
        }

        trace!(task = %task_ref, from = %from, to = %to, "task transitioned");
        Ok(task)
    }

    /// Removes a task from its list.
    pub fn remove_task(&mut self, task_ref: &TaskRef) -> Result<Task> {
        let list = self
            .board
            .list_mut(&task_ref.list_name)
            .ok_or_else(|| StoreError::ListNotFound(task_ref.list_name.clone()))?;
        let index = list
            .tasks
            .iter()
            .position(|t| t.id == task_ref.task_id)
            .ok_or_else(|| StoreError::TaskNotFound(task_ref.to_string()))?;
        Ok(list.tasks.remove(index))
    }

    /// Sets the owner activity of a task. Returns true if it changed.
    pub fn set_activity(&mut self, task_ref: &TaskRef, activity: Activity) -> Result<bool> {
        let task = self.get_mut(task_ref)?;
        if task.activity == activity {
            return Ok(false);
        }
        task.activity = activity;
        Ok(true)
    }

    /// Records that `owner` was seen at `now`.
    ///
    /// Offline tasks of that owner come back as active. Returns the tasks
    /// whose activity changed.
    pub fn touch(&mut self, owner: &str, now: DateTime<Utc>) -> Vec<TaskRef> {
        let mut revived = Vec::new();
        for task in self
            .board
            .lists
            .iter_mut()
            .flat_map(|l| l.tasks.iter_mut())
            .filter(|t| t.is_owned_by(owner))
        {
            task.last_seen = Some(now);
            if task.activity == Activity::Offline {
                task.activity = Activity::Active;
                revived.push(TaskRef::of(task));
            }
        }
        revived
    }

    /// Marks approved, active tasks whose owner has not been seen for
    /// longer than `threshold` as offline. Returns the affected tasks.
    pub fn sweep_offline(&mut self, now: DateTime<Utc>, threshold: Duration) -> Vec<TaskRef> {
        let mut swept = Vec::new();
        for task in self
            .board
            .lists
            .iter_mut()
            .flat_map(|l| l.tasks.iter_mut())
            .filter(|t| t.is_idle(now, threshold))
        {
            task.activity = Activity::Offline;
            swept.push(TaskRef::of(task));
        }
        swept
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with_lists() -> Board {
        let mut board = Board::new();
        let mut draft = Draft::new(&mut board);
        draft.create_list("Stream Goals", None).unwrap();
        draft.create_list("Viewers", None).unwrap();
        board
    }

    #[test]
    fn test_create_list_duplicate() {
        let mut board = board_with_lists();
        let mut draft = Draft::new(&mut board);
        let err = draft.create_list("Viewers", Some("x")).unwrap_err();
        assert_eq!(err, StoreError::DuplicateList("Viewers".into()));
    }

    #[test]
    fn test_create_list_blank_name() {
        let mut board = Board::new();
        let mut draft = Draft::new(&mut board);
        assert!(matches!(
            draft.create_list("   ", None),
            Err(StoreError::InvalidListName(_))
        ));
    }

    #[test]
    fn test_add_task_assigns_increasing_sequence() {
        let mut board = board_with_lists();
        let mut draft = Draft::new(&mut board);
        let a = draft
            .add_task("Viewers", "a", Some("alice"), TaskStatus::Pending)
            .unwrap();
        let b = draft
            .add_task("Stream Goals", "b", None, TaskStatus::Approved)
            .unwrap();
        assert!(b.sequence > a.sequence);
        assert_eq!(board.next_sequence, 2);
    }

    #[test]
    fn test_add_task_missing_list() {
        let mut board = board_with_lists();
        let mut draft = Draft::new(&mut board);
        let err = draft
            .add_task("Nope", "a", None, TaskStatus::Approved)
            .unwrap_err();
        assert_eq!(err, StoreError::ListNotFound("Nope".into()));
    }

    #[test]
    fn test_transition_forward_only() {
        let mut board = board_with_lists();
        let mut draft = Draft::new(&mut board);
        let task = draft
            .add_task("Viewers", "a", Some("alice"), TaskStatus::Pending)
            .unwrap();
        let task_ref = TaskRef::of(&task);

        let err = draft
            .transition_task(&task_ref, TaskStatus::Completed)
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidTransition { .. }));

        draft
            .transition_task(&task_ref, TaskStatus::Approved)
            .unwrap();
        draft
            .transition_task(&task_ref, TaskStatus::Completed)
            .unwrap();

        for target in TaskStatus::ALL {
            assert!(draft.transition_task(&task_ref, target).is_err());
        }
        assert_eq!(board.progress_points, 1);
    }

    #[test]
    fn test_remove_and_delete() {
        let mut board = board_with_lists();
        let mut draft = Draft::new(&mut board);
        let task = draft
            .add_task("Viewers", "a", Some("alice"), TaskStatus::Pending)
            .unwrap();
        let removed = draft.remove_task(&TaskRef::of(&task)).unwrap();
        assert_eq!(removed.id, task.id);
        assert!(draft.remove_task(&TaskRef::of(&task)).is_err());

        draft.delete_list("Viewers").unwrap();
        assert!(matches!(
            draft.delete_list("Viewers"),
            Err(StoreError::ListNotFound(_))
        ));
        assert_eq!(board.list_names(), vec!["Stream Goals"]);
    }

    #[test]
    fn test_sweep_and_touch() {
        let mut board = board_with_lists();
        let mut draft = Draft::new(&mut board);
        let task = draft
            .add_task("Viewers", "a", Some("Alice"), TaskStatus::Approved)
            .unwrap();
        draft
            .add_task("Viewers", "b", Some("Bob"), TaskStatus::Pending)
            .unwrap();

        let later = Utc::now() + Duration::minutes(10);
        let swept = draft.sweep_offline(later, Duration::minutes(5));
        assert_eq!(swept, vec![TaskRef::of(&task)]);
        assert_eq!(draft.get(&swept[0]).unwrap().activity, Activity::Offline);

        let revived = draft.touch("alice", later);
        assert_eq!(revived, swept);
        assert_eq!(draft.get(&revived[0]).unwrap().activity, Activity::Active);
        assert!(draft.touch("alice", later).is_empty());
    }

    #[test]
    fn test_sweep_skips_paused() {
        let mut board = board_with_lists();
        let mut draft = Draft::new(&mut board);
        let task = draft
            .add_task("Viewers", "a", Some("Alice"), TaskStatus::Approved)
            .unwrap();
        assert!(draft
            .set_activity(&TaskRef::of(&task), Activity::Paused)
            .unwrap());

        let later = Utc::now() + Duration::minutes(10);
        assert!(draft.sweep_offline(later, Duration::minutes(5)).is_empty());
    }
}
