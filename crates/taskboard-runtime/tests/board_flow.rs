//! End-to-end flows through the runtime: chat lines and UI actions in,
//! live views out.

use std::time::Duration;

use taskboard_core::{BoardConfig, CommandError, CommandProcessor};
use taskboard_models::{Role, TaskStatus, User};
use taskboard_runtime::{Delivery, Runtime, RuntimeConfig, RuntimeError};
use taskboard_views::{ManagementQuery, OverlayProjector, TaskAction, WidgetProjector};

const POLL: Duration = Duration::from_secs(1);

async fn started() -> Runtime {
    let processor = CommandProcessor::seeded(BoardConfig::default());
    let mut runtime = Runtime::new(processor, RuntimeConfig::new().with_poll_interval(POLL));
    runtime.start().await.unwrap();
    runtime
}

fn alice() -> User {
    User::viewer("Alice")
}

fn moderator() -> User {
    User::moderator("Mod")
}

#[tokio::test(start_paused = true)]
async fn completed_task_is_struck_through_on_overlay_within_one_poll() {
    let mut runtime = started().await;
    let sender = runtime.sender();
    let overlay = runtime.attach_polled(OverlayProjector);

    sender.submit(r#"!task "Fix bug""#, alice()).await.unwrap();
    sender.submit("!approve Alice", moderator()).await.unwrap();

    let board = runtime.board();
    let task = board.find_task("Viewers", "Alice", None).unwrap();
    assert_eq!(task.status, TaskStatus::Approved);
    let position = board
        .list("Viewers")
        .unwrap()
        .tasks
        .iter()
        .position(|t| t.id == task.id)
        .unwrap()
        + 1;

    let applied = sender
        .submit(format!("!complete Viewers {position}"), moderator())
        .await
        .unwrap()
        .unwrap();
    let task_id = task.id.as_str().to_string();

    tokio::time::sleep(POLL + Duration::from_millis(10)).await;
    assert_eq!(overlay.version(), applied.version());
    let view = overlay.latest();
    let item = view.item(&task_id).unwrap();
    assert_eq!(item.task.description, "Fix bug");
    assert!(item.struck_through);

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn viewer_cannot_approve() {
    let mut runtime = started().await;
    let sender = runtime.sender();

    sender.submit("!task hello", alice()).await.unwrap();
    let version = runtime.board().version;

    let err = sender
        .submit("!approve Alice", User::viewer("Bob"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::Command(CommandError::Forbidden { .. })
    ));
    let board = runtime.board();
    assert_eq!(board.version, version);
    assert_eq!(
        board.find_task("Viewers", "Alice", None).unwrap().status,
        TaskStatus::Pending
    );

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn new_list_appears_as_widget_heading() {
    let mut runtime = started().await;
    let sender = runtime.sender();
    let mut widget = runtime.attach_pushed(WidgetProjector::default());
    assert_eq!(widget.latest().lists.len(), 2);

    let applied = sender
        .submit(r#"!addlist "My New List""#, moderator())
        .await
        .unwrap()
        .unwrap();

    let view = widget.wait_for(applied.version()).await.unwrap();
    assert_eq!(view.lists.len(), 3);
    assert!(view.headings().contains(&"My New List"));

    let err = sender
        .submit(r#"!addlist "My New List""#, moderator())
        .await
        .unwrap_err();
    assert!(matches!(
        err.as_command(),
        Some(CommandError::DuplicateList(_))
    ));

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn addtask_is_visible_without_reload() {
    let mut runtime = started().await;
    let sender = runtime.sender();
    let mut widget = runtime.attach_pushed(WidgetProjector::default());

    let applied = sender
        .submit("!addtask 'Stream Goals' MyTestTask", moderator())
        .await
        .unwrap()
        .unwrap();

    let view = widget.wait_for(applied.version()).await.unwrap();
    let goals = view.list("Stream Goals").unwrap();
    assert!(goals.tasks.iter().any(|t| t.description == "MyTestTask"));

    runtime.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn management_action_completes_in_both_views() {
    let mut runtime = started().await;
    let sender = runtime.sender();
    let mut management =
        runtime.attach_pushed(ManagementQuery::new(Role::Mod).with_list("Viewers"));
    let overlay = runtime.sync().attach(OverlayProjector, Delivery::Poll(POLL));

    sender.submit("!task ship it", alice()).await.unwrap();
    let approved = sender
        .submit("!approve alice", moderator())
        .await
        .unwrap()
        .unwrap();

    let view = management.wait_for(approved.version()).await.unwrap();
    let row = &view.rows[0];
    assert_eq!(row.actions, vec![TaskAction::Complete]);
    let command = row.command(TaskAction::Complete, moderator()).unwrap();
    let task_id = row.task.id.clone();

    let completed = sender.submit_command(command).await.unwrap();

    let view = management.wait_for(completed.version()).await.unwrap();
    assert_eq!(view.row(&task_id).unwrap().task.status, TaskStatus::Completed);
    assert!(view.row(&task_id).unwrap().actions.is_empty());

    tokio::time::sleep(POLL + Duration::from_millis(10)).await;
    let overlay_view = overlay.latest();
    assert!(overlay_view.item(&task_id).unwrap().struck_through);

    overlay.stop().await.unwrap();
    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn management_approve_acts_on_its_own_row() {
    let mut runtime = started().await;
    let sender = runtime.sender();
    sender.submit("!task first", alice()).await.unwrap();
    let latest = sender
        .submit("!task second", alice())
        .await
        .unwrap()
        .unwrap();

    let mut management =
        runtime.attach_pushed(ManagementQuery::new(Role::Mod).with_list("Viewers"));
    let view = management.wait_for(latest.version()).await.unwrap();
    let first = view
        .rows
        .iter()
        .find(|r| r.task.description == "first")
        .unwrap();
    let second_id = view
        .rows
        .iter()
        .find(|r| r.task.description == "second")
        .unwrap()
        .task
        .id
        .clone();

    let command = first.command(TaskAction::Approve, moderator()).unwrap();
    let approved = sender.submit_command(command).await.unwrap();

    let view = management.wait_for(approved.version()).await.unwrap();
    assert_eq!(view.row(&first.task.id).unwrap().task.status, TaskStatus::Approved);
    assert_eq!(view.row(&second_id).unwrap().task.status, TaskStatus::Pending);

    let reject = view
        .row(&second_id)
        .unwrap()
        .command(TaskAction::Reject, moderator())
        .unwrap();
    let rejected = sender.submit_command(reject).await.unwrap();
    let view = management.wait_for(rejected.version()).await.unwrap();
    assert!(view.row(&second_id).is_none());
    assert_eq!(view.row(&first.task.id).unwrap().task.status, TaskStatus::Approved);

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn status_never_regresses() {
    let mut runtime = started().await;
    let sender = runtime.sender();

    sender.submit("!task one", alice()).await.unwrap();
    sender.submit("!approve Alice", moderator()).await.unwrap();
    sender.submit("!donetask Alice", moderator()).await.unwrap();

    for line in [
        "!approve Alice",
        "!donetask Alice",
        "!complete Viewers 1",
        "!reject Alice",
    ] {
        assert!(sender.submit(line, moderator()).await.is_err(), "{line}");
    }
    let board = runtime.board();
    assert_eq!(
        board.find_task("Viewers", "Alice", None).unwrap().status,
        TaskStatus::Completed
    );
    assert_eq!(board.progress_points, 1);

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn submissions_from_many_sources_are_all_applied() {
    let mut runtime = started().await;

    let mut handles = Vec::new();
    for i in 0..20 {
        let sender = runtime.sender();
        handles.push(tokio::spawn(async move {
            sender
                .submit(format!("!task job {i}"), User::viewer(format!("user{i}")))
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let board = runtime.board();
    assert_eq!(board.count_status(TaskStatus::Pending), 20);
    assert_eq!(board.version, 20);

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn dropped_view_stops_its_task() {
    let mut runtime = started().await;
    let view = runtime.attach_polled(OverlayProjector);
    assert!(view.is_running());
    drop(view);
    runtime.shutdown().await.unwrap();
}
