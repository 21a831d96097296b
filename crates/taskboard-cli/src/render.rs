//! Plain-text rendering of view models for the terminal.

use std::fmt::Write;

use taskboard_models::{Activity, Progress};
use taskboard_views::{ManagementView, OverlayView, TaskRow, WidgetView};

const BAR_WIDTH: usize = 20;

/// Strikes text through with combining long stroke overlays.
pub fn strike(text: &str) -> String {
    text.chars().flat_map(|c| [c, '\u{0336}']).collect()
}

/// `[#######.............] 3/10 (30%) tier 1`
pub fn progress_bar(progress: &Progress) -> String {
    let filled = ((progress.percent / 100.0) * BAR_WIDTH as f32).round() as usize;
    let filled = filled.min(BAR_WIDTH);
    format!(
        "[{}{}] {}/{} ({:.0}%) tier {}",
        "#".repeat(filled),
        ".".repeat(BAR_WIDTH - filled),
        progress.points,
        progress.max,
        progress.percent,
        progress.tier
    )
}

fn describe(row: &TaskRow, struck: bool) -> String {
    let mut line = if struck {
        strike(&row.description)
    } else {
        row.description.clone()
    };
    if let Some(owner) = &row.owner {
        let _ = write!(line, " (@{})", owner);
    }
    match row.activity {
        Activity::Active => {}
        Activity::Paused => line.push_str(" [paused]"),
        Activity::Offline => line.push_str(" [offline]"),
    }
    line
}

/// Renders the widget: one heading per list, then the progress bar.
pub fn widget(view: &WidgetView) -> String {
    let mut out = String::new();
    for list in &view.lists {
        let _ = writeln!(out, "== {} ==", list.heading);
        if list.tasks.is_empty() {
            out.push_str("  (no tasks)\n");
        }
        for row in &list.tasks {
            let _ = writeln!(
                out,
                "  {:>2}. [{}] {}",
                row.position,
                row.status,
                describe(row, row.is_completed())
            );
        }
    }
    let _ = write!(out, "{}  v{}", progress_bar(&view.progress), view.version);
    out
}

/// Renders the management panel with the actions each row offers.
pub fn management(view: &ManagementView) -> String {
    let mut out = String::new();
    let lists: Vec<String> = view
        .available_lists
        .iter()
        .map(|name| {
            if view.selected.as_deref() == Some(name.as_str()) {
                format!("*{}", name)
            } else {
                name.clone()
            }
        })
        .collect();
    let _ = writeln!(out, "Lists: {}", lists.join(" | "));
    let filter = view
        .status_filter
        .map(|s| s.to_string())
        .unwrap_or_else(|| "all".to_string());
    let _ = writeln!(out, "Filter: {}  v{}", filter, view.version);

    match &view.selected {
        None => out.push_str("  (list not found)"),
        Some(_) if view.rows.is_empty() => out.push_str("  (no tasks)"),
        Some(_) => {
            let lines: Vec<String> = view
                .rows
                .iter()
                .map(|row| {
                    let actions: Vec<String> =
                        row.actions.iter().map(|a| format!("[{}]", a.label())).collect();
                    format!(
                        "  {:>2}. [{}] {}  {}",
                        row.task.position,
                        row.task.status,
                        describe(&row.task, false),
                        actions.join(" ")
                    )
                    .trim_end()
                    .to_string()
                })
                .collect();
            out.push_str(&lines.join("\n"));
        }
    }
    out
}

/// Renders the overlay feed.
pub fn overlay(view: &OverlayView) -> String {
    let mut out = String::new();
    for item in &view.items {
        let _ = writeln!(
            out,
            "  {} | {}",
            item.task.list_name,
            describe(&item.task, item.struck_through)
        );
    }
    if view.items.is_empty() {
        out.push_str("  (empty)\n");
    }
    let _ = write!(out, "v{}", view.version);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskboard_models::{Board, Role, Task, TaskStatus, TierThresholds};
    use taskboard_views::{ManagementQuery, OverlayProjector, Projector, WidgetProjector};

    fn board() -> Board {
        let mut board = Board::seeded("Session Goals", "Viewers");
        let mut done = Task::new("Viewers", "Ship it", Some("alice".into()), TaskStatus::Approved);
        done.sequence = 7;
        done.advance(TaskStatus::Completed);
        let mut pending =
            Task::new("Viewers", "Review PR", Some("bob".into()), TaskStatus::Pending);
        pending.sequence = 8;
        if let Some(list) = board.list_mut("Viewers") {
            list.tasks.push(done);
            list.tasks.push(pending);
        }
        board
    }

    #[test]
    fn test_strike() {
        assert_eq!(strike("ab"), "a\u{0336}b\u{0336}");
        assert_eq!(strike(""), "");
    }

    #[test]
    fn test_progress_bar() {
        let progress = Progress::new(5, &TierThresholds::default());
        let bar = progress_bar(&progress);
        assert!(bar.starts_with('['));
        assert!(bar.contains(&format!("5/{}", progress.max)));
    }

    #[test]
    fn test_widget_strikes_completed_tasks() {
        let view = WidgetProjector::default().project(&board());
        let text = widget(&view);
        assert!(text.contains("== Session Goals =="));
        assert!(text.contains(&strike("Ship it")));
        assert!(text.contains("Review PR (@bob)"));
    }

    #[test]
    fn test_management_lists_actions() {
        let view = ManagementQuery::new(Role::Mod)
            .with_list("Viewers")
            .project(&board());
        let text = management(&view);
        assert!(text.contains("*Viewers"));
        assert!(text.contains("[Approve]"));
        assert!(text.contains("Filter: all"));
    }

    #[test]
    fn test_management_missing_list() {
        let view = ManagementQuery::new(Role::Mod)
            .with_list("Nope")
            .project(&board());
        assert!(management(&view).contains("(list not found)"));
    }

    #[test]
    fn test_overlay_hides_pending() {
        let view = OverlayProjector.project(&board());
        let text = overlay(&view);
        assert!(!text.contains("Review PR"));
        assert!(text.contains(&strike("Ship it")));
    }
}
