//! A running board driven from synchronous terminal code.

use chrono::Utc;
use tracing::debug;

use taskboard_commands::{tokenize, Command, Verb};
use taskboard_core::{BoardConfig, CommandProcessor};
use taskboard_models::{Role, TaskStatus, User};
use taskboard_runtime::{CommandSender, Runtime, RuntimeConfig, RuntimeError, ViewHandle};
use taskboard_views::{
    ManagementQuery, ManagementView, OverlayProjector, OverlayView, Projector, TaskAction,
    WidgetProjector, WidgetView,
};

use crate::error::Result;
use crate::render;

/// A parsed line of terminal input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    /// `/as <name> [role]`
    As { name: String, role: Role },
    /// `/widget`
    Widget,
    /// `/manage [list] [status]`
    Manage {
        list: Option<String>,
        status: Option<TaskStatus>,
    },
    /// `/overlay`
    Overlay,
    /// `/approve <n>`, `/reject <n>`, `/complete <n>` on the managed list
    Action { action: TaskAction, position: usize },
    /// `/addlist <name>`
    AddList(String),
    /// `/sweep`
    Sweep,
    /// `/whoami`
    WhoAmI,
    /// `/help`
    Help,
    /// `/quit`
    Quit,
    /// Anything not starting with `/` is a chat line.
    Chat(String),
    /// Malformed slash command, with a message for the user.
    Invalid(String),
    Empty,
}

impl ReplCommand {
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        if input.is_empty() {
            return ReplCommand::Empty;
        }
        let Some(rest) = input.strip_prefix('/') else {
            return ReplCommand::Chat(input.to_string());
        };

        let (cmd, args) = match rest.split_once(char::is_whitespace) {
            Some((cmd, args)) => (cmd, args.trim()),
            None => (rest, ""),
        };
        let tokens = match tokenize(args) {
            Ok(tokens) => tokens,
            Err(e) => return ReplCommand::Invalid(e.to_string()),
        };

        match cmd.to_lowercase().as_str() {
            "as" => {
                let Some(name) = tokens.first() else {
                    return ReplCommand::Invalid("Usage: /as <name> [viewer|mod]".into());
                };
                let role = match tokens.get(1).map(|r| r.parse::<Role>()) {
                    None => Role::Viewer,
                    Some(Ok(role)) => role,
                    Some(Err(e)) => return ReplCommand::Invalid(e),
                };
                ReplCommand::As {
                    name: name.clone(),
                    role,
                }
            }
            "widget" | "w" => ReplCommand::Widget,
            "overlay" | "o" => ReplCommand::Overlay,
            "manage" | "m" => {
                let status = match tokens.get(1).map(|s| s.parse::<TaskStatus>()) {
                    None => None,
                    Some(Ok(status)) => Some(status),
                    Some(Err(_)) => {
                        return ReplCommand::Invalid(format!("Unknown status: {}", tokens[1]))
                    }
                };
                ReplCommand::Manage {
                    list: tokens.first().cloned(),
                    status,
                }
            }
            "approve" | "reject" | "complete" => {
                let action = match cmd.to_lowercase().as_str() {
                    "approve" => TaskAction::Approve,
                    "reject" => TaskAction::Reject,
                    _ => TaskAction::Complete,
                };
                match tokens.first().and_then(|n| n.parse::<usize>().ok()) {
                    Some(position) if position > 0 => ReplCommand::Action { action, position },
                    _ => ReplCommand::Invalid(format!("Usage: /{} <row>", cmd.to_lowercase())),
                }
            }
            "addlist" => {
                if args.is_empty() {
                    ReplCommand::Invalid("Usage: /addlist <name>".into())
                } else {
                    ReplCommand::AddList(tokens.join(" "))
                }
            }
            "sweep" => ReplCommand::Sweep,
            "whoami" => ReplCommand::WhoAmI,
            "help" | "h" | "?" => ReplCommand::Help,
            "quit" | "exit" | "q" => ReplCommand::Quit,
            other => ReplCommand::Invalid(format!("Unknown command: /{}", other)),
        }
    }
}

/// What the caller should do after a line was handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Print this and keep reading.
    Output(String),
    /// Nothing to print.
    Silent,
    /// Stop reading input.
    Quit,
}

/// Owns a tokio runtime, the board runtime and the terminal's live views.
pub struct Session {
    board: Runtime,
    sender: CommandSender,
    widget: ViewHandle<WidgetView>,
    overlay: ViewHandle<OverlayView>,
    identity: User,
    managed: ManagementQuery,
    json: bool,
    rt: tokio::runtime::Runtime,
}

impl Session {
    /// Starts the board and attaches the widget (pushed) and overlay (polled).
    pub fn start(
        config: BoardConfig,
        runtime_config: RuntimeConfig,
        identity: User,
    ) -> Result<Self> {
        let rt = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;

        let widget_projector = WidgetProjector::new(config.tiers);
        let managed =
            ManagementQuery::new(identity.role).with_list(config.default_list_name.clone());
        let mut board = Runtime::new(CommandProcessor::seeded(config), runtime_config);

        let (widget, overlay) = rt.block_on(async {
            board.start().await?;
            Ok::<_, RuntimeError>((
                board.attach_pushed(widget_projector),
                board.attach_polled(OverlayProjector),
            ))
        })?;
        let sender = board.sender();

        Ok(Self {
            board,
            sender,
            widget,
            overlay,
            identity,
            managed,
            json: false,
            rt,
        })
    }

    /// Print views as JSON instead of text.
    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    /// The identity chat lines are submitted as.
    pub fn identity(&self) -> &User {
        &self.identity
    }

    /// Handles one line of input.
    pub fn handle_line(&mut self, line: &str) -> Result<Outcome> {
        self.handle(ReplCommand::parse(line))
    }

    pub fn handle(&mut self, command: ReplCommand) -> Result<Outcome> {
        debug!(?command, user = %self.identity.name, "handling repl command");
        let outcome = match command {
            ReplCommand::Empty => Outcome::Silent,
            ReplCommand::Quit => Outcome::Quit,
            ReplCommand::Help => Outcome::Output(help_text()),
            ReplCommand::Invalid(msg) => Outcome::Output(msg),
            ReplCommand::WhoAmI => Outcome::Output(format!(
                "{} ({})",
                self.identity.name, self.identity.role
            )),
            ReplCommand::As { name, role } => {
                self.identity = User::new(name, role);
                self.managed.viewer_role = role;
                Outcome::Output(format!("Now chatting as {} ({}).", self.identity.name, role))
            }
            ReplCommand::Chat(line) => {
                let submitted = self
                    .rt
                    .block_on(self.sender.submit(line, self.identity.clone()));
                match feedback(submitted.map(|applied| applied.map(|a| a.feedback)))? {
                    Some(text) => Outcome::Output(text),
                    None => Outcome::Silent,
                }
            }
            ReplCommand::Widget => {
                Outcome::Output(self.show(&self.widget.latest(), render::widget)?)
            }
            ReplCommand::Overlay => {
                Outcome::Output(self.show(&self.overlay.latest(), render::overlay)?)
            }
            ReplCommand::Manage { list, status } => {
                if let Some(list) = list {
                    self.managed.list = Some(list);
                }
                self.managed.status = status;
                let view = self.management();
                Outcome::Output(self.show(&view, render::management)?)
            }
            ReplCommand::Action { action, position } => {
                Outcome::Output(self.act(action, position)?)
            }
            ReplCommand::AddList(name) => {
                let command = Command::action(Verb::AddList, [name], self.identity.clone());
                let applied = self.rt.block_on(self.sender.submit_command(command));
                Outcome::Output(feedback(applied.map(|a| Some(a.feedback)))?.unwrap_or_default())
            }
            ReplCommand::Sweep => {
                let swept = self.rt.block_on(self.sender.sweep(Utc::now()))?;
                Outcome::Output(match swept {
                    Some(applied) => format!("Sweep applied ({}).", applied.change.kind()),
                    None => "No idle tasks.".to_string(),
                })
            }
        };
        Ok(outcome)
    }

    fn management(&self) -> ManagementView {
        self.managed.project(&self.board.board())
    }

    fn act(&self, action: TaskAction, position: usize) -> Result<String> {
        let view = self.management();
        let Some(row) = view.rows.iter().find(|r| r.task.position == position) else {
            return Ok(format!("No row {} in the managed list.", position));
        };
        let Some(command) = row.command(action, self.identity.clone()) else {
            return Ok(format!(
                "{} is not available on row {}.",
                action.label(),
                position
            ));
        };
        let applied = self.rt.block_on(self.sender.submit_command(command));
        Ok(feedback(applied.map(|a| Some(a.feedback)))?.unwrap_or_default())
    }

    fn show<V: serde::Serialize>(&self, view: &V, text: fn(&V) -> String) -> Result<String> {
        if self.json {
            Ok(serde_json::to_string_pretty(view)?)
        } else {
            Ok(text(view))
        }
    }

    /// Waits for the overlay to catch up with the current board.
    pub fn sync_overlay(&mut self) -> Result<OverlayView> {
        let version = self.board.board().version;
        Ok(self.rt.block_on(self.overlay.wait_for(version))?)
    }

    /// Stops the views and the board runtime.
    pub fn close(self) -> Result<()> {
        let Session {
            mut board,
            widget,
            overlay,
            rt,
            ..
        } = self;
        rt.block_on(async move {
            widget.stop().await?;
            overlay.stop().await?;
            board.shutdown().await
        })?;
        Ok(())
    }
}

/// Command rejections are feedback for the user, not CLI failures.
fn feedback(
    result: std::result::Result<Option<String>, RuntimeError>,
) -> Result<Option<String>> {
    match result {
        Ok(text) => Ok(text),
        Err(RuntimeError::Command(e)) => Ok(Some(e.to_string())),
        Err(e) => Err(e.into()),
    }
}

/// Help table for slash commands.
pub struct CommandHelp {
    pub name: &'static str,
    pub args: &'static str,
    pub description: &'static str,
}

pub const COMMANDS: &[CommandHelp] = &[
    CommandHelp {
        name: "as",
        args: "<name> [viewer|mod]",
        description: "Chat as another user",
    },
    CommandHelp {
        name: "widget",
        args: "",
        description: "Show the task list widget",
    },
    CommandHelp {
        name: "manage",
        args: "[list] [status]",
        description: "Show the management panel",
    },
    CommandHelp {
        name: "overlay",
        args: "",
        description: "Show the overlay feed",
    },
    CommandHelp {
        name: "approve",
        args: "<row>",
        description: "Approve a row of the managed list",
    },
    CommandHelp {
        name: "reject",
        args: "<row>",
        description: "Reject a row of the managed list",
    },
    CommandHelp {
        name: "complete",
        args: "<row>",
        description: "Complete a row of the managed list",
    },
    CommandHelp {
        name: "addlist",
        args: "<name>",
        description: "Create a list",
    },
    CommandHelp {
        name: "sweep",
        args: "",
        description: "Mark idle owners offline now",
    },
    CommandHelp {
        name: "whoami",
        args: "",
        description: "Show the current identity",
    },
    CommandHelp {
        name: "help",
        args: "",
        description: "Show this help",
    },
    CommandHelp {
        name: "quit",
        args: "",
        description: "Exit",
    },
];

fn help_text() -> String {
    let mut lines =
        vec!["Type a chat line (e.g. !task Fix the bug) or a slash command:".to_string()];
    for cmd in COMMANDS {
        let usage = if cmd.args.is_empty() {
            format!("/{}", cmd.name)
        } else {
            format!("/{} {}", cmd.name, cmd.args)
        };
        lines.push(format!("  {:<28} {}", usage, cmd.description));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::start(
            BoardConfig::default(),
            RuntimeConfig::new(),
            User::moderator("streamer"),
        )
        .expect("session starts")
    }

    fn output(outcome: Outcome) -> String {
        match outcome {
            Outcome::Output(text) => text,
            other => panic!("expected output, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_chat_and_commands() {
        assert_eq!(ReplCommand::parse("  "), ReplCommand::Empty);
        assert_eq!(
            ReplCommand::parse("!task Fix bug"),
            ReplCommand::Chat("!task Fix bug".into())
        );
        assert_eq!(
            ReplCommand::parse("/as Alice"),
            ReplCommand::As {
                name: "Alice".into(),
                role: Role::Viewer
            }
        );
        assert_eq!(
            ReplCommand::parse("/manage 'Stream Goals' approved"),
            ReplCommand::Manage {
                list: Some("Stream Goals".into()),
                status: Some(TaskStatus::Approved)
            }
        );
        assert_eq!(
            ReplCommand::parse("/complete 2"),
            ReplCommand::Action {
                action: TaskAction::Complete,
                position: 2
            }
        );
        assert!(matches!(ReplCommand::parse("/complete 0"), ReplCommand::Invalid(_)));
        assert!(matches!(ReplCommand::parse("/as Bob admin"), ReplCommand::Invalid(_)));
        assert!(matches!(ReplCommand::parse("/bogus"), ReplCommand::Invalid(_)));
        assert_eq!(ReplCommand::parse("/q"), ReplCommand::Quit);
    }

    #[test]
    fn test_submit_and_approve_from_panel() {
        let mut session = session();
        session.handle_line("/as Alice viewer").unwrap();
        let text = output(session.handle_line("!task Fix the bug").unwrap());
        assert_eq!(text, "@Alice, your task has been submitted for approval!");

        let denied = output(session.handle_line("!approve Alice").unwrap());
        assert_eq!(denied, "!approve requires mod role");

        session.handle_line("/as streamer mod").unwrap();
        let panel = output(session.handle_line("/manage Viewers").unwrap());
        assert!(panel.contains("Fix the bug (@Alice)"));
        assert!(panel.contains("[Approve]"));

        let approved = output(session.handle_line("/approve 1").unwrap());
        assert_eq!(approved, "@Alice's task has been approved and added to the list!");

        let overlay = session.sync_overlay().unwrap();
        assert_eq!(overlay.items.iter().filter(|i| i.task.description == "Fix the bug").count(), 1);
        session.close().unwrap();
    }

    #[test]
    fn test_plain_chat_is_silent() {
        let mut session = session();
        assert_eq!(session.handle_line("hello chat").unwrap(), Outcome::Silent);
        session.close().unwrap();
    }

    #[test]
    fn test_addlist_shows_on_widget() {
        let mut session = session();
        let created = output(session.handle_line("/addlist Side Quests").unwrap());
        assert_eq!(created, "List \"Side Quests\" created.");
        let widget = output(session.handle_line("/widget").unwrap());
        assert!(widget.contains("== Side Quests =="));
        session.close().unwrap();
    }

    #[test]
    fn test_action_not_offered() {
        let mut session = session();
        let text = output(session.handle_line("/manage 'Stream Goals'").unwrap());
        assert!(text.contains("[Complete]"));
        let text = output(session.handle_line("/approve 1").unwrap());
        assert_eq!(text, "Approve is not available on row 1.");
        let text = output(session.handle_line("/complete 9").unwrap());
        assert_eq!(text, "No row 9 in the managed list.");
        session.close().unwrap();
    }

    #[test]
    fn test_json_output() {
        let mut session = session().with_json(true);
        let text = output(session.handle_line("/widget").unwrap());
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert!(value["lists"].is_array());
        session.close().unwrap();
    }

    #[test]
    fn test_help_lists_every_command() {
        let help = help_text();
        for cmd in COMMANDS {
            assert!(help.contains(&format!("/{}", cmd.name)));
        }
    }
}
