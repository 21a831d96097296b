//! Parsed command values.

use serde::{Deserialize, Serialize};
use std::fmt;

use taskboard_models::User;

/// Verbs the board understands.
///
/// Matching against the raw text is case-sensitive: `!task` is known,
/// `!Task` is not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verb {
    /// `!task <description>`: request a task for yourself.
    Task,
    /// `!approve <user> [<list> <task>]`: approve a user's pending task.
    Approve,
    /// `!addtask <list> <description...>`: insert an approved task.
    AddTask,
    /// `!complete <list> <task-id | position>`: complete an approved task.
    Complete,
    /// `!reject <user> [<list> <task>]`: drop a user's pending task.
    Reject,
    /// `!donetask <user>`: complete a user's approved task.
    DoneTask,
    /// `!status <complete|done|pause|resume>`: act on your own task.
    Status,
    /// `!addlist <name> [summary]`: create a list.
    AddList,
    /// `!deletelist <name>`: remove a list.
    DeleteList,
}

impl Verb {
    /// Every known verb.
    pub const ALL: [Verb; 9] = [
        Verb::Task,
        Verb::Approve,
        Verb::AddTask,
        Verb::Complete,
        Verb::Reject,
        Verb::DoneTask,
        Verb::Status,
        Verb::AddList,
        Verb::DeleteList,
    ];

    /// The name typed after `!`.
    pub fn name(self) -> &'static str {
        match self {
            Verb::Task => "task",
            Verb::Approve => "approve",
            Verb::AddTask => "addtask",
            Verb::Complete => "complete",
            Verb::Reject => "reject",
            Verb::DoneTask => "donetask",
            Verb::Status => "status",
            Verb::AddList => "addlist",
            Verb::DeleteList => "deletelist",
        }
    }

    /// Resolves a verb by exact, case-sensitive name.
    pub fn from_name(name: &str) -> Option<Verb> {
        Verb::ALL.into_iter().find(|v| v.name() == name)
    }

    /// Usage line shown when arguments are missing.
    pub fn usage(self) -> &'static str {
        match self {
            Verb::Task => "!task <YourTaskDescription>",
            Verb::Approve => "!approve <username> [<ListName> <task-id|position>]",
            Verb::AddTask => "!addtask <ListName> <TaskDescription>",
            Verb::Complete => "!complete <ListName> <task-id|position>",
            Verb::Reject => "!reject <username> [<ListName> <task-id|position>]",
            Verb::DoneTask => "!donetask <username>",
            Verb::Status => "!status <complete|done|pause|resume>",
            Verb::AddList => "!addlist <ListName> [Summary]",
            Verb::DeleteList => "!deletelist <ListName>",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "!{}", self.name())
    }
}

/// A parsed command. Consumed once by the processor and then discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Verb exactly as typed, without the `!`.
    pub verb: String,
    /// Positional arguments; quoted substrings arrive as single arguments.
    pub args: Vec<String>,
    /// Who issued it.
    pub issuer: User,
}

impl Command {
    /// Creates a command from parts.
    pub fn new(verb: impl Into<String>, args: Vec<String>, issuer: User) -> Self {
        Self {
            verb: verb.into(),
            args,
            issuer,
        }
    }

    /// Builds a command for a known verb, e.g. from a UI action.
    pub fn action<I, S>(verb: Verb, args: I, issuer: User) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(verb.name(), args.into_iter().map(Into::into).collect(), issuer)
    }

    /// Resolves the typed verb, if it is one the board knows.
    pub fn known_verb(&self) -> Option<Verb> {
        Verb::from_name(&self.verb)
    }

    /// Returns the argument at `index`, ignoring empty strings.
    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args
            .get(index)
            .map(String::as_str)
            .filter(|a| !a.trim().is_empty())
    }

    /// Joins every argument from `index` on with single spaces.
    pub fn rest_from(&self, index: usize) -> Option<String> {
        let rest = self.args.get(index..)?.join(" ");
        let rest = rest.trim();
        if rest.is_empty() {
            None
        } else {
            Some(rest.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verb_names_round_trip() {
        for verb in Verb::ALL {
            assert_eq!(Verb::from_name(verb.name()), Some(verb));
        }
    }

    #[test]
    fn test_verb_lookup_is_case_sensitive() {
        assert_eq!(Verb::from_name("approve"), Some(Verb::Approve));
        assert_eq!(Verb::from_name("Approve"), None);
        assert_eq!(Verb::from_name("APPROVE"), None);
    }

    #[test]
    fn test_rest_from_joins_arguments() {
        let cmd = Command::new(
            "addtask",
            vec!["Stream Goals".into(), "Beat".into(), "the boss".into()],
            User::moderator("m"),
        );
        assert_eq!(cmd.arg(0), Some("Stream Goals"));
        assert_eq!(cmd.rest_from(1).as_deref(), Some("Beat the boss"));
        assert_eq!(cmd.rest_from(3), None);
        assert_eq!(cmd.rest_from(7), None);
    }

    #[test]
    fn test_arg_skips_blank() {
        let cmd = Command::new("approve", vec!["".into()], User::moderator("m"));
        assert_eq!(cmd.arg(0), None);
    }
}
