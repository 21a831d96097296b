//! Authorization gate: the single role policy for every verb.
//!
//! The gate is a pure function of `(verb, role)`. It never consults the
//! board and never verifies identity; the role on a command is whatever
//! the caller claimed.

use std::fmt;

use taskboard_models::Role;
use tracing::debug;

use crate::command::{Command, Verb};

/// Minimum role per verb. This table is the only place roles are decided.
pub const POLICY: [(Verb, Role); 9] = [
    (Verb::Task, Role::Viewer),
    (Verb::Status, Role::Viewer),
    (Verb::Approve, Role::Mod),
    (Verb::AddTask, Role::Mod),
    (Verb::Complete, Role::Mod),
    (Verb::Reject, Role::Mod),
    (Verb::DoneTask, Role::Mod),
    (Verb::AddList, Role::Mod),
    (Verb::DeleteList, Role::Mod),
];

/// Why a command was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DenyReason {
    /// The verb is not in the policy table.
    UnknownCommand(String),
    /// The issuer's role is below the verb's minimum.
    InsufficientRole {
        /// The verb that was refused.
        verb: Verb,
        /// Minimum role the verb needs.
        required: Role,
        /// Role the issuer claimed.
        actual: Role,
    },
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DenyReason::UnknownCommand(verb) => write!(f, "unknown command: !{}", verb),
            DenyReason::InsufficientRole {
                verb,
                required,
                actual,
            } => write!(f, "{} requires {} (you are {})", verb, required, actual),
        }
    }
}

/// Verdict for a `(verb, role)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authorization {
    /// The command may proceed.
    Authorized,
    /// The command must be rejected.
    Denied(DenyReason),
}

impl Authorization {
    /// Returns true if the verdict allows the command.
    pub fn is_authorized(&self) -> bool {
        matches!(self, Authorization::Authorized)
    }
}

/// A command that passed the gate.
///
/// Only [`authorize`] can build one, so holding it is proof of permission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizedCommand {
    verb: Verb,
    command: Command,
}

impl AuthorizedCommand {
    /// The resolved verb.
    pub fn verb(&self) -> Verb {
        self.verb
    }

    /// The underlying command.
    pub fn command(&self) -> &Command {
        &self.command
    }

    /// Consumes the token, returning the command.
    pub fn into_command(self) -> Command {
        self.command
    }
}

/// Returns the minimum role for a verb name, `None` if the verb is unknown.
pub fn minimum_role(verb: &str) -> Option<Role> {
    let verb = Verb::from_name(verb)?;
    POLICY
        .iter()
        .find(|(v, _)| *v == verb)
        .map(|(_, role)| *role)
}

/// Decides whether `role` may issue `verb`.
pub fn check(verb: &str, role: Role) -> Authorization {
    let (Some(known), Some(required)) = (Verb::from_name(verb), minimum_role(verb)) else {
        return Authorization::Denied(DenyReason::UnknownCommand(verb.to_string()));
    };

    if role.satisfies(required) {
        Authorization::Authorized
    } else {
        Authorization::Denied(DenyReason::InsufficientRole {
            verb: known,
            required,
            actual: role,
        })
    }
}

/// Runs a parsed command through the gate.
pub fn authorize(command: Command) -> Result<AuthorizedCommand, DenyReason> {
    match check(&command.verb, command.issuer.role) {
        Authorization::Authorized => {
            // check() only authorizes verbs that resolve
            let verb = command
                .known_verb()
                .ok_or_else(|| DenyReason::UnknownCommand(command.verb.clone()))?;
            Ok(AuthorizedCommand { verb, command })
        }
        Authorization::Denied(reason) => {
            debug!(
                verb = %command.verb,
                issuer = %command.issuer.name,
                role = %command.issuer.role,
                reason = %reason,
                "command denied"
            );
            Err(reason)
        }
    }
}
