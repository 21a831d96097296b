//! Issuer identity attached to every command.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Authorization level of a command issuer.
///
/// `Viewer < Mod`; anything a viewer may do, a moderator may do too.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Regular chat participant.
    #[default]
    Viewer,
    /// Moderator (the broadcaster is treated as one).
    Mod,
}

impl Role {
    /// Returns true if this role is at least `minimum`.
    pub fn satisfies(self, minimum: Role) -> bool {
        self >= minimum
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Viewer => f.write_str("viewer"),
            Role::Mod => f.write_str("mod"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "viewer" => Ok(Role::Viewer),
            "mod" | "moderator" | "broadcaster" => Ok(Role::Mod),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

/// The issuer of a command, rebuilt for every invocation.
///
/// The role is an unverified claim supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Display name.
    pub name: String,
    /// Claimed role.
    pub role: Role,
}

impl User {
    /// Creates a new user.
    pub fn new(name: impl Into<String>, role: Role) -> Self {
        Self {
            name: name.into(),
            role,
        }
    }

    /// Creates a viewer.
    pub fn viewer(name: impl Into<String>) -> Self {
        Self::new(name, Role::Viewer)
    }

    /// Creates a moderator.
    pub fn moderator(name: impl Into<String>) -> Self {
        Self::new(name, Role::Mod)
    }
}
