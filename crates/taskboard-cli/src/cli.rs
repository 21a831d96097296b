//! Command-line interface definition using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use taskboard_models::{Role, User};

/// Taskboard - live chat-command task lists
#[derive(Parser, Debug)]
#[command(name = "taskboard")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to the board config file
    #[arg(short, long, env = "TASKBOARD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print views as JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Chat name to act as
    #[arg(short, long, default_value = "streamer")]
    pub user: String,

    /// Role claimed by that user (viewer, mod)
    #[arg(short, long, default_value = "mod")]
    pub role: Role,

    /// Overlay refresh interval in milliseconds
    #[arg(long, default_value_t = 1000)]
    pub poll_ms: u64,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start interactive REPL mode
    Repl,

    /// Feed a file of REPL lines through the board and print the output
    Run {
        /// Script path; one chat line or slash command per line
        #[arg(required = true)]
        script: PathBuf,
    },

    /// Print the effective board config as JSON
    Config,
}

impl Cli {
    /// Returns the log level based on verbosity.
    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }

    /// The identity lines are submitted as until `/as` changes it.
    pub fn identity(&self) -> User {
        User::new(self.user.clone(), self.role)
    }

    /// Overlay refresh interval.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_ms.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parse_no_args() {
        let cli = Cli::parse_from(["taskboard"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.identity(), User::moderator("streamer"));
        assert_eq!(cli.poll_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_cli_parse_identity() {
        let cli = Cli::parse_from(["taskboard", "--user", "Alice", "--role", "viewer", "--json"]);
        assert_eq!(cli.identity(), User::viewer("Alice"));
        assert!(cli.json);
    }

    #[test]
    fn test_cli_parse_run() {
        let cli = Cli::parse_from(["taskboard", "run", "demo.txt"]);
        match cli.command {
            Some(Commands::Run { script }) => assert_eq!(script, PathBuf::from("demo.txt")),
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_role() {
        assert!(Cli::try_parse_from(["taskboard", "--role", "admin"]).is_err());
    }

    #[test]
    fn test_verbosity() {
        let cli = Cli::parse_from(["taskboard", "-vv"]);
        assert_eq!(cli.log_level(), tracing::Level::DEBUG);
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }
}
