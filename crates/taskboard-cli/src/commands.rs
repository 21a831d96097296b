//! Non-interactive subcommands.

use std::io::Write;
use std::path::Path;

use tracing::info;

use taskboard_core::BoardConfig;

use crate::error::Result;
use crate::session::{Outcome, Session};

/// Feeds every line of `script` through `session`, writing output to `out`.
///
/// Lines starting with `#` are comments. Stops early at `/quit`.
pub fn run_script(session: &mut Session, script: &Path, out: &mut impl Write) -> Result<usize> {
    let content = std::fs::read_to_string(script)?;
    let mut handled = 0;
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        handled += 1;
        match session.handle_line(line)? {
            Outcome::Output(text) => writeln!(out, "{}", text)?,
            Outcome::Silent => {}
            Outcome::Quit => break,
        }
    }
    info!(path = %script.display(), lines = handled, "script finished");
    Ok(handled)
}

/// Writes the effective config as pretty JSON.
pub fn print_config(config: &BoardConfig, out: &mut impl Write) -> Result<()> {
    writeln!(out, "{}", serde_json::to_string_pretty(config)?)?;
    Ok(())
}
