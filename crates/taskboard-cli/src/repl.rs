//! Interactive REPL: chat lines go to the board, slash commands drive the views.

use std::path::PathBuf;

use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use tracing::debug;

use crate::error::Result;
use crate::session::{Outcome, Session, COMMANDS};

/// Tab completion for slash commands.
struct CommandCompleter;

impl Completer for CommandCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        if !line.starts_with('/') {
            return Ok((0, vec![]));
        }

        let prefix = &line[..pos];
        let matches: Vec<Pair> = COMMANDS
            .iter()
            .map(|cmd| format!("/{}", cmd.name))
            .filter(|cmd| cmd.starts_with(prefix))
            .map(|cmd| Pair {
                display: cmd.clone(),
                replacement: cmd,
            })
            .collect();

        Ok((0, matches))
    }
}

impl Hinter for CommandCompleter {
    type Hint = String;
}

impl Highlighter for CommandCompleter {}
impl Validator for CommandCompleter {}
impl Helper for CommandCompleter {}

/// Interactive REPL over a [`Session`].
pub struct Repl {
    editor: Editor<CommandCompleter, DefaultHistory>,
    history_path: Option<PathBuf>,
    session: Session,
}

impl Repl {
    /// Creates a REPL, loading history from `~/.taskboard/repl_history.txt`.
    pub fn new(session: Session) -> Result<Self> {
        let config = rustyline::Config::builder()
            .completion_type(rustyline::CompletionType::List)
            .build();
        let mut editor = Editor::with_config(config)?;
        editor.set_helper(Some(CommandCompleter));

        let history_path =
            dirs::home_dir().map(|home| home.join(".taskboard").join("repl_history.txt"));
        if let Some(path) = history_path.as_ref().filter(|p| p.exists()) {
            let _ = editor.load_history(path);
        }

        Ok(Self {
            editor,
            history_path,
            session,
        })
    }

    /// Runs the REPL loop until `/quit` or end of input, then closes the session.
    pub fn run(mut self) -> Result<()> {
        println!("Taskboard REPL v{}", env!("CARGO_PKG_VERSION"));
        println!("Type /help for commands, /quit to exit");
        println!();

        loop {
            let prompt = format!("{}> ", self.session.identity().name);

            match self.editor.readline(&prompt) {
                Ok(line) => {
                    self.editor.add_history_entry(&line)?;

                    match self.session.handle_line(&line) {
                        Ok(Outcome::Output(text)) => println!("{}", text),
                        Ok(Outcome::Silent) => {}
                        Ok(Outcome::Quit) => break,
                        Err(e) => eprintln!("Error: {}", e),
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                }
                Err(ReadlineError::Eof) => {
                    println!("^D");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        if let Some(path) = &self.history_path {
            if let Some(dir) = path.parent() {
                let _ = std::fs::create_dir_all(dir);
            }
            if let Err(e) = self.editor.save_history(path) {
                debug!(error = %e, "failed to save history");
            }
        }

        self.session.close()?;
        println!("Goodbye!");
        Ok(())
    }
}
