//! Tokenizer for `!verb arg "quoted arg" ...` chat commands.

use std::sync::LazyLock;

use regex::Regex;
use taskboard_models::User;
use tracing::trace;

use crate::command::Command;
use crate::error::{ParseError, Result};

/// Prefix that marks a chat line as a command.
pub const COMMAND_PREFIX: char = '!';

static VERB_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("Invalid verb regex"));

/// Returns true if the chat line is meant as a command.
pub fn is_command(input: &str) -> bool {
    input.trim_start().starts_with(COMMAND_PREFIX)
}

/// Parses a raw chat line into a [`Command`] issued by `issuer`.
///
/// The verb and arguments keep their case. Whether the verb is one the
/// board knows is decided later by the gate, not here.
pub fn parse(input: &str, issuer: User) -> Result<Command> {
    let start = input.len() - input.trim_start().len();
    let line = input.trim();
    if line.is_empty() {
        return Err(ParseError::Empty);
    }

    let body = line
        .strip_prefix(COMMAND_PREFIX)
        .ok_or(ParseError::MissingPrefix)?;

    let verb_end = body.find(char::is_whitespace).unwrap_or(body.len());
    let verb = &body[..verb_end];
    if !VERB_PATTERN.is_match(verb) {
        return Err(ParseError::InvalidVerb(verb.to_string()));
    }

    let offset = start + COMMAND_PREFIX.len_utf8() + verb_end;
    let args = tokenize_at(&body[verb_end..], offset)?;

    trace!(verb = %verb, args = ?args, issuer = %issuer.name, "parsed command");

    Ok(Command::new(verb, args, issuer))
}

/// Splits text on whitespace, keeping single- or double-quoted runs together.
///
/// Quotes are stripped. A quoted run glued to other characters joins the
/// same argument, so `a"b c"` yields `ab c`.
pub fn tokenize(input: &str) -> Result<Vec<String>> {
    tokenize_at(input, 0)
}

fn tokenize_at(input: &str, offset: usize) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut chars = input.char_indices();

    while let Some((pos, ch)) = chars.next() {
        match ch {
            '"' | '\'' => {
                in_token = true;
                loop {
                    match chars.next() {
                        Some((_, c)) if c == ch => break,
                        Some((_, c)) => current.push(c),
                        None => {
                            return Err(ParseError::UnterminatedQuote {
                                quote: ch,
                                position: offset + pos,
                            })
                        }
                    }
                }
            }
            c if c.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if in_token {
        tokens.push(current);
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> User {
        User::viewer("Alice")
    }

    #[test]
    fn test_parse_simple() {
        let cmd = parse("!approve Alice", User::moderator("mod")).unwrap();
        assert_eq!(cmd.verb, "approve");
        assert_eq!(cmd.args, vec!["Alice"]);
        assert_eq!(cmd.issuer.name, "mod");
    }

    #[test]
    fn test_parse_double_quotes() {
        let cmd = parse(r#"!task "Fix bug""#, alice()).unwrap();
        assert_eq!(cmd.args, vec!["Fix bug"]);
    }

    #[test]
    fn test_parse_single_quotes() {
        let cmd = parse("!addtask 'Stream Goals' MyTestTask", User::moderator("m")).unwrap();
        assert_eq!(cmd.args, vec!["Stream Goals", "MyTestTask"]);
    }

    #[test]
    fn test_parse_preserves_case() {
        let cmd = parse("!Task Do THING", alice()).unwrap();
        assert_eq!(cmd.verb, "Task");
        assert_eq!(cmd.args, vec!["Do", "THING"]);
    }

    #[test]
    fn test_parse_no_args() {
        let cmd = parse("  !complete  ", alice()).unwrap();
        assert_eq!(cmd.verb, "complete");
        assert!(cmd.args.is_empty());
    }

    #[test]
    fn test_parse_collapses_whitespace() {
        let cmd = parse("!task   one \t two", alice()).unwrap();
        assert_eq!(cmd.args, vec!["one", "two"]);
    }

    #[test]
    fn test_parse_other_quote_inside_quotes() {
        let cmd = parse(r#"!task "don't stop""#, alice()).unwrap();
        assert_eq!(cmd.args, vec!["don't stop"]);
    }

    #[test]
    fn test_parse_empty_quotes_kept() {
        let cmd = parse(r#"!task "" x"#, alice()).unwrap();
        assert_eq!(cmd.args, vec!["", "x"]);
    }

    #[test]
    fn test_parse_adjacent_quote_joins_token() {
        assert_eq!(tokenize(r#"a"b c"d"#).unwrap(), vec!["ab cd"]);
    }

    #[test]
    fn test_parse_missing_prefix() {
        assert_eq!(parse("task foo", alice()), Err(ParseError::MissingPrefix));
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(parse("   ", alice()), Err(ParseError::Empty));
    }

    #[test]
    fn test_parse_invalid_verb() {
        assert_eq!(
            parse("! task", alice()),
            Err(ParseError::InvalidVerb(String::new()))
        );
        assert_eq!(
            parse("!9lives", alice()),
            Err(ParseError::InvalidVerb("9lives".into()))
        );
        assert!(matches!(
            parse("!ta\"sk\" x", alice()),
            Err(ParseError::InvalidVerb(_))
        ));
    }

    #[test]
    fn test_parse_unterminated_quote() {
        let err = parse(r#"!task "Fix bug"#, alice()).unwrap_err();
        assert_eq!(
            err,
            ParseError::UnterminatedQuote {
                quote: '"',
                position: 6
            }
        );

        let err = parse("  !addtask 'Stream Goals", alice()).unwrap_err();
        assert_eq!(
            err,
            ParseError::UnterminatedQuote {
                quote: '\'',
                position: 11
            }
        );
    }

    #[test]
    fn test_is_command() {
        assert!(is_command("!task x"));
        assert!(is_command("   !approve bob"));
        assert!(!is_command("hello chat"));
        assert!(!is_command(""));
    }
}
