//! Command syntax
//!
//! `name arg arg ...`, several commands per line separated by `,` or `;`.
//! Arguments are numbers, quoted or bare strings, and `@name` handles. Each
//! command is a call with `nargout = 0`; a returned value becomes `ans` and
//! is shown unless the command ends with `;`.

use crate::error::{Error, Result};
use crate::interp::{Evaluator, Value, ValueList};
use crate::lexer::{Token, tokenize};
use crate::span::Span;

/// One command argument
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Number(f64),
    Str(String),
    /// Resolved to a function handle when the command runs
    Handle(String),
}

/// A parsed command
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub name: String,
    pub span: Span,
    pub args: Vec<Arg>,
    /// False when the command was terminated by `;`
    pub show_result: bool,
}

impl Command {
    /// Parse a command line into its commands
    pub fn parse(line: &str) -> Result<Vec<Command>> {
        let mut commands = Vec::new();
        let mut current: Option<Command> = None;

        for (token, span) in tokenize(line)? {
            match token {
                Token::Comma | Token::Semicolon => {
                    if let Some(mut command) = current.take() {
                        command.show_result = token == Token::Comma;
                        commands.push(command);
                    }
                }
                token => match current.as_mut() {
                    Some(command) => {
                        command.span = command.span.merge(span);
                        command.args.push(token_arg(token));
                    }
                    None => current = Some(start_command(token, span)?),
                },
            }
        }
        commands.extend(current);
        Ok(commands)
    }

    /// Run the command with `nargout = 0`
    pub fn execute(&self, tw: &mut Evaluator) -> Result<ValueList> {
        let mut args = ValueList::new();
        for arg in &self.args {
            args.push(match arg {
                Arg::Number(n) => Value::Scalar(*n),
                Arg::Str(s) => Value::str(s.as_str()),
                Arg::Handle(name) => Value::Function(tw.resolve(name, &ValueList::new())?),
            });
        }
        Ok(tw.feval(&self.name, 0, &args)?)
    }
}

fn start_command(token: Token, span: Span) -> Result<Command> {
    match token {
        Token::Word(name) if is_valid_name(&name) => Ok(Command {
            name,
            span,
            args: Vec::new(),
            show_result: true,
        }),
        other => Err(Error::syntax(format!("expected a function name, found `{other}`"), span)),
    }
}

fn token_arg(token: Token) -> Arg {
    match token {
        Token::Number(n) => Arg::Number(n),
        Token::Handle(name) => Arg::Handle(name),
        Token::SingleQuoted(s) | Token::DoubleQuoted(s) | Token::Word(s) => Arg::Str(s),
        Token::Comma => Arg::Str(",".to_string()),
        Token::Semicolon => Arg::Str(";".to_string()),
    }
}

fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Run every command on `line`, storing results in `ans`.
///
/// Stops at the first failing command.
pub fn run_line(tw: &mut Evaluator, line: &str) -> Result<()> {
    for command in Command::parse(line)? {
        let values = command.execute(tw)?;
        if let Some(value) = values.into_iter().next() {
            if command.show_result {
                tw.display(&format!("ans = {value}"));
            }
            tw.assign("ans", value);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shell() -> Evaluator {
        let mut tw = Evaluator::new();
        tw.capture_output();
        tw
    }

    #[test]
    fn test_parse_single() {
        let commands = Command::parse("plus 1 'two' @minus").unwrap();
        assert_eq!(
            commands,
            vec![Command {
                name: "plus".to_string(),
                span: Span::new(0, 19),
                args: vec![
                    Arg::Number(1.0),
                    Arg::Str("two".to_string()),
                    Arg::Handle("minus".to_string()),
                ],
                show_result: true,
            }]
        );
    }

    #[test]
    fn test_parse_separators() {
        let commands = Command::parse("disp a; disp b,, pathsep").unwrap();
        let shown: Vec<(&str, bool)> = commands.iter().map(|c| (c.name.as_str(), c.show_result)).collect();
        assert_eq!(shown, vec![("disp", false), ("disp", true), ("pathsep", true)]);
    }

    #[test]
    fn test_parse_rejects_non_name() {
        let err = Command::parse("42 plus").unwrap_err();
        assert!(matches!(err, Error::Syntax { span, .. } if span == Span::new(0, 2)));
        assert!(Command::parse("/usr/bin").is_err());
    }

    #[test]
    fn test_run_line_shows_and_stores_ans() {
        let mut tw = shell();
        run_line(&mut tw, "plus 1 2").unwrap();
        run_line(&mut tw, "times 2 3;").unwrap();
        assert_eq!(tw.take_output(), vec!["ans = 3"]);
        assert_eq!(tw.lookup_variable("ans"), Some(Value::Scalar(6.0)));
    }

    #[test]
    fn test_run_line_with_handle() {
        let mut tw = shell();
        run_line(&mut tw, "feval @minus 10 4").unwrap();
        run_line(&mut tw, "disp 'hello world'").unwrap();
        assert_eq!(tw.take_output(), vec!["ans = 6", "hello world"]);
    }

    #[test]
    fn test_run_line_stops_at_error() {
        let mut tw = shell();
        let err = run_line(&mut tw, "nosuch 1, disp 'never'").unwrap_err();
        assert_eq!(err.to_string(), "error: 'nosuch' undefined");
        assert!(tw.take_output().is_empty());
        assert_eq!(tw.depth(), 0);
    }
}
