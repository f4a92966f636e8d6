//! REPL (Read-Eval-Print Loop) for command syntax

use crate::config::Config;
use crate::error::report_error;
use crate::interp::Evaluator;
use crate::shell;
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::path::PathBuf;

const INPUT_NAME: &str = "<stdin>";

/// Evaluator plus the handling of `:` commands, independent of the terminal
pub struct Session {
    tw: Evaluator,
}

impl Session {
    pub fn new(tw: Evaluator) -> Self {
        Session { tw }
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.tw
    }

    pub fn evaluator_mut(&mut self) -> &mut Evaluator {
        &mut self.tw
    }

    /// Handle a `:` command. Returns true when the session should end.
    pub fn handle_command(&mut self, cmd: &str) -> bool {
        match cmd {
            ":quit" | ":q" | ":exit" => true,
            ":help" | ":h" | ":?" => {
                for line in HELP {
                    self.tw.display(line);
                }
                false
            }
            ":path" => {
                let dirs: Vec<String> = self.tw.load_path().dirs().iter().map(|d| d.display().to_string()).collect();
                if dirs.is_empty() {
                    self.tw.display("(load path is empty)");
                }
                for dir in dirs {
                    self.tw.display(&dir);
                }
                false
            }
            ":functions" => {
                let names = self.tw.symbols().function_names().join(" ");
                self.tw.display(&names);
                false
            }
            ":limit" => {
                let text = format!("max_recursion_depth = {}", self.tw.max_recursion_depth());
                self.tw.display(&text);
                false
            }
            _ => {
                self.tw.display(&format!("Unknown command: {cmd}"));
                self.tw.display("Type :help for help.");
                false
            }
        }
    }

    /// Run one line of command syntax, reporting any error.
    ///
    /// Returns true if the line ran without error.
    pub fn eval_input(&mut self, line: &str) -> bool {
        match shell::run_line(&mut self.tw, line) {
            Ok(()) => true,
            Err(err) => {
                tracing::debug!(depth = self.tw.depth(), "command failed: {err}");
                if let Err(io_err) = report_error(INPUT_NAME, line, &err) {
                    eprintln!("{err} ({io_err})");
                }
                false
            }
        }
    }
}

const HELP: &[&str] = &[
    "Commands:",
    "  :help, :h, :?   Show this help",
    "  :quit, :q       Exit the REPL",
    "  :path           Show the load path",
    "  :functions      List known functions",
    "  :limit          Show the recursion limit",
    "",
    "Enter calls in command syntax, for example:",
    "  plus 1 2",
    "  feval @times 3 4",
    "  addpath /opt/m-files -end; path",
];

/// REPL state
pub struct Repl {
    editor: DefaultEditor,
    session: Session,
    prompt: String,
    history_path: Option<PathBuf>,
}

impl Repl {
    pub fn new(config: &Config) -> RlResult<Self> {
        let mut repl = Repl {
            editor: DefaultEditor::new()?,
            session: Session::new(Evaluator::from_config(config)),
            prompt: config.repl.prompt.clone(),
            history_path: Some(config.history_file()),
        };

        if let Some(path) = &repl.history_path
            && let Err(err) = repl.editor.load_history(path)
        {
            tracing::debug!("no history loaded from {}: {err}", path.display());
        }

        Ok(repl)
    }

    /// Run the REPL
    pub fn run(&mut self) -> RlResult<()> {
        println!("numcall {}", env!("CARGO_PKG_VERSION"));
        println!("Type :help for help, :quit to exit.\n");

        loop {
            match self.editor.readline(&self.prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }

                    let _ = self.editor.add_history_entry(line);

                    if line.starts_with(':') {
                        if self.session.handle_command(line) {
                            break;
                        }
                        continue;
                    }

                    self.session.eval_input(line);
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => break,
                Err(err) => {
                    eprintln!("Error: {err}");
                    break;
                }
            }
        }

        if let Some(path) = &self.history_path
            && let Err(err) = self.editor.save_history(path)
        {
            tracing::warn!("cannot save history to {}: {err}", path.display());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interp::Value;

    fn session() -> Session {
        let mut tw = Evaluator::new();
        tw.capture_output();
        Session::new(tw)
    }

    #[test]
    fn test_handle_command_quit() {
        let mut s = session();
        assert!(s.handle_command(":quit"));
        assert!(s.handle_command(":q"));
        assert!(s.handle_command(":exit"));
    }

    #[test]
    fn test_handle_command_help() {
        let mut s = session();
        assert!(!s.handle_command(":help"));
        let output = s.evaluator_mut().take_output();
        assert_eq!(output.len(), HELP.len());
    }

    #[test]
    fn test_handle_command_unknown() {
        let mut s = session();
        assert!(!s.handle_command(":bogus"));
        assert_eq!(s.evaluator_mut().take_output()[0], "Unknown command: :bogus");
    }

    #[test]
    fn test_handle_command_limit_and_path() {
        let mut s = session();
        s.handle_command(":limit");
        s.handle_command(":path");
        assert_eq!(
            s.evaluator_mut().take_output(),
            vec!["max_recursion_depth = 256", "(load path is empty)"]
        );
    }

    #[test]
    fn test_eval_input() {
        let mut s = session();
        assert!(s.eval_input("minus 5 2"));
        assert_eq!(s.evaluator().lookup_variable("ans"), Some(Value::Scalar(3.0)));
        assert!(!s.eval_input("undefined_thing"));
        assert!(!s.eval_input("disp 'unterminated"));
        assert_eq!(s.evaluator().depth(), 0);
    }
}
