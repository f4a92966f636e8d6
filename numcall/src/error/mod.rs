//! Error types and reporting

use crate::config::ConfigError;
use crate::interp::RuntimeError;
use crate::span::Span;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the command shell and CLI
#[derive(Debug, Error)]
pub enum Error {
    #[error("lexer error at {span}: {message}")]
    Lexer { message: String, span: Span },

    #[error("syntax error at {span}: {message}")]
    Syntax { message: String, span: Span },

    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn lexer(message: impl Into<String>, span: Span) -> Self {
        Self::Lexer {
            message: message.into(),
            span,
        }
    }

    pub fn syntax(message: impl Into<String>, span: Span) -> Self {
        Self::Syntax {
            message: message.into(),
            span,
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            Self::Lexer { span, .. } | Self::Syntax { span, .. } => Some(*span),
            Self::Runtime(_) | Self::Config(_) | Self::Io(_) => None,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::Lexer { message, .. } | Self::Syntax { message, .. } => message.clone(),
            Self::Runtime(err) => err.message.clone(),
            other => other.to_string(),
        }
    }
}

/// Report an error for command line `source`.
///
/// Errors with a span are rendered with ariadne; runtime errors print in the
/// interpreter's `error: ...` form.
pub fn report_error(filename: &str, source: &str, error: &Error) -> std::io::Result<()> {
    use ariadne::{Color, Label, Report, ReportKind, Source};

    let Some(span) = error.span() else {
        eprintln!("{error}");
        return Ok(());
    };

    let kind = match error {
        Error::Lexer { .. } => "Lexer",
        _ => "Syntax",
    };
    Report::build(ReportKind::Error, (filename, span.start..span.end))
        .with_message(format!("{kind} error"))
        .with_label(
            Label::new((filename, span.start..span.end))
                .with_message(error.message())
                .with_color(Color::Red),
        )
        .finish()
        .eprint((filename, Source::from(source)))
}
