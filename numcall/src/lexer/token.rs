//! Token definitions for command syntax

use logos::Logos;
use std::fmt;

/// Command syntax token
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
#[logos(skip r"[%#][^\n]*")]
pub enum Token {
    #[regex(r"[+-]?([0-9]+(\.[0-9]*)?|\.[0-9]+)([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok(), priority = 3)]
    Number(f64),

    /// `'text'`, with `''` standing for one quote
    #[regex(r"'([^'\n]|'')*'", |lex| {
        let s = lex.slice();
        s[1..s.len() - 1].replace("''", "'")
    })]
    SingleQuoted(String),

    /// `"text"` with backslash escapes
    #[regex(r#""([^"\\\n]|\\.)*""#, |lex| {
        let s = lex.slice();
        unescape(&s[1..s.len() - 1])
    })]
    DoubleQuoted(String),

    /// `@name`
    #[regex(r"@[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice()[1..].to_string())]
    Handle(String),

    /// Anything else up to whitespace or a separator
    #[regex(r#"[^ \t\r\n'"@%#,;]+"#, |lex| lex.slice().to_string(), priority = 1)]
    Word(String),

    /// Ends a command; the result is shown
    #[token(",")]
    Comma,

    /// Ends a command; the result is not shown
    #[token(";")]
    Semicolon,
}

fn unescape(inner: &str) -> String {
    let mut result = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some('r') => result.push('\r'),
            Some('\\') => result.push('\\'),
            Some('"') => result.push('"'),
            Some('0') => result.push('\0'),
            Some(other) => {
                result.push('\\');
                result.push(other);
            }
            None => result.push('\\'),
        }
    }
    result
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{n}"),
            Token::SingleQuoted(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Token::DoubleQuoted(s) => write!(f, "{s:?}"),
            Token::Handle(name) => write!(f, "@{name}"),
            Token::Word(w) => write!(f, "{w}"),
            Token::Comma => write!(f, ","),
            Token::Semicolon => write!(f, ";"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unescape() {
        assert_eq!(unescape(r"a\tb\n"), "a\tb\n");
        assert_eq!(unescape(r"\q"), "\\q");
        assert_eq!(unescape("trailing\\"), "trailing\\");
    }

    #[test]
    fn test_display() {
        assert_eq!(Token::SingleQuoted("it's".to_string()).to_string(), "'it''s'");
        assert_eq!(Token::Handle("sin".to_string()).to_string(), "@sin");
        assert_eq!(Token::Number(2.5).to_string(), "2.5");
        assert_eq!(Token::Semicolon.to_string(), ";");
    }
}
