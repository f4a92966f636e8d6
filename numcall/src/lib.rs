//! numcall
//!
//! The function-call protocol of a numerical-computing interpreter: callable
//! values, the call stack they run on, and the load path they are found on.

pub mod config;
pub mod error;
pub mod interp;
pub mod lexer;
pub mod loadpath;
pub mod repl;
pub mod shell;
pub mod span;

pub use error::{Error, Result};
pub use span::Span;
