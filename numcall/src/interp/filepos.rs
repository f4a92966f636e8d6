//! Source positions for diagnostics

use serde::{Deserialize, Serialize};
use std::fmt;

/// A line/column position in a function's source text (1-based).
///
/// `FilePos::default()` (`0:0`) means the position is unknown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FilePos {
    pub line: usize,
    pub column: usize,
}

impl FilePos {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    pub fn is_valid(&self) -> bool {
        self.line > 0
    }
}

impl fmt::Display for FilePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
