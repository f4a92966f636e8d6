//! Runtime errors for the interpreter

use thiserror::Error;

/// Runtime error raised while calling or executing a function
#[derive(Debug, Clone, Error)]
#[error("error: {message}")]
pub struct RuntimeError {
    pub kind: ErrorKind,
    pub message: String,
    /// Message identifier, e.g. `numcall:recursion-depth`
    pub identifier: Option<String>,
}

/// Kinds of runtime errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A capability was invoked on a function variant that never provided it.
    /// Always an interpreter (or extension) defect.
    InternalConsistency,
    /// Call depth exceeded the configured maximum recursion depth
    StackOverflow,
    /// Undefined function
    UndefinedFunction,
    /// Undefined variable
    UndefinedVariable,
    /// Too many inputs or outputs for the callee
    InvalidCall,
    /// Argument of the wrong class
    TypeError,
    /// Raised explicitly by the `error` builtin
    User,
    /// IO error
    Io,
}

impl RuntimeError {
    fn new(kind: ErrorKind, message: String, identifier: Option<&str>) -> Self {
        RuntimeError {
            kind,
            message,
            identifier: identifier.map(str::to_string),
        }
    }

    /// A default capability stub was reached, e.g. `Function::clone` on a builtin
    pub fn unexpected_call(operation: &str, function: &str) -> Self {
        Self::new(
            ErrorKind::InternalConsistency,
            format!("unexpected call to {operation} for '{function}' - please report this bug"),
            Some("numcall:internal-error"),
        )
    }

    pub fn stack_overflow(limit: usize) -> Self {
        Self::new(
            ErrorKind::StackOverflow,
            format!("max_recursion_depth exceeded (limit is {limit})"),
            Some("numcall:recursion-depth"),
        )
    }

    pub fn undefined_function(name: &str) -> Self {
        Self::new(
            ErrorKind::UndefinedFunction,
            format!("'{name}' undefined"),
            Some("numcall:undefined-function"),
        )
    }

    pub fn undefined_variable(name: &str) -> Self {
        Self::new(
            ErrorKind::UndefinedVariable,
            format!("value '{name}' undefined"),
            Some("numcall:undefined-function"),
        )
    }

    /// `[a, b] = f (...)` where `f` produced fewer values than targets
    pub fn undefined_element(index: usize) -> Self {
        Self::new(
            ErrorKind::UndefinedVariable,
            format!("element number {index} undefined in return list"),
            Some("numcall:undefined-function"),
        )
    }

    pub fn too_many_inputs(function: &str) -> Self {
        Self::new(
            ErrorKind::InvalidCall,
            format!("{function}: function called with too many inputs"),
            Some("numcall:invalid-fun-call"),
        )
    }

    pub fn too_many_outputs(function: &str) -> Self {
        Self::new(
            ErrorKind::InvalidCall,
            format!("{function}: function called with too many outputs"),
            Some("numcall:invalid-fun-call"),
        )
    }

    pub fn invalid_call(function: &str, message: &str) -> Self {
        Self::new(
            ErrorKind::InvalidCall,
            format!("{function}: {message}"),
            Some("numcall:invalid-fun-call"),
        )
    }

    pub fn type_error(function: &str, expected: &str, got: &str) -> Self {
        Self::new(
            ErrorKind::TypeError,
            format!("{function}: expected {expected} argument, got {got}"),
            None,
        )
    }

    /// Error raised by user code through the `error` builtin
    pub fn user(identifier: Option<&str>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::User, message.into(), identifier)
    }

    pub fn io_error(function: &str, err: &std::io::Error) -> Self {
        Self::new(ErrorKind::Io, format!("{function}: {err}"), None)
    }

    /// True when the error indicates a defect rather than a script error
    pub fn is_bug(&self) -> bool {
        self.kind == ErrorKind::InternalConsistency
    }
}

/// Result type for interpreter operations
pub type InterpResult<T> = Result<T, RuntimeError>;
