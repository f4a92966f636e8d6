//! Call stack of an evaluator
//!
//! One [`Frame`] is pushed for every function call in progress. Frames are
//! strictly LIFO: the frame pushed by a call is popped before the frame of
//! its caller, including while an error propagates outward.

use super::error::{InterpResult, RuntimeError};
use super::function::{FunctionKind, FunctionRef};
use super::value::Value;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Default limit on nested calls
pub const DEFAULT_MAX_RECURSION_DEPTH: usize = 256;

/// Serial number identifying one pushed frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FrameId(u64);

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Activation record for one in-progress call
#[derive(Debug)]
pub struct Frame {
    id: FrameId,
    function: FunctionRef,
    locals: HashMap<String, Value>,
    nargin: usize,
    nargout: usize,
}

impl Frame {
    pub fn id(&self) -> FrameId {
        self.id
    }

    /// The function this frame is executing
    pub fn function(&self) -> &FunctionRef {
        &self.function
    }

    pub fn nargin(&self) -> usize {
        self.nargin
    }

    pub fn nargout(&self) -> usize {
        self.nargout
    }

    /// Define or overwrite a local variable
    pub fn define(&mut self, name: impl Into<String>, value: Value) {
        self.locals.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.locals.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.locals.contains_key(name)
    }

    /// Local variable bindings (for debugging)
    pub fn locals(&self) -> &HashMap<String, Value> {
        &self.locals
    }
}

/// Summary of a frame, as reported by `dbstack`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameInfo {
    pub name: String,
    pub kind: FunctionKind,
    /// Line where the function's source starts, if known
    pub line: Option<usize>,
    pub column: Option<usize>,
    pub nargin: usize,
    pub nargout: usize,
}

impl fmt::Display for FrameInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.line, self.column) {
            (Some(line), Some(column)) => {
                write!(f, "{} at line {} column {}", self.name, line, column)
            }
            _ => write!(f, "{}", self.name),
        }
    }
}

/// Ordered stack of active calls for one evaluator
#[derive(Debug)]
pub struct CallStack {
    frames: Vec<Frame>,
    max_depth: usize,
    next_id: u64,
}

impl CallStack {
    /// Create an empty stack allowing `max_depth` frames.
    ///
    /// A limit of 0 is raised to 1. Configuration and
    /// [`CallStack::set_max_depth`] reject 0 before it gets here.
    pub fn new(max_depth: usize) -> Self {
        CallStack {
            frames: Vec::new(),
            max_depth: max_depth.max(1),
            next_id: 0,
        }
    }

    /// Push a frame for `function`.
    ///
    /// Fails with a stack overflow error, leaving the stack untouched, when
    /// the stack already holds `max_depth` frames.
    pub fn push(&mut self, function: FunctionRef, nargin: usize, nargout: usize) -> InterpResult<FrameId> {
        if self.frames.len() >= self.max_depth {
            return Err(RuntimeError::stack_overflow(self.max_depth));
        }

        let id = FrameId(self.next_id);
        self.next_id += 1;
        self.frames.push(Frame {
            id,
            function,
            locals: HashMap::new(),
            nargin,
            nargout,
        });
        Ok(id)
    }

    /// Pop the top frame.
    ///
    /// Every successful push must be matched by exactly one pop, in LIFO
    /// order. Popping an empty stack is a programming error.
    pub fn pop(&mut self) -> Option<Frame> {
        debug_assert!(!self.frames.is_empty(), "pop_stack_frame without matching push");
        self.frames.pop()
    }

    /// Number of active frames
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Change the depth limit, returning the previous one.
    ///
    /// Lowering the limit below the current depth does not drop frames; the
    /// next push fails instead.
    pub fn set_max_depth(&mut self, max_depth: usize) -> InterpResult<usize> {
        if max_depth == 0 {
            return Err(RuntimeError::invalid_call(
                "max_recursion_depth",
                "limit must be a positive integer",
            ));
        }
        Ok(std::mem::replace(&mut self.max_depth, max_depth))
    }

    /// Innermost frame
    pub fn current(&self) -> Option<&Frame> {
        self.frames.last()
    }

    pub fn current_mut(&mut self) -> Option<&mut Frame> {
        self.frames.last_mut()
    }

    /// Frame of the caller of the innermost call
    pub fn caller(&self) -> Option<&Frame> {
        self.frames.len().checked_sub(2).map(|i| &self.frames[i])
    }

    /// Frames from outermost to innermost
    pub fn frames(&self) -> std::slice::Iter<'_, Frame> {
        self.frames.iter()
    }

    /// Summaries of the active frames, innermost first
    pub fn backtrace(&self) -> Vec<FrameInfo> {
        self.frames
            .iter()
            .rev()
            .map(|frame| {
                let function = frame.function();
                let beg = function.beg_pos().ok().filter(|p| p.is_valid());
                FrameInfo {
                    name: function.name().to_string(),
                    kind: function.kind(),
                    line: beg.map(|p| p.line),
                    column: beg.map(|p| p.column),
                    nargin: frame.nargin,
                    nargout: frame.nargout,
                }
            })
            .collect()
    }
}

impl Default for CallStack {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RECURSION_DEPTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interp::builtin::BuiltinFunction;
    use crate::interp::error::ErrorKind;
    use crate::interp::value::ValueList;
    use crate::interp::Evaluator;

    fn noop(_: &mut Evaluator, _: usize, _: &ValueList) -> InterpResult<ValueList> {
        Ok(ValueList::new())
    }

    fn func(name: &str) -> FunctionRef {
        FunctionRef::new(BuiltinFunction::new(name, noop, ""))
    }

    #[test]
    fn test_zero_limit() {
        let mut stack = CallStack::new(0);
        assert_eq!(stack.max_depth(), 1);
        assert!(stack.push(func("a"), 0, 0).is_ok());
        assert_eq!(
            stack.push(func("b"), 0, 0).unwrap_err().kind,
            ErrorKind::StackOverflow
        );
        assert!(stack.set_max_depth(0).is_err());
        assert_eq!(stack.max_depth(), 1);
    }

    #[test]
    fn test_push_pop_depth() {
        let mut stack = CallStack::new(8);
        assert_eq!(stack.depth(), 0);
        let a = stack.push(func("a"), 0, 0).unwrap();
        let b = stack.push(func("b"), 1, 2).unwrap();
        assert_ne!(a, b);
        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.current().unwrap().function().name(), "b");
        assert_eq!(stack.caller().unwrap().function().name(), "a");

        let popped = stack.pop().unwrap();
        assert_eq!(popped.id(), b);
        assert_eq!(popped.nargin(), 1);
        assert_eq!(popped.nargout(), 2);
        assert_eq!(stack.pop().unwrap().id(), a);
        assert!(stack.is_empty());
    }

    #[test]
    fn test_overflow_leaves_stack_intact() {
        let mut stack = CallStack::new(2);
        stack.push(func("a"), 0, 0).unwrap();
        stack.push(func("b"), 0, 0).unwrap();

        let err = stack.push(func("c"), 0, 0).unwrap_err();
        assert_eq!(err.kind, ErrorKind::StackOverflow);
        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.current().unwrap().function().name(), "b");

        stack.pop();
        stack.pop();
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    fn test_set_max_depth() {
        let mut stack = CallStack::default();
        assert_eq!(stack.max_depth(), DEFAULT_MAX_RECURSION_DEPTH);
        assert_eq!(stack.set_max_depth(3).unwrap(), DEFAULT_MAX_RECURSION_DEPTH);
        assert_eq!(stack.max_depth(), 3);
        assert!(stack.set_max_depth(0).is_err());
        assert_eq!(stack.max_depth(), 3);
    }

    #[test]
    fn test_frame_locals() {
        let mut stack = CallStack::default();
        stack.push(func("f"), 0, 0).unwrap();
        let frame = stack.current_mut().unwrap();
        frame.define("x", Value::Scalar(1.0));
        assert!(frame.contains("x"));
        assert_eq!(frame.get("x"), Some(&Value::Scalar(1.0)));
        assert_eq!(frame.get("y"), None);
    }

    #[test]
    fn test_backtrace_innermost_first() {
        let mut stack = CallStack::default();
        stack.push(func("outer"), 0, 0).unwrap();
        stack.push(func("inner"), 2, 1).unwrap();
        let trace = stack.backtrace();
        assert_eq!(trace.len(), 2);
        assert_eq!(trace[0].name, "inner");
        assert_eq!(trace[0].kind, FunctionKind::Builtin);
        assert_eq!(trace[0].line, None);
        assert_eq!(trace[0].nargin, 2);
        assert_eq!(trace[1].name, "outer");
        assert_eq!(trace[1].to_string(), "outer");
    }

    #[test]
    #[should_panic(expected = "pop_stack_frame without matching push")]
    #[cfg(debug_assertions)]
    fn test_unmatched_pop_asserts() {
        let mut stack = CallStack::default();
        stack.pop();
    }
}
