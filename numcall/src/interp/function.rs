//! Callable values and the function-call protocol
//!
//! Every invocable entity (user function, builtin, anonymous function, class
//! method) implements [`Function`]. Callers never run a function's body
//! directly: they go through [`FunctionRef::call`], which pushes a frame on
//! the evaluator's call stack, runs [`Function::execute`], and pops that frame
//! again on every exit path.

use super::error::{InterpResult, RuntimeError};
use super::eval::Evaluator;
use super::filepos::FilePos;
use super::value::ValueList;
use serde::Serialize;
use std::fmt;
use std::ops::Deref;
use std::path::Path;
use std::rc::Rc;

/// Native stack left before `call` grows the stack
const STACK_RED_ZONE: usize = 128 * 1024;
/// Native stack added on each growth
const STACK_GROW_SIZE: usize = 4 * 1024 * 1024;

/// Dispatch tag of a callable value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FunctionKind {
    UserFunction,
    Builtin,
    AnonymousFunction,
    Method,
}

impl fmt::Display for FunctionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FunctionKind::UserFunction => "user-defined function",
            FunctionKind::Builtin => "built-in function",
            FunctionKind::AnonymousFunction => "anonymous function",
            FunctionKind::Method => "class method",
        };
        f.write_str(s)
    }
}

/// Base contract of every callable value.
///
/// `execute` has no default. The duplication and source-position
/// capabilities default to an internal-consistency error: variants that can
/// be duplicated or that come from parsed source override them, and the rest
/// (builtins, synthetic callables) rely on the error to surface misuse.
pub trait Function: fmt::Debug {
    fn name(&self) -> &str;

    fn kind(&self) -> FunctionKind;

    /// Run the variant-specific body. Called only through [`FunctionRef::call`],
    /// with the callee's frame already on top of the stack.
    fn execute(&self, tw: &mut Evaluator, nargout: usize, args: &ValueList) -> InterpResult<ValueList>;

    /// Detached duplicate for copy-on-write
    fn clone_function(&self) -> InterpResult<FunctionRef> {
        Err(RuntimeError::unexpected_call("Function::clone", self.name()))
    }

    /// Minimal placeholder of the same variant
    fn empty_clone(&self) -> InterpResult<FunctionRef> {
        Err(RuntimeError::unexpected_call("Function::empty_clone", self.name()))
    }

    fn beg_pos(&self) -> InterpResult<FilePos> {
        Err(RuntimeError::unexpected_call("Function::beg_pos", self.name()))
    }

    fn end_pos(&self) -> InterpResult<FilePos> {
        Err(RuntimeError::unexpected_call("Function::end_pos", self.name()))
    }

    /// Class this function is a method of
    fn dispatch_class(&self) -> Option<&str> {
        None
    }

    /// File the function was defined in
    fn file_name(&self) -> Option<&Path> {
        None
    }

    fn doc_string(&self) -> &str {
        ""
    }

    /// Text shown when a handle to this function is displayed
    fn display_text(&self) -> String {
        format!("@{}", self.name())
    }
}

/// Shared, reference-counted handle to a callable value
#[derive(Clone)]
pub struct FunctionRef(Rc<dyn Function>);

impl FunctionRef {
    pub fn new(function: impl Function + 'static) -> Self {
        FunctionRef(Rc::new(function))
    }

    /// Invoke the function.
    ///
    /// Pushes a frame for this function, runs `execute`, and pops the frame
    /// when the guard returned by `enter_frame` drops, whether `execute`
    /// returned normally, failed, or panicked. The result is passed through
    /// unchanged.
    pub fn call(&self, tw: &mut Evaluator, nargout: usize, args: &ValueList) -> InterpResult<ValueList> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || {
            let mut frame = tw.enter_frame(self, args.len(), nargout)?;
            self.0.execute(&mut frame, nargout, args)
        })
    }

    /// Whether both handles refer to the same function object
    pub fn ptr_eq(&self, other: &FunctionRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Number of handles sharing this function
    pub fn ref_count(&self) -> usize {
        Rc::strong_count(&self.0)
    }

    /// Detach from other holders before mutation, duplicating the function
    /// only when it is shared.
    pub fn make_unique(&mut self) -> InterpResult<()> {
        if Rc::strong_count(&self.0) > 1 {
            *self = self.0.clone_function()?;
        }
        Ok(())
    }
}

impl Deref for FunctionRef {
    type Target = dyn Function;

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}

impl fmt::Debug for FunctionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interp::error::ErrorKind;
    use crate::interp::value::Value;

    /// Variant implementing only the required capabilities
    #[derive(Debug)]
    struct Bare;

    impl Function for Bare {
        fn name(&self) -> &str {
            "bare"
        }

        fn kind(&self) -> FunctionKind {
            FunctionKind::Builtin
        }

        fn execute(&self, tw: &mut Evaluator, nargout: usize, _args: &ValueList) -> InterpResult<ValueList> {
            Ok(ValueList::one(Value::Scalar((tw.depth() * 10 + nargout) as f64)))
        }
    }

    #[test]
    fn test_defaults_fail_as_internal_errors() {
        let f = FunctionRef::new(Bare);
        for err in [
            f.clone_function().unwrap_err(),
            f.empty_clone().unwrap_err(),
            f.beg_pos().unwrap_err(),
            f.end_pos().unwrap_err(),
        ] {
            assert_eq!(err.kind, ErrorKind::InternalConsistency);
            assert!(err.message.contains("'bare'"));
            assert!(err.message.ends_with("please report this bug"));
        }
    }

    #[test]
    fn test_call_runs_with_frame_pushed() {
        let mut tw = Evaluator::new();
        let f = FunctionRef::new(Bare);
        let out = f.call(&mut tw, 2, &ValueList::new()).unwrap();
        // execute saw depth 1 and nargout 2
        assert_eq!(out, ValueList::one(Value::Scalar(12.0)));
        assert_eq!(tw.depth(), 0);
    }

    #[test]
    fn test_make_unique_only_clones_when_shared() {
        let mut f = FunctionRef::new(Bare);
        // sole owner: nothing to detach
        assert!(f.make_unique().is_ok());

        let _other = f.clone();
        assert_eq!(f.ref_count(), 2);
        let err = f.make_unique().unwrap_err();
        assert_eq!(err.kind, ErrorKind::InternalConsistency);
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(FunctionKind::AnonymousFunction.to_string(), "anonymous function");
        assert_eq!(
            serde_json::to_string(&FunctionKind::UserFunction).unwrap(),
            "\"user-function\""
        );
    }
}
