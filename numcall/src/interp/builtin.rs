//! Built-in (native) functions

use super::error::InterpResult;
use super::eval::Evaluator;
use super::function::{Function, FunctionKind};
use super::value::ValueList;

/// Native implementation of a builtin: `(evaluator, nargout, args)`
pub type BuiltinFn = fn(&mut Evaluator, usize, &ValueList) -> InterpResult<ValueList>;

/// A function implemented in Rust.
///
/// Builtins are unique: they cannot be cloned and have no source text, so the
/// corresponding `Function` capabilities keep their failing defaults.
#[derive(Debug)]
pub struct BuiltinFunction {
    name: String,
    fcn: BuiltinFn,
    doc: &'static str,
}

impl BuiltinFunction {
    pub fn new(name: impl Into<String>, fcn: BuiltinFn, doc: &'static str) -> Self {
        BuiltinFunction {
            name: name.into(),
            fcn,
            doc,
        }
    }
}

impl Function for BuiltinFunction {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> FunctionKind {
        FunctionKind::Builtin
    }

    fn execute(&self, tw: &mut Evaluator, nargout: usize, args: &ValueList) -> InterpResult<ValueList> {
        (self.fcn)(tw, nargout, args)
    }

    fn doc_string(&self) -> &str {
        self.doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interp::error::ErrorKind;
    use crate::interp::function::FunctionRef;
    use crate::interp::value::Value;

    fn depth_of_call(tw: &mut Evaluator, _nargout: usize, _args: &ValueList) -> InterpResult<ValueList> {
        Ok(ValueList::one(Value::Scalar(tw.depth() as f64)))
    }

    #[test]
    fn test_builtin_execute_through_call() {
        let mut tw = Evaluator::new();
        let f = FunctionRef::new(BuiltinFunction::new("depth_of_call", depth_of_call, "doc"));
        let out = f.call(&mut tw, 1, &ValueList::new()).unwrap();
        assert_eq!(out[0], Value::Scalar(1.0));
        assert_eq!(f.doc_string(), "doc");
        assert_eq!(f.kind(), FunctionKind::Builtin);
    }

    #[test]
    fn test_builtin_is_not_clonable() {
        let f = FunctionRef::new(BuiltinFunction::new("depth_of_call", depth_of_call, ""));
        assert_eq!(f.clone_function().unwrap_err().kind, ErrorKind::InternalConsistency);
        assert_eq!(f.empty_clone().unwrap_err().kind, ErrorKind::InternalConsistency);
        assert_eq!(f.beg_pos().unwrap_err().kind, ErrorKind::InternalConsistency);
        assert_eq!(f.end_pos().unwrap_err().kind, ErrorKind::InternalConsistency);
    }
}
