//! User-defined functions

use super::error::{InterpResult, RuntimeError};
use super::eval::Evaluator;
use super::filepos::FilePos;
use super::function::{Function, FunctionKind, FunctionRef};
use super::tree::Statement;
use super::value::ValueList;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// A function with named parameters, named outputs and a statement body
#[derive(Debug, Clone)]
pub struct UserFunction {
    name: String,
    params: Vec<String>,
    outputs: Vec<String>,
    body: Rc<Vec<Statement>>,
    file: Option<PathBuf>,
    beg: FilePos,
    end: FilePos,
}

impl UserFunction {
    pub fn new(name: impl Into<String>, params: &[&str], outputs: &[&str], body: Vec<Statement>) -> Self {
        UserFunction {
            name: name.into(),
            params: params.iter().map(|p| p.to_string()).collect(),
            outputs: outputs.iter().map(|o| o.to_string()).collect(),
            body: Rc::new(body),
            file: None,
            beg: FilePos::default(),
            end: FilePos::default(),
        }
    }

    pub fn with_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Span of the definition in its source text
    pub fn with_source_range(mut self, beg: FilePos, end: FilePos) -> Self {
        self.beg = beg;
        self.end = end;
        self
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }

    pub fn outputs(&self) -> &[String] {
        &self.outputs
    }
}

impl Function for UserFunction {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> FunctionKind {
        FunctionKind::UserFunction
    }

    fn execute(&self, tw: &mut Evaluator, nargout: usize, args: &ValueList) -> InterpResult<ValueList> {
        if args.len() > self.params.len() {
            return Err(RuntimeError::too_many_inputs(&self.name));
        }
        if nargout > self.outputs.len().max(1) {
            return Err(RuntimeError::too_many_outputs(&self.name));
        }

        for (param, arg) in self.params.iter().zip(args) {
            tw.assign(param, arg.clone());
        }

        tw.execute_body(&self.body)?;

        let mut out = ValueList::new();
        for (i, name) in self.outputs.iter().take(nargout.max(1)).enumerate() {
            match tw.lookup_variable(name) {
                Some(value) => out.push(value),
                // an unset first output is only an error if the caller uses it
                None if i == 0 && nargout <= 1 => break,
                None => return Err(RuntimeError::undefined_variable(name)),
            }
        }
        Ok(out)
    }

    fn clone_function(&self) -> InterpResult<FunctionRef> {
        Ok(FunctionRef::new(self.clone()))
    }

    fn beg_pos(&self) -> InterpResult<FilePos> {
        Ok(self.beg)
    }

    fn end_pos(&self) -> InterpResult<FilePos> {
        Ok(self.end)
    }

    fn file_name(&self) -> Option<&Path> {
        self.file.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interp::error::ErrorKind;
    use crate::interp::tree::Expr;
    use crate::interp::value::Value;

    fn swap() -> UserFunction {
        UserFunction::new(
            "swap",
            &["a", "b"],
            &["x", "y"],
            vec![
                Statement::assign("x", Expr::ident("b")),
                Statement::assign("y", Expr::ident("a")),
            ],
        )
        .with_source_range(FilePos::new(1, 1), FilePos::new(4, 3))
    }

    fn args(values: &[f64]) -> ValueList {
        values.iter().map(|v| Value::Scalar(*v)).collect()
    }

    #[test]
    fn test_two_outputs() {
        let mut tw = Evaluator::new();
        let f = FunctionRef::new(swap());
        let out = f.call(&mut tw, 2, &args(&[1.0, 2.0])).unwrap();
        assert_eq!(out, args(&[2.0, 1.0]));
        assert_eq!(tw.depth(), 0);
    }

    #[test]
    fn test_nargout_zero_returns_first_output() {
        let mut tw = Evaluator::new();
        let f = FunctionRef::new(swap());
        let out = f.call(&mut tw, 0, &args(&[1.0, 2.0])).unwrap();
        assert_eq!(out, args(&[2.0]));
    }

    #[test]
    fn test_too_many_inputs() {
        let mut tw = Evaluator::new();
        let f = FunctionRef::new(swap());
        let err = f.call(&mut tw, 1, &args(&[1.0, 2.0, 3.0])).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidCall);
        assert_eq!(err.message, "swap: function called with too many inputs");
        assert_eq!(tw.depth(), 0);
    }

    #[test]
    fn test_too_many_outputs() {
        let mut tw = Evaluator::new();
        let f = FunctionRef::new(swap());
        let err = f.call(&mut tw, 3, &args(&[1.0, 2.0])).unwrap_err();
        assert_eq!(err.message, "swap: function called with too many outputs");
    }

    #[test]
    fn test_unset_second_output_is_an_error() {
        let mut tw = Evaluator::new();
        let f = FunctionRef::new(UserFunction::new(
            "half",
            &[],
            &["a", "b"],
            vec![Statement::assign("a", Expr::constant(1.0))],
        ));
        let err = f.call(&mut tw, 2, &ValueList::new()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UndefinedVariable);
        assert!(err.message.contains("'b'"));

        // with one output requested the unset `b` is never looked at
        let out = f.call(&mut tw, 1, &ValueList::new()).unwrap();
        assert_eq!(out, args(&[1.0]));
    }

    #[test]
    fn test_missing_argument_stays_unbound() {
        let mut tw = Evaluator::new();
        let f = FunctionRef::new(swap());
        // `a` is bound, `b` is not, so `x = b` fails
        let err = f.call(&mut tw, 2, &args(&[1.0])).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UndefinedFunction);
        assert_eq!(tw.depth(), 0);
    }

    #[test]
    fn test_clone_and_positions() {
        let f = FunctionRef::new(swap().with_file("/tmp/swap.m"));
        let copy = f.clone_function().unwrap();
        assert!(!copy.ptr_eq(&f));
        assert_eq!(copy.name(), "swap");
        assert_eq!(copy.beg_pos().unwrap(), FilePos::new(1, 1));
        assert_eq!(copy.end_pos().unwrap(), FilePos::new(4, 3));
        assert_eq!(copy.file_name(), Some(Path::new("/tmp/swap.m")));
        // user functions provide no empty placeholder
        assert_eq!(f.empty_clone().unwrap_err().kind, ErrorKind::InternalConsistency);
    }
}
