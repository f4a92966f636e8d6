//! Class methods

use super::error::InterpResult;
use super::eval::Evaluator;
use super::filepos::FilePos;
use super::function::{Function, FunctionKind, FunctionRef};
use super::value::ValueList;
use std::path::Path;

/// A function registered as a method of a dispatch class.
///
/// The method wraps its implementation: the frame pushed for the method is
/// the only frame of the call, the target's body runs directly inside it.
#[derive(Debug, Clone)]
pub struct ClassMethod {
    class: String,
    target: FunctionRef,
}

impl ClassMethod {
    pub fn new(class: impl Into<String>, target: FunctionRef) -> Self {
        ClassMethod {
            class: class.into(),
            target,
        }
    }

    pub fn target(&self) -> &FunctionRef {
        &self.target
    }
}

impl Function for ClassMethod {
    fn name(&self) -> &str {
        self.target.name()
    }

    fn kind(&self) -> FunctionKind {
        FunctionKind::Method
    }

    fn execute(&self, tw: &mut Evaluator, nargout: usize, args: &ValueList) -> InterpResult<ValueList> {
        self.target.execute(tw, nargout, args)
    }

    fn clone_function(&self) -> InterpResult<FunctionRef> {
        Ok(FunctionRef::new(ClassMethod::new(
            self.class.clone(),
            self.target.clone_function()?,
        )))
    }

    fn beg_pos(&self) -> InterpResult<FilePos> {
        self.target.beg_pos()
    }

    fn end_pos(&self) -> InterpResult<FilePos> {
        self.target.end_pos()
    }

    fn dispatch_class(&self) -> Option<&str> {
        Some(&self.class)
    }

    fn file_name(&self) -> Option<&Path> {
        self.target.file_name()
    }

    fn doc_string(&self) -> &str {
        self.target.doc_string()
    }

    fn display_text(&self) -> String {
        format!("@{}/{}", self.class, self.target.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interp::builtin::BuiltinFunction;
    use crate::interp::error::ErrorKind;
    use crate::interp::tree::{Expr, Statement};
    use crate::interp::user_fcn::UserFunction;
    use crate::interp::value::Value;

    fn frames_seen(tw: &mut Evaluator, _: usize, _: &ValueList) -> InterpResult<ValueList> {
        Ok(ValueList::one(Value::Scalar(tw.depth() as f64)))
    }

    #[test]
    fn test_method_runs_in_single_frame() {
        let mut tw = Evaluator::new();
        let target = FunctionRef::new(BuiltinFunction::new("frames_seen", frames_seen, ""));
        let method = FunctionRef::new(ClassMethod::new("cell", target));
        let out = method.call(&mut tw, 1, &ValueList::new()).unwrap();
        assert_eq!(out[0], Value::Scalar(1.0));
        assert_eq!(method.kind(), FunctionKind::Method);
        assert_eq!(method.dispatch_class(), Some("cell"));
        assert_eq!(method.display_text(), "@cell/frames_seen");
    }

    #[test]
    fn test_capabilities_follow_target() {
        let builtin = FunctionRef::new(BuiltinFunction::new("frames_seen", frames_seen, ""));
        let method = ClassMethod::new("char", builtin);
        assert_eq!(method.clone_function().unwrap_err().kind, ErrorKind::InternalConsistency);
        assert_eq!(method.beg_pos().unwrap_err().kind, ErrorKind::InternalConsistency);

        let user = FunctionRef::new(
            UserFunction::new("id", &["x"], &["y"], vec![Statement::assign("y", Expr::ident("x"))])
                .with_source_range(FilePos::new(3, 1), FilePos::new(5, 3)),
        );
        let method = ClassMethod::new("char", user);
        let copy = method.clone_function().unwrap();
        assert_eq!(copy.dispatch_class(), Some("char"));
        assert_eq!(copy.beg_pos().unwrap(), FilePos::new(3, 1));
        assert_eq!(copy.end_pos().unwrap(), FilePos::new(5, 3));
    }
}
