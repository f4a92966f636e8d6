//! Anonymous functions (`@(x) expr`)

use super::error::{InterpResult, RuntimeError};
use super::eval::Evaluator;
use super::function::{Function, FunctionKind, FunctionRef};
use super::tree::Expr;
use super::value::{Value, ValueList};
use std::rc::Rc;

const ANONYMOUS_NAME: &str = "@<anonymous>";

/// Function created at evaluation time from an `@(params) body` expression.
///
/// Variables of the creating scope that the body refers to are captured by
/// value when the function is created.
#[derive(Debug, Clone)]
pub struct AnonymousFunction {
    params: Vec<String>,
    body: Rc<Expr>,
    captured: Vec<(String, Value)>,
}

impl AnonymousFunction {
    pub fn new(params: Vec<String>, body: Rc<Expr>, captured: Vec<(String, Value)>) -> Self {
        AnonymousFunction { params, body, captured }
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }

    pub fn captured(&self) -> &[(String, Value)] {
        &self.captured
    }
}

impl Function for AnonymousFunction {
    fn name(&self) -> &str {
        ANONYMOUS_NAME
    }

    fn kind(&self) -> FunctionKind {
        FunctionKind::AnonymousFunction
    }

    fn execute(&self, tw: &mut Evaluator, nargout: usize, args: &ValueList) -> InterpResult<ValueList> {
        if args.len() > self.params.len() {
            return Err(RuntimeError::too_many_inputs(ANONYMOUS_NAME));
        }

        for (name, value) in &self.captured {
            tw.assign(name, value.clone());
        }
        for (param, arg) in self.params.iter().zip(args) {
            tw.assign(param, arg.clone());
        }

        tw.eval_multi(&self.body, nargout)
    }

    fn clone_function(&self) -> InterpResult<FunctionRef> {
        Ok(FunctionRef::new(self.clone()))
    }

    /// `@() []`
    fn empty_clone(&self) -> InterpResult<FunctionRef> {
        Ok(FunctionRef::new(AnonymousFunction::new(
            Vec::new(),
            Rc::new(Expr::Constant(Value::Empty)),
            Vec::new(),
        )))
    }

    fn display_text(&self) -> String {
        format!("@({}) {}", self.params.join(", "), self.body)
    }
}
