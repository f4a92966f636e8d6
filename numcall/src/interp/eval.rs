//! Evaluator
//!
//! Owns the call stack, the function registry, the load path and the base
//! workspace, and executes function bodies.

use super::anon_fcn::AnonymousFunction;
use super::builtins;
use super::error::{InterpResult, RuntimeError};
use super::function::{Function, FunctionRef};
use super::stack::{CallStack, DEFAULT_MAX_RECURSION_DEPTH, Frame, FrameId};
use super::symtab::SymbolTable;
use super::tree::{Expr, Statement};
use super::value::{Value, ValueList};
use crate::config::Config;
use crate::loadpath::LoadPath;
use std::collections::HashMap;
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::{debug, trace, warn};

/// How a statement list finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Normal,
    Return,
}

/// Where `disp` and warnings go
#[derive(Debug)]
enum Output {
    Stdout,
    Capture(Vec<String>),
}

/// The evaluator
#[derive(Debug)]
pub struct Evaluator {
    call_stack: CallStack,
    symtab: SymbolTable,
    load_path: LoadPath,
    /// Variables visible when no function is executing
    base_workspace: HashMap<String, Value>,
    /// File used by `savepath` when called without arguments
    pathdef: Option<PathBuf>,
    output: Output,
}

impl Evaluator {
    /// Create an evaluator with default settings and the builtin library
    pub fn new() -> Self {
        Self::with_parts(DEFAULT_MAX_RECURSION_DEPTH, LoadPath::default())
    }

    /// Create an evaluator from configuration.
    ///
    /// A saved pathdef file, when configured and present, replaces the
    /// configured default directories as the initial path.
    pub fn from_config(config: &Config) -> Self {
        let mut load_path = LoadPath::new(config.path.default_dirs.clone());
        let pathdef = config.pathdef_file();
        if let Some(file) = &pathdef
            && file.is_file()
        {
            match load_path.load(file) {
                Ok(()) => debug!("restored load path from {}", file.display()),
                Err(err) => warn!("cannot read {}: {err}", file.display()),
            }
        }
        let mut tw = Self::with_parts(config.interpreter.max_recursion_depth, load_path);
        tw.pathdef = pathdef;
        tw
    }

    fn with_parts(max_depth: usize, load_path: LoadPath) -> Self {
        let mut symtab = SymbolTable::new();
        builtins::install(&mut symtab);
        Evaluator {
            call_stack: CallStack::new(max_depth),
            symtab,
            load_path,
            base_workspace: HashMap::new(),
            pathdef: None,
            output: Output::Stdout,
        }
    }

    // ---- Output ----

    /// Collect displayed text instead of printing it
    pub fn capture_output(&mut self) {
        self.output = Output::Capture(Vec::new());
    }

    /// Take the lines collected since `capture_output`
    pub fn take_output(&mut self) -> Vec<String> {
        match &mut self.output {
            Output::Capture(lines) => std::mem::take(lines),
            Output::Stdout => Vec::new(),
        }
    }

    pub fn display(&mut self, text: &str) {
        match &mut self.output {
            Output::Stdout => println!("{text}"),
            Output::Capture(lines) => lines.push(text.to_string()),
        }
    }

    pub fn warning(&mut self, message: &str) {
        warn!(target: "numcall::warning", "{message}");
        if let Output::Capture(lines) = &mut self.output {
            lines.push(format!("warning: {message}"));
        }
    }

    // ---- Call stack ----

    pub fn call_stack(&self) -> &CallStack {
        &self.call_stack
    }

    /// Number of calls in progress
    pub fn depth(&self) -> usize {
        self.call_stack.depth()
    }

    pub fn max_recursion_depth(&self) -> usize {
        self.call_stack.max_depth()
    }

    /// Set the recursion limit, returning the previous limit
    pub fn set_max_recursion_depth(&mut self, limit: usize) -> InterpResult<usize> {
        self.call_stack.set_max_depth(limit)
    }

    /// Push a frame for `function`; must be matched by `pop_stack_frame`.
    ///
    /// Prefer `enter_frame`, which pops automatically.
    pub fn push_stack_frame(&mut self, function: &FunctionRef, nargin: usize, nargout: usize) -> InterpResult<FrameId> {
        let id = self.call_stack.push(function.clone(), nargin, nargout)?;
        trace!(frame = %id, function = function.name(), depth = self.depth(), "push frame");
        Ok(id)
    }

    /// Pop the innermost frame
    pub fn pop_stack_frame(&mut self) {
        if let Some(frame) = self.call_stack.pop() {
            trace!(frame = %frame.id(), function = frame.function().name(), depth = self.depth(), "pop frame");
        }
    }

    /// Push a frame for `function` and return a guard that pops it when
    /// dropped. The guard dereferences to the evaluator.
    pub fn enter_frame(&mut self, function: &FunctionRef, nargin: usize, nargout: usize) -> InterpResult<FrameGuard<'_>> {
        let id = self.push_stack_frame(function, nargin, nargout)?;
        Ok(FrameGuard { tw: self, id })
    }

    pub fn current_frame(&self) -> Option<&Frame> {
        self.call_stack.current()
    }

    /// Frame of the function that called the innermost one
    pub fn caller_frame(&self) -> Option<&Frame> {
        self.call_stack.caller()
    }

    // ---- Functions ----

    pub fn symbols(&self) -> &SymbolTable {
        &self.symtab
    }

    pub fn symbols_mut(&mut self) -> &mut SymbolTable {
        &mut self.symtab
    }

    /// Register a function and return a handle to it
    pub fn define_function(&mut self, function: impl Function + 'static) -> FunctionRef {
        let function = FunctionRef::new(function);
        self.symtab.install(function.clone());
        function
    }

    pub fn load_path(&self) -> &LoadPath {
        &self.load_path
    }

    pub fn load_path_mut(&mut self) -> &mut LoadPath {
        &mut self.load_path
    }

    pub fn pathdef_file(&self) -> Option<&Path> {
        self.pathdef.as_deref()
    }

    pub fn set_pathdef_file(&mut self, file: Option<PathBuf>) {
        self.pathdef = file;
    }

    /// Find the function `name` would call with `args`: a method of the
    /// first argument's class, else the plain function.
    pub fn resolve(&self, name: &str, args: &ValueList) -> InterpResult<FunctionRef> {
        if let Some(first) = args.first()
            && let Some(method) = self.symtab.find_method(first.class_name(), name)
        {
            return Ok(method);
        }
        self.symtab
            .find_function(name)
            .ok_or_else(|| RuntimeError::undefined_function(name))
    }

    /// Call the function named `name`
    pub fn feval(&mut self, name: &str, nargout: usize, args: &ValueList) -> InterpResult<ValueList> {
        let function = self.resolve(name, args)?;
        debug!(name, kind = %function.kind(), nargout, nargin = args.len(), "feval");
        function.call(self, nargout, args)
    }

    /// Call a function given by name or handle
    pub fn feval_value(&mut self, target: &Value, nargout: usize, args: &ValueList) -> InterpResult<ValueList> {
        match target {
            Value::Str(name) => self.feval(name, nargout, args),
            Value::Function(function) => function.call(self, nargout, args),
            other => Err(RuntimeError::type_error(
                "feval",
                "function handle or name",
                other.class_name(),
            )),
        }
    }

    // ---- Variables ----

    /// Bind `name` in the innermost frame, or the base workspace at top level
    pub fn assign(&mut self, name: &str, value: Value) {
        match self.call_stack.current_mut() {
            Some(frame) => frame.define(name, value),
            None => {
                self.base_workspace.insert(name.to_string(), value);
            }
        }
    }

    pub fn lookup_variable(&self, name: &str) -> Option<Value> {
        match self.call_stack.current() {
            Some(frame) => frame.get(name).cloned(),
            None => self.base_workspace.get(name).cloned(),
        }
    }

    pub fn is_variable(&self, name: &str) -> bool {
        match self.call_stack.current() {
            Some(frame) => frame.contains(name),
            None => self.base_workspace.contains_key(name),
        }
    }

    // ---- Tree evaluation ----

    /// Evaluate `expr` to exactly one value
    pub fn eval_expr(&mut self, expr: &Expr) -> InterpResult<Value> {
        match self.eval_multi(expr, 1)?.into_iter().next() {
            Some(value) => Ok(value),
            None => Err(RuntimeError::invalid_call(
                &expr.to_string(),
                "value on right hand side of assignment is undefined",
            )),
        }
    }

    /// Evaluate `expr` requesting `nargout` values
    pub fn eval_multi(&mut self, expr: &Expr, nargout: usize) -> InterpResult<ValueList> {
        match expr {
            Expr::Constant(value) => Ok(ValueList::one(value.clone())),
            Expr::Identifier(name) => match self.lookup_variable(name) {
                Some(value) => Ok(ValueList::one(value)),
                None => self.feval(name, nargout, &ValueList::new()),
            },
            Expr::Call { name, args } => {
                let args = self.eval_args(args)?;
                match self.lookup_variable(name) {
                    Some(Value::Function(function)) => function.call(self, nargout, &args),
                    Some(value) if args.is_empty() => Ok(ValueList::one(value)),
                    Some(value) => Err(RuntimeError::type_error(
                        name,
                        "function handle",
                        value.class_name(),
                    )),
                    None => self.feval(name, nargout, &args),
                }
            }
            Expr::FunctionHandle(name) => {
                let function = self.resolve(name, &ValueList::new())?;
                Ok(ValueList::one(Value::Function(function)))
            }
            Expr::AnonFcn { params, body } => {
                let captured = expr
                    .free_identifiers()
                    .into_iter()
                    .filter_map(|name| self.lookup_variable(&name).map(|value| (name, value)))
                    .collect();
                let function = AnonymousFunction::new(params.clone(), Rc::clone(body), captured);
                Ok(ValueList::one(Value::Function(FunctionRef::new(function))))
            }
        }
    }

    fn eval_args(&mut self, args: &[Expr]) -> InterpResult<ValueList> {
        args.iter().map(|arg| self.eval_expr(arg)).collect()
    }

    /// Execute a statement list in the innermost frame
    pub fn execute_body(&mut self, body: &[Statement]) -> InterpResult<Flow> {
        for statement in body {
            if self.execute_statement(statement)? == Flow::Return {
                return Ok(Flow::Return);
            }
        }
        Ok(Flow::Normal)
    }

    fn execute_statement(&mut self, statement: &Statement) -> InterpResult<Flow> {
        match statement {
            Statement::Assign { targets, expr } => {
                let values = self.eval_multi(expr, targets.len())?;
                if values.len() < targets.len() {
                    return Err(RuntimeError::undefined_element(values.len() + 1));
                }
                for (target, value) in targets.iter().zip(values) {
                    self.assign(target, value);
                }
                Ok(Flow::Normal)
            }
            Statement::Expression(expr) => {
                let is_variable = matches!(expr, Expr::Identifier(name) if self.is_variable(name));
                let values = self.eval_multi(expr, 0)?;
                if !is_variable && let Some(value) = values.into_iter().next() {
                    self.assign("ans", value);
                }
                Ok(Flow::Normal)
            }
            Statement::If {
                condition,
                then_body,
                else_body,
            } => {
                if self.eval_expr(condition)?.is_true() {
                    self.execute_body(then_body)
                } else {
                    self.execute_body(else_body)
                }
            }
            Statement::Return => Ok(Flow::Return),
        }
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

/// Scoped release of one pushed frame.
///
/// Dropping the guard pops the frame it pushed; this also runs while an
/// error or panic unwinds through the call.
#[derive(Debug)]
pub struct FrameGuard<'a> {
    tw: &'a mut Evaluator,
    id: FrameId,
}

impl FrameGuard<'_> {
    pub fn id(&self) -> FrameId {
        self.id
    }
}

impl Deref for FrameGuard<'_> {
    type Target = Evaluator;

    fn deref(&self) -> &Evaluator {
        self.tw
    }
}

impl DerefMut for FrameGuard<'_> {
    fn deref_mut(&mut self) -> &mut Evaluator {
        self.tw
    }
}

impl Drop for FrameGuard<'_> {
    fn drop(&mut self) {
        debug_assert_eq!(
            self.tw.current_frame().map(Frame::id),
            Some(self.id),
            "stack frames released out of order"
        );
        self.tw.pop_stack_frame();
    }
}
