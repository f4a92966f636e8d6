//! Function-call runtime
//!
//! Every callable value implements [`Function`] and is invoked through
//! [`FunctionRef::call`], which pushes a frame on the evaluator's
//! [`CallStack`], runs the function, and pops the frame again on every exit
//! path.

pub mod anon_fcn;
pub mod builtin;
pub mod builtins;
pub mod error;
pub mod eval;
pub mod filepos;
pub mod function;
pub mod method;
pub mod stack;
pub mod symtab;
pub mod tree;
pub mod user_fcn;
pub mod value;

pub use anon_fcn::AnonymousFunction;
pub use builtin::{BuiltinFn, BuiltinFunction};
pub use error::{ErrorKind, InterpResult, RuntimeError};
pub use eval::{Evaluator, Flow, FrameGuard};
pub use filepos::FilePos;
pub use function::{Function, FunctionKind, FunctionRef};
pub use method::ClassMethod;
pub use stack::{CallStack, DEFAULT_MAX_RECURSION_DEPTH, Frame, FrameId, FrameInfo};
pub use symtab::SymbolTable;
pub use tree::{Expr, Statement};
pub use user_fcn::UserFunction;
pub use value::{Value, ValueList};
