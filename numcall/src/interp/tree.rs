//! Function bodies
//!
//! The tree is built by the host program (or tests); it is never parsed from
//! source text. It covers just enough to express bodies that call other
//! functions, branch and return.

use super::value::Value;
use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;

/// Expression
#[derive(Debug, Clone)]
pub enum Expr {
    Constant(Value),
    Identifier(String),
    /// `name (args...)`: a variable holding a handle, or a function
    Call { name: String, args: Vec<Expr> },
    /// `@name`
    FunctionHandle(String),
    /// `@(params) body`
    AnonFcn { params: Vec<String>, body: Rc<Expr> },
}

impl Expr {
    pub fn constant(value: impl Into<Value>) -> Self {
        Expr::Constant(value.into())
    }

    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Identifier(name.into())
    }

    pub fn call(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Call {
            name: name.into(),
            args,
        }
    }

    pub fn handle(name: impl Into<String>) -> Self {
        Expr::FunctionHandle(name.into())
    }

    pub fn anon_fcn(params: &[&str], body: Expr) -> Self {
        Expr::AnonFcn {
            params: params.iter().map(|p| p.to_string()).collect(),
            body: Rc::new(body),
        }
    }

    /// Identifiers referenced by this expression that are not bound by an
    /// enclosing anonymous function parameter list
    pub fn free_identifiers(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        self.collect_free(&mut Vec::new(), &mut names);
        names
    }

    fn collect_free(&self, bound: &mut Vec<String>, names: &mut BTreeSet<String>) {
        match self {
            Expr::Constant(_) | Expr::FunctionHandle(_) => {}
            Expr::Identifier(name) => {
                if !bound.contains(name) {
                    names.insert(name.clone());
                }
            }
            Expr::Call { name, args } => {
                if !bound.contains(name) {
                    names.insert(name.clone());
                }
                for arg in args {
                    arg.collect_free(bound, names);
                }
            }
            Expr::AnonFcn { params, body } => {
                let mark = bound.len();
                bound.extend(params.iter().cloned());
                body.collect_free(bound, names);
                bound.truncate(mark);
            }
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Constant(Value::Str(s)) => write!(f, "'{}'", s.replace('\'', "''")),
            Expr::Constant(Value::Empty) => write!(f, "[]"),
            Expr::Constant(value) => write!(f, "{value}"),
            Expr::Identifier(name) => write!(f, "{name}"),
            Expr::Call { name, args } => {
                write!(f, "{name} (")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            }
            Expr::FunctionHandle(name) => write!(f, "@{name}"),
            Expr::AnonFcn { params, body } => write!(f, "@({}) {}", params.join(", "), body),
        }
    }
}

/// Statement
#[derive(Debug, Clone)]
pub enum Statement {
    /// `[a, b] = expr`; a single target is `a = expr`
    Assign { targets: Vec<String>, expr: Expr },
    /// Expression evaluated for its side effects
    Expression(Expr),
    If {
        condition: Expr,
        then_body: Vec<Statement>,
        else_body: Vec<Statement>,
    },
    Return,
}

impl Statement {
    pub fn assign(target: impl Into<String>, expr: Expr) -> Self {
        Statement::Assign {
            targets: vec![target.into()],
            expr,
        }
    }

    pub fn assign_multi(targets: &[&str], expr: Expr) -> Self {
        Statement::Assign {
            targets: targets.iter().map(|t| t.to_string()).collect(),
            expr,
        }
    }

    pub fn if_else(condition: Expr, then_body: Vec<Statement>, else_body: Vec<Statement>) -> Self {
        Statement::If {
            condition,
            then_body,
            else_body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_anon_fcn() {
        let e = Expr::anon_fcn(&["x"], Expr::call("plus", vec![Expr::ident("x"), Expr::ident("k")]));
        assert_eq!(e.to_string(), "@(x) plus (x, k)");
    }

    #[test]
    fn test_display_constants() {
        assert_eq!(Expr::constant("it's").to_string(), "'it''s'");
        assert_eq!(Expr::Constant(Value::Empty).to_string(), "[]");
        assert_eq!(Expr::constant(2.5).to_string(), "2.5");
        assert_eq!(Expr::handle("sin").to_string(), "@sin");
    }

    #[test]
    fn test_free_identifiers_skip_params() {
        let e = Expr::anon_fcn(
            &["x"],
            Expr::call("plus", vec![Expr::ident("x"), Expr::ident("k")]),
        );
        let names: Vec<_> = e.free_identifiers().into_iter().collect();
        assert_eq!(names, vec!["k".to_string(), "plus".to_string()]);
    }

    #[test]
    fn test_free_identifiers_nested_scope_restored() {
        let inner = Expr::anon_fcn(&["y"], Expr::ident("y"));
        let e = Expr::call("f", vec![inner, Expr::ident("y")]);
        let names: Vec<_> = e.free_identifiers().into_iter().collect();
        assert_eq!(names, vec!["f".to_string(), "y".to_string()]);
    }
}
