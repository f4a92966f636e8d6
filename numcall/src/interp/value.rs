//! Runtime values for the interpreter

use super::function::FunctionRef;
use std::fmt;
use std::ops::Index;

/// Runtime value
#[derive(Debug, Clone)]
pub enum Value {
    /// The empty matrix `[]`
    Empty,
    /// Double-precision scalar
    Scalar(f64),
    /// Logical scalar
    Bool(bool),
    /// Character string
    Str(String),
    /// Cell array (row)
    Cell(Vec<Value>),
    /// Function handle
    Function(FunctionRef),
}

impl Value {
    pub fn str(s: impl Into<String>) -> Self {
        Value::Str(s.into())
    }

    /// Class name as reported by `class`
    pub fn class_name(&self) -> &'static str {
        match self {
            Value::Empty | Value::Scalar(_) => "double",
            Value::Bool(_) => "logical",
            Value::Str(_) => "char",
            Value::Cell(_) => "cell",
            Value::Function(_) => "function_handle",
        }
    }

    /// Truth value used by conditionals; `[]` is false
    pub fn is_true(&self) -> bool {
        match self {
            Value::Empty => false,
            Value::Scalar(x) => *x != 0.0,
            Value::Bool(b) => *b,
            Value::Str(s) => !s.is_empty() && s.chars().all(|c| c != '\0'),
            Value::Cell(items) => !items.is_empty(),
            Value::Function(_) => true,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Value::Empty => true,
            Value::Str(s) => s.is_empty(),
            Value::Cell(items) => items.is_empty(),
            _ => false,
        }
    }

    /// Number of elements
    pub fn numel(&self) -> usize {
        match self {
            Value::Empty => 0,
            Value::Str(s) => s.chars().count(),
            Value::Cell(items) => items.len(),
            _ => 1,
        }
    }

    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Value::Scalar(x) => Some(*x),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&FunctionRef> {
        match self {
            Value::Function(f) => Some(f),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Empty => write!(f, "[](0x0)"),
            Value::Scalar(x) => {
                if x.fract() == 0.0 && x.abs() < 1e15 {
                    write!(f, "{}", *x as i64)
                } else {
                    write!(f, "{x}")
                }
            }
            Value::Bool(b) => write!(f, "{}", u8::from(*b)),
            Value::Str(s) => write!(f, "{s}"),
            Value::Cell(items) => {
                write!(f, "{{")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    match item {
                        Value::Str(s) => write!(f, "'{s}'")?,
                        other => write!(f, "{other}")?,
                    }
                }
                write!(f, "}}")
            }
            Value::Function(func) => write!(f, "{}", func.display_text()),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Empty, Value::Empty) => true,
            (Value::Scalar(a), Value::Scalar(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Cell(a), Value::Cell(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Scalar(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<FunctionRef> for Value {
    fn from(f: FunctionRef) -> Self {
        Value::Function(f)
    }
}

/// Ordered list of values passed to and returned from every call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueList(Vec<Value>);

impl ValueList {
    pub fn new() -> Self {
        ValueList(Vec::new())
    }

    /// A list holding a single value
    pub fn one(value: impl Into<Value>) -> Self {
        ValueList(vec![value.into()])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.0.get(index)
    }

    pub fn first(&self) -> Option<&Value> {
        self.0.first()
    }

    pub fn push(&mut self, value: impl Into<Value>) {
        self.0.push(value.into());
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Value] {
        &self.0
    }

    /// Values from `start` on, as a new list
    pub fn slice_from(&self, start: usize) -> ValueList {
        ValueList(self.0.get(start..).map(<[Value]>::to_vec).unwrap_or_default())
    }

    pub fn into_vec(self) -> Vec<Value> {
        self.0
    }
}

impl From<Vec<Value>> for ValueList {
    fn from(values: Vec<Value>) -> Self {
        ValueList(values)
    }
}

impl FromIterator<Value> for ValueList {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        ValueList(iter.into_iter().collect())
    }
}

impl IntoIterator for ValueList {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValueList {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Index<usize> for ValueList {
    type Output = Value;

    fn index(&self, index: usize) -> &Value {
        &self.0[index]
    }
}
