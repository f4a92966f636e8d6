//! The builtin function library

use super::builtin::BuiltinFn;
use super::error::{InterpResult, RuntimeError};
use super::eval::Evaluator;
use super::function::FunctionKind;
use super::symtab::SymbolTable;
use super::value::{Value, ValueList};
use crate::loadpath::{self, PATH_SEP, Position};
use std::path::PathBuf;

/// (name, implementation, one-line description)
const BUILTINS: &[(&str, BuiltinFn, &str)] = &[
    // arithmetic and comparison
    ("plus", builtin_plus, "plus (x, y): x + y"),
    ("minus", builtin_minus, "minus (x, y): x - y"),
    ("times", builtin_times, "times (x, y): x .* y"),
    ("rdivide", builtin_rdivide, "rdivide (x, y): x ./ y"),
    ("eq", builtin_eq, "eq (x, y): x == y"),
    ("ne", builtin_ne, "ne (x, y): x != y"),
    ("lt", builtin_lt, "lt (x, y): x < y"),
    ("le", builtin_le, "le (x, y): x <= y"),
    ("gt", builtin_gt, "gt (x, y): x > y"),
    ("ge", builtin_ge, "ge (x, y): x >= y"),
    ("not", builtin_not, "not (x): logical negation"),
    // output and errors
    ("disp", builtin_disp, "disp (x): display a value"),
    ("error", builtin_error, "error ([id,] msg): raise an error"),
    // functions and handles
    ("feval", builtin_feval, "feval (f, args...): call a function by name or handle"),
    ("func2str", builtin_func2str, "func2str (h): text of a function handle"),
    ("str2func", builtin_str2func, "str2func (name): handle to the named function"),
    ("class", builtin_class, "class (x): class name of a value"),
    // call stack
    ("nargin", builtin_nargin, "nargin (): number of arguments passed to the caller"),
    ("nargout", builtin_nargout, "nargout (): number of outputs requested from the caller"),
    (
        "max_recursion_depth",
        builtin_max_recursion_depth,
        "max_recursion_depth ([n]): query or set the nesting limit",
    ),
    ("dbstack", builtin_dbstack, "dbstack (): show the active calls"),
    // load path
    ("path", builtin_path, "path ([dirs...]): show or set the load path"),
    ("addpath", builtin_addpath, "addpath (dir..., [\"-begin\"|\"-end\"]): add directories"),
    ("rmpath", builtin_rmpath, "rmpath (dir...): remove directories"),
    ("genpath", builtin_genpath, "genpath (dir, [skip...]): dir and all subdirectories"),
    ("savepath", builtin_savepath, "savepath ([file]): save the load path"),
    ("restoredefaultpath", builtin_restoredefaultpath, "restoredefaultpath (): reset the load path"),
    ("which", builtin_which, "which (name...): locate functions"),
    ("pathsep", builtin_pathsep, "pathsep (): directory separator of path strings"),
];

/// Register every builtin in `symtab`
pub fn install(symtab: &mut SymbolTable) {
    for &(name, fcn, doc) in BUILTINS {
        symtab.install_builtin(name, fcn, doc);
    }
}

// ---- argument helpers ----

fn check_nargin(name: &str, args: &ValueList, min: usize, max: usize) -> InterpResult<()> {
    if args.len() > max {
        Err(RuntimeError::too_many_inputs(name))
    } else if args.len() < min {
        Err(RuntimeError::invalid_call(name, "not enough input arguments"))
    } else {
        Ok(())
    }
}

fn scalar_arg(name: &str, args: &ValueList, i: usize) -> InterpResult<f64> {
    let value = &args[i];
    value
        .as_scalar()
        .ok_or_else(|| RuntimeError::type_error(name, "numeric", value.class_name()))
}

fn string_arg<'a>(name: &str, args: &'a ValueList, i: usize) -> InterpResult<&'a str> {
    let value = &args[i];
    value
        .as_str()
        .ok_or_else(|| RuntimeError::type_error(name, "string", value.class_name()))
}

/// Directory arguments, each of which may hold several directories
/// separated by `pathsep`
fn dir_args(name: &str, args: &[Value]) -> InterpResult<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    for value in args {
        let text = value
            .as_str()
            .ok_or_else(|| RuntimeError::type_error(name, "string", value.class_name()))?;
        dirs.extend(loadpath::parse_path_string(text));
    }
    Ok(dirs)
}

/// The value list returned by functions whose only output is optional
fn optional_output(nargout: usize, value: impl Into<Value>) -> ValueList {
    if nargout == 0 {
        ValueList::new()
    } else {
        ValueList::one(value)
    }
}

// ---- arithmetic and comparison ----

fn binary_op(name: &str, args: &ValueList, op: fn(f64, f64) -> Value) -> InterpResult<ValueList> {
    check_nargin(name, args, 2, 2)?;
    let x = scalar_arg(name, args, 0)?;
    let y = scalar_arg(name, args, 1)?;
    Ok(ValueList::one(op(x, y)))
}

fn builtin_plus(_: &mut Evaluator, _: usize, args: &ValueList) -> InterpResult<ValueList> {
    binary_op("plus", args, |x, y| Value::Scalar(x + y))
}

fn builtin_minus(_: &mut Evaluator, _: usize, args: &ValueList) -> InterpResult<ValueList> {
    binary_op("minus", args, |x, y| Value::Scalar(x - y))
}

fn builtin_times(_: &mut Evaluator, _: usize, args: &ValueList) -> InterpResult<ValueList> {
    binary_op("times", args, |x, y| Value::Scalar(x * y))
}

fn builtin_rdivide(_: &mut Evaluator, _: usize, args: &ValueList) -> InterpResult<ValueList> {
    binary_op("rdivide", args, |x, y| Value::Scalar(x / y))
}

fn builtin_eq(_: &mut Evaluator, _: usize, args: &ValueList) -> InterpResult<ValueList> {
    binary_op("eq", args, |x, y| Value::Bool(x == y))
}

fn builtin_ne(_: &mut Evaluator, _: usize, args: &ValueList) -> InterpResult<ValueList> {
    binary_op("ne", args, |x, y| Value::Bool(x != y))
}

fn builtin_lt(_: &mut Evaluator, _: usize, args: &ValueList) -> InterpResult<ValueList> {
    binary_op("lt", args, |x, y| Value::Bool(x < y))
}

fn builtin_le(_: &mut Evaluator, _: usize, args: &ValueList) -> InterpResult<ValueList> {
    binary_op("le", args, |x, y| Value::Bool(x <= y))
}

fn builtin_gt(_: &mut Evaluator, _: usize, args: &ValueList) -> InterpResult<ValueList> {
    binary_op("gt", args, |x, y| Value::Bool(x > y))
}

fn builtin_ge(_: &mut Evaluator, _: usize, args: &ValueList) -> InterpResult<ValueList> {
    binary_op("ge", args, |x, y| Value::Bool(x >= y))
}

fn builtin_not(_: &mut Evaluator, _: usize, args: &ValueList) -> InterpResult<ValueList> {
    check_nargin("not", args, 1, 1)?;
    Ok(ValueList::one(!args[0].is_true()))
}

// ---- output and errors ----

fn builtin_disp(tw: &mut Evaluator, nargout: usize, args: &ValueList) -> InterpResult<ValueList> {
    check_nargin("disp", args, 1, 1)?;
    let text = args[0].to_string();
    if nargout > 0 {
        return Ok(ValueList::one(text));
    }
    tw.display(&text);
    Ok(ValueList::new())
}

/// `error (msg)` or `error (id, msg)`. A first argument is taken as an
/// identifier when another argument follows and it looks like `a:b`.
fn builtin_error(_: &mut Evaluator, _: usize, args: &ValueList) -> InterpResult<ValueList> {
    check_nargin("error", args, 1, 2)?;
    let first = string_arg("error", args, 0)?;
    if args.len() == 2 {
        let message = string_arg("error", args, 1)?;
        if is_identifier(first) {
            return Err(RuntimeError::user(Some(first), message));
        }
        return Err(RuntimeError::user(None, format!("{first} {message}")));
    }
    Err(RuntimeError::user(None, first))
}

fn is_identifier(text: &str) -> bool {
    text.contains(':')
        && !text.ends_with(':')
        && !text.starts_with(':')
        && !text.chars().any(char::is_whitespace)
}

// ---- functions and handles ----

fn builtin_feval(tw: &mut Evaluator, nargout: usize, args: &ValueList) -> InterpResult<ValueList> {
    if args.is_empty() {
        return Err(RuntimeError::invalid_call("feval", "not enough input arguments"));
    }
    tw.feval_value(&args[0], nargout, &args.slice_from(1))
}

fn builtin_func2str(_: &mut Evaluator, _: usize, args: &ValueList) -> InterpResult<ValueList> {
    check_nargin("func2str", args, 1, 1)?;
    let function = args[0]
        .as_function()
        .ok_or_else(|| RuntimeError::type_error("func2str", "function handle", args[0].class_name()))?;
    let text = match function.kind() {
        FunctionKind::AnonymousFunction => function.display_text(),
        _ => function.name().to_string(),
    };
    Ok(ValueList::one(text))
}

fn builtin_str2func(tw: &mut Evaluator, _: usize, args: &ValueList) -> InterpResult<ValueList> {
    check_nargin("str2func", args, 1, 1)?;
    let text = string_arg("str2func", args, 0)?;
    let name = text.strip_prefix('@').unwrap_or(text).trim();
    if name.starts_with('(') {
        return Err(RuntimeError::invalid_call(
            "str2func",
            "anonymous function text cannot be converted",
        ));
    }
    let function = tw.resolve(name, &ValueList::new())?;
    Ok(ValueList::one(function))
}

fn builtin_class(_: &mut Evaluator, _: usize, args: &ValueList) -> InterpResult<ValueList> {
    check_nargin("class", args, 1, 1)?;
    Ok(ValueList::one(args[0].class_name()))
}

// ---- call stack ----

fn builtin_nargin(tw: &mut Evaluator, _: usize, args: &ValueList) -> InterpResult<ValueList> {
    check_nargin("nargin", args, 0, 0)?;
    let caller = tw
        .caller_frame()
        .ok_or_else(|| RuntimeError::invalid_call("nargin", "invalid use at top level"))?;
    Ok(ValueList::one(caller.nargin() as f64))
}

fn builtin_nargout(tw: &mut Evaluator, _: usize, args: &ValueList) -> InterpResult<ValueList> {
    check_nargin("nargout", args, 0, 0)?;
    let caller = tw
        .caller_frame()
        .ok_or_else(|| RuntimeError::invalid_call("nargout", "invalid use at top level"))?;
    Ok(ValueList::one(caller.nargout() as f64))
}

/// Returns the limit in effect before the call
fn builtin_max_recursion_depth(tw: &mut Evaluator, _: usize, args: &ValueList) -> InterpResult<ValueList> {
    check_nargin("max_recursion_depth", args, 0, 1)?;
    let old = tw.max_recursion_depth();
    if !args.is_empty() {
        let n = scalar_arg("max_recursion_depth", args, 0)?;
        if n < 0.0 || n.fract() != 0.0 {
            return Err(RuntimeError::invalid_call(
                "max_recursion_depth",
                "argument must be a non-negative integer",
            ));
        }
        tw.set_max_recursion_depth(n as usize)?;
    }
    Ok(ValueList::one(old as f64))
}

/// Active calls, innermost first, not counting `dbstack` itself
fn builtin_dbstack(tw: &mut Evaluator, nargout: usize, args: &ValueList) -> InterpResult<ValueList> {
    check_nargin("dbstack", args, 0, 0)?;
    let frames: Vec<String> = tw
        .call_stack()
        .backtrace()
        .into_iter()
        .skip(1)
        .map(|info| info.to_string())
        .collect();

    if nargout > 0 {
        let cell = frames.into_iter().map(Value::Str).collect();
        return Ok(ValueList::one(Value::Cell(cell)));
    }
    if !frames.is_empty() {
        tw.display("stopped in:");
        tw.display("");
        for (i, frame) in frames.iter().enumerate() {
            let marker = if i == 0 { "-->" } else { "   " };
            tw.display(&format!("  {marker} {frame}"));
        }
    }
    Ok(ValueList::new())
}

// ---- load path ----

fn builtin_path(tw: &mut Evaluator, nargout: usize, args: &ValueList) -> InterpResult<ValueList> {
    if !args.is_empty() {
        let dirs = dir_args("path", args.as_slice())?;
        tw.load_path_mut().set(dirs);
    }
    if nargout > 0 {
        return Ok(ValueList::one(tw.load_path().to_path_string()));
    }
    if args.is_empty() {
        let dirs: Vec<String> = tw.load_path().dirs().iter().map(|d| d.display().to_string()).collect();
        tw.display("");
        tw.display("numcall's search path contains the following directories:");
        tw.display("");
        for dir in dirs {
            tw.display(&dir);
        }
        tw.display("");
    }
    Ok(ValueList::new())
}

/// Returns the previous path when an output is requested
fn builtin_addpath(tw: &mut Evaluator, nargout: usize, args: &ValueList) -> InterpResult<ValueList> {
    if args.is_empty() {
        return Err(RuntimeError::invalid_call("addpath", "not enough input arguments"));
    }
    let mut dir_values = args.as_slice();
    let mut position = Position::Begin;
    if let Some((last, rest)) = dir_values.split_last()
        && !rest.is_empty()
    {
        let option = match last {
            Value::Str(s) if s == "-begin" || s == "-BEGIN" => Some(Position::Begin),
            Value::Str(s) if s == "-end" || s == "-END" => Some(Position::End),
            Value::Scalar(x) if *x == 0.0 => Some(Position::Begin),
            Value::Scalar(x) if *x == 1.0 => Some(Position::End),
            Value::Scalar(_) => {
                return Err(RuntimeError::invalid_call("addpath", "OPTION must be '-begin'/0 or '-end'/1"));
            }
            _ => None,
        };
        if let Some(option) = option {
            position = option;
            dir_values = rest;
        }
    }

    let dirs = dir_args("addpath", dir_values)?;
    let old = tw.load_path().to_path_string();
    let warnings = tw.load_path_mut().add(&dirs, position);
    for warning in warnings {
        tw.warning(&warning);
    }
    Ok(optional_output(nargout, old))
}

fn builtin_rmpath(tw: &mut Evaluator, nargout: usize, args: &ValueList) -> InterpResult<ValueList> {
    if args.is_empty() {
        return Err(RuntimeError::invalid_call("rmpath", "not enough input arguments"));
    }
    let dirs = dir_args("rmpath", args.as_slice())?;
    let old = tw.load_path().to_path_string();
    let warnings = tw.load_path_mut().remove(&dirs);
    for warning in warnings {
        tw.warning(&warning);
    }
    Ok(optional_output(nargout, old))
}

fn builtin_genpath(tw: &mut Evaluator, _: usize, args: &ValueList) -> InterpResult<ValueList> {
    if args.is_empty() {
        return Err(RuntimeError::invalid_call("genpath", "not enough input arguments"));
    }
    let dir = string_arg("genpath", args, 0)?;
    let skip = (1..args.len())
        .map(|i| string_arg("genpath", args, i))
        .collect::<InterpResult<Vec<_>>>()?;
    let (dirs, warnings) = loadpath::genpath(dir.as_ref(), &skip);
    for warning in warnings {
        tw.warning(&warning);
    }
    Ok(ValueList::one(loadpath::join_path(&dirs)))
}

fn builtin_savepath(tw: &mut Evaluator, nargout: usize, args: &ValueList) -> InterpResult<ValueList> {
    check_nargin("savepath", args, 0, 1)?;
    let file = if args.is_empty() {
        tw.pathdef_file()
            .map(PathBuf::from)
            .ok_or_else(|| RuntimeError::invalid_call("savepath", "no pathdef file configured"))?
    } else {
        PathBuf::from(string_arg("savepath", args, 0)?)
    };
    tw.load_path()
        .save(&file)
        .map_err(|err| RuntimeError::io_error("savepath", &err))?;
    Ok(optional_output(nargout, 0.0))
}

fn builtin_restoredefaultpath(tw: &mut Evaluator, nargout: usize, args: &ValueList) -> InterpResult<ValueList> {
    check_nargin("restoredefaultpath", args, 0, 0)?;
    tw.load_path_mut().restore_default();
    Ok(optional_output(nargout, tw.load_path().to_path_string()))
}

fn builtin_which(tw: &mut Evaluator, nargout: usize, args: &ValueList) -> InterpResult<ValueList> {
    let mut found = Vec::with_capacity(args.len());
    for i in 0..args.len() {
        let name = string_arg("which", args, i)?;
        let (description, location) = match tw.symbols().find_function(name) {
            Some(f) => match (f.kind(), f.file_name()) {
                (_, Some(file)) => (
                    Some(format!("'{name}' is a function from the file {}", file.display())),
                    file.display().to_string(),
                ),
                (FunctionKind::Builtin, None) => {
                    (Some(format!("'{name}' is a built-in function")), "built-in".to_string())
                }
                (_, None) => (Some(format!("'{name}' is a command-line function")), String::new()),
            },
            None => match tw.load_path().find_fcn_file(name) {
                Some(file) => (
                    Some(format!("'{name}' is the file {}", file.display())),
                    file.display().to_string(),
                ),
                None => (None, String::new()),
            },
        };
        if nargout == 0 {
            if let Some(text) = description {
                tw.display(&text);
            }
        } else {
            found.push(Value::Str(location));
        }
    }

    Ok(match (nargout, found.len()) {
        (0, _) => ValueList::new(),
        (_, 1) => found.into_iter().collect(),
        _ => ValueList::one(Value::Cell(found)),
    })
}

fn builtin_pathsep(_: &mut Evaluator, _: usize, args: &ValueList) -> InterpResult<ValueList> {
    check_nargin("pathsep", args, 0, 0)?;
    Ok(ValueList::one(PATH_SEP.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interp::error::ErrorKind;
    use crate::interp::filepos::FilePos;
    use crate::interp::tree::{Expr, Statement};
    use crate::interp::user_fcn::UserFunction;

    fn eval() -> Evaluator {
        let mut tw = Evaluator::new();
        tw.capture_output();
        tw
    }

    fn args(values: Vec<Value>) -> ValueList {
        ValueList::from(values)
    }

    #[test]
    fn test_all_installed() {
        let tw = Evaluator::new();
        for (name, _, doc) in BUILTINS {
            let f = tw.symbols().find_function(name).unwrap();
            assert_eq!(f.kind(), FunctionKind::Builtin);
            assert_eq!(f.doc_string(), *doc);
        }
    }

    #[test]
    fn test_arithmetic() {
        let mut tw = eval();
        let two = args(vec![Value::Scalar(6.0), Value::Scalar(3.0)]);
        assert_eq!(tw.feval("plus", 1, &two).unwrap()[0], Value::Scalar(9.0));
        assert_eq!(tw.feval("minus", 1, &two).unwrap()[0], Value::Scalar(3.0));
        assert_eq!(tw.feval("rdivide", 1, &two).unwrap()[0], Value::Scalar(2.0));
        assert_eq!(tw.feval("gt", 1, &two).unwrap()[0], Value::Bool(true));
        assert_eq!(tw.feval("not", 1, &ValueList::one(0.0)).unwrap()[0], Value::Bool(true));

        let err = tw.feval("plus", 1, &args(vec![Value::str("a"), Value::Scalar(1.0)])).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeError);
        let err = tw.feval("plus", 1, &ValueList::one(1.0)).unwrap_err();
        assert_eq!(err.message, "plus: not enough input arguments");
    }

    #[test]
    fn test_disp_and_error() {
        let mut tw = eval();
        tw.feval("disp", 0, &ValueList::one(42.0)).unwrap();
        assert_eq!(tw.take_output(), vec!["42"]);

        let err = tw
            .feval("error", 0, &args(vec![Value::str("pkg:fail"), Value::str("it broke")]))
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::User);
        assert_eq!(err.identifier.as_deref(), Some("pkg:fail"));
        assert_eq!(err.message, "it broke");
        assert_eq!(tw.depth(), 0);
    }

    #[test]
    fn test_feval_by_name_and_handle() {
        let mut tw = eval();
        let call = args(vec![Value::str("times"), Value::Scalar(4.0), Value::Scalar(5.0)]);
        assert_eq!(tw.feval("feval", 1, &call).unwrap()[0], Value::Scalar(20.0));

        let handle = tw.feval("str2func", 1, &ValueList::one("@minus")).unwrap();
        let call = args(vec![handle[0].clone(), Value::Scalar(4.0), Value::Scalar(5.0)]);
        assert_eq!(tw.feval("feval", 1, &call).unwrap()[0], Value::Scalar(-1.0));

        let text = tw.feval("func2str", 1, &handle).unwrap();
        assert_eq!(text[0], Value::str("minus"));

        let err = tw.feval("feval", 1, &ValueList::one(3.0)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeError);
    }

    #[test]
    fn test_class() {
        let mut tw = eval();
        let out = tw.feval("class", 1, &ValueList::one(true)).unwrap();
        assert_eq!(out[0], Value::str("logical"));
    }

    #[test]
    fn test_nargin_nargout_read_caller_frame() {
        let mut tw = eval();
        tw.define_function(UserFunction::new(
            "counts",
            &["a", "b", "c"],
            &["i", "o"],
            vec![
                Statement::assign("i", Expr::call("nargin", vec![])),
                Statement::assign("o", Expr::call("nargout", vec![])),
            ],
        ));
        let out = tw
            .feval("counts", 2, &args(vec![Value::Scalar(1.0), Value::Scalar(2.0)]))
            .unwrap();
        assert_eq!(out.into_vec(), vec![Value::Scalar(2.0), Value::Scalar(2.0)]);

        let err = tw.feval("nargin", 1, &ValueList::new()).unwrap_err();
        assert_eq!(err.message, "nargin: invalid use at top level");
    }

    #[test]
    fn test_max_recursion_depth() {
        let mut tw = eval();
        let old = tw.feval("max_recursion_depth", 1, &ValueList::one(10.0)).unwrap();
        assert_eq!(old[0], Value::Scalar(256.0));
        assert_eq!(tw.max_recursion_depth(), 10);

        let err = tw.feval("max_recursion_depth", 1, &ValueList::one(0.0)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidCall);
        assert_eq!(tw.max_recursion_depth(), 10);
        let err = tw.feval("max_recursion_depth", 1, &ValueList::one(1.5)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidCall);
    }

    #[test]
    fn test_dbstack_lists_callers() {
        let mut tw = eval();
        tw.define_function(
            UserFunction::new("inner", &[], &[], vec![Statement::Expression(Expr::call("dbstack", vec![]))])
                .with_source_range(FilePos::new(10, 1), FilePos::new(12, 3)),
        );
        tw.define_function(UserFunction::new(
            "outer",
            &[],
            &[],
            vec![Statement::Expression(Expr::call("inner", vec![]))],
        ));
        tw.feval("outer", 0, &ValueList::new()).unwrap();
        insta::assert_snapshot!(tw.take_output().join("\n"), @r"
        stopped in:

          --> inner at line 10 column 1
              outer
        ");
    }

    #[test]
    fn test_dbstack_returns_cell() {
        let mut tw = eval();
        tw.define_function(UserFunction::new(
            "where",
            &[],
            &["s"],
            vec![Statement::assign("s", Expr::call("dbstack", vec![]))],
        ));
        let out = tw.feval("where", 1, &ValueList::new()).unwrap();
        assert_eq!(out[0], Value::Cell(vec![Value::str("where")]));
    }

    #[test]
    fn test_path_builtins() {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(root.path().join("lib/sub")).unwrap();
        let lib = root.path().join("lib");
        let lib_text = lib.display().to_string();
        let mut tw = eval();

        tw.feval("addpath", 0, &ValueList::one(lib_text.as_str())).unwrap();
        assert_eq!(tw.load_path().dirs(), &[lib.clone()]);

        let expanded = tw.feval("genpath", 1, &ValueList::one(lib_text.as_str())).unwrap();
        let expected = format!("{}{PATH_SEP}{}", lib.display(), lib.join("sub").display());
        assert_eq!(expanded[0], Value::Str(expected));

        tw.feval("addpath", 0, &args(vec![expanded[0].clone(), Value::str("-end")]))
            .unwrap();
        assert_eq!(tw.load_path().dirs(), &[lib.clone(), lib.join("sub")]);

        let old = tw.feval("rmpath", 1, &ValueList::one(lib_text.as_str())).unwrap();
        assert!(matches!(&old[0], Value::Str(s) if s.contains(PATH_SEP)));
        assert_eq!(tw.load_path().dirs(), &[lib.join("sub")]);

        tw.feval("rmpath", 0, &ValueList::one(lib_text.as_str())).unwrap();
        assert_eq!(tw.take_output(), vec![format!("warning: rmpath: {lib_text}: not found")]);

        tw.feval("restoredefaultpath", 0, &ValueList::new()).unwrap();
        assert!(tw.load_path().is_empty());
    }

    #[test]
    fn test_savepath_and_which() {
        let root = tempfile::tempdir().unwrap();
        let file = root.path().join("saved_path");
        std::fs::write(root.path().join("solver.m"), "").unwrap();
        let mut tw = eval();
        tw.feval("addpath", 0, &ValueList::one(root.path().display().to_string()))
            .unwrap();

        let err = tw.feval("savepath", 0, &ValueList::new()).unwrap_err();
        assert_eq!(err.message, "savepath: no pathdef file configured");
        tw.set_pathdef_file(Some(file.clone()));
        tw.feval("savepath", 0, &ValueList::new()).unwrap();
        assert_eq!(
            crate::loadpath::LoadPath::load_saved(&file).unwrap(),
            vec![root.path().to_path_buf()]
        );

        tw.feval("which", 0, &args(vec![Value::str("plus"), Value::str("solver")]))
            .unwrap();
        let lines = tw.take_output();
        assert_eq!(lines[0], "'plus' is a built-in function");
        assert!(lines[1].starts_with("'solver' is the file "));
        assert!(lines[1].ends_with("solver.m"));
    }
}
