//! Function registry

use super::builtin::{BuiltinFn, BuiltinFunction};
use super::function::FunctionRef;
use super::method::ClassMethod;
use std::collections::HashMap;

/// Functions and class methods known to an evaluator
#[derive(Debug, Default)]
pub struct SymbolTable {
    functions: HashMap<String, FunctionRef>,
    /// (class, name) -> method
    methods: HashMap<(String, String), FunctionRef>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `function` under its own name, replacing any previous
    /// definition. Returns the replaced function.
    pub fn install(&mut self, function: FunctionRef) -> Option<FunctionRef> {
        self.functions.insert(function.name().to_string(), function)
    }

    pub fn install_builtin(&mut self, name: &str, fcn: BuiltinFn, doc: &'static str) {
        self.install(FunctionRef::new(BuiltinFunction::new(name, fcn, doc)));
    }

    /// Register `target` as a method of `class`
    pub fn install_method(&mut self, class: &str, target: FunctionRef) {
        let key = (class.to_string(), target.name().to_string());
        self.methods
            .insert(key, FunctionRef::new(ClassMethod::new(class, target)));
    }

    pub fn find_function(&self, name: &str) -> Option<FunctionRef> {
        self.functions.get(name).cloned()
    }

    pub fn find_method(&self, class: &str, name: &str) -> Option<FunctionRef> {
        self.methods
            .get(&(class.to_string(), name.to_string()))
            .cloned()
    }

    pub fn is_function(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Remove a function definition; returns true if one was removed
    pub fn clear_function(&mut self, name: &str) -> bool {
        self.functions.remove(name).is_some()
    }

    /// Registered function names, sorted
    pub fn function_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
