// SPDX-License-Identifier: MIT

//! Built-in functions callable from expressions

use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{ExprError, Result};

/// A built-in function. Arguments arrive already evaluated.
pub trait BuiltinFunction: Send + Sync {
    fn name(&self) -> &str;

    /// Exact number of arguments accepted
    fn arity(&self) -> usize;

    fn call(&self, args: &[Value]) -> Result<Value>;
}

/// Fixed set of functions available to an evaluator
#[derive(Clone)]
pub struct FunctionRegistry {
    functions: HashMap<String, Arc<dyn BuiltinFunction>>,
}

impl FunctionRegistry {
    /// A registry with no functions
    pub(crate) fn new() -> Self {
        Self {
            functions: HashMap::new(),
        }
    }

    /// `startsWith`, `endsWith` and `contains`
    pub(crate) fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(StringPredicate::new("startsWith", |a, b| {
            a.starts_with(b)
        })));
        registry.register(Arc::new(StringPredicate::new("endsWith", |a, b| {
            a.ends_with(b)
        })));
        registry.register(Arc::new(StringPredicate::new("contains", |a, b| {
            a.contains(b)
        })));
        registry
    }

    pub(crate) fn register(&mut self, function: Arc<dyn BuiltinFunction>) {
        self.functions.insert(function.name().to_string(), function);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn BuiltinFunction>> {
        self.functions.get(name).cloned()
    }

    /// Look up `name`, failing for unknown functions or a wrong argument count
    pub fn resolve(&self, name: &str, arg_count: usize) -> Result<Arc<dyn BuiltinFunction>> {
        let function = self
            .get(name)
            .ok_or_else(|| ExprError::UnknownFunction(name.to_string()))?;
        if function.arity() != arg_count {
            return Err(ExprError::arity(name, function.arity(), arg_count));
        }
        Ok(function)
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

/// Two-argument string test. Non-string arguments count as the empty string
/// and single quotes are removed before comparing.
struct StringPredicate {
    name: &'static str,
    test: fn(&str, &str) -> bool,
}

impl StringPredicate {
    fn new(name: &'static str, test: fn(&str, &str) -> bool) -> Self {
        Self { name, test }
    }
}

impl BuiltinFunction for StringPredicate {
    fn name(&self) -> &str {
        self.name
    }

    fn arity(&self) -> usize {
        2
    }

    fn call(&self, args: &[Value]) -> Result<Value> {
        if args.len() != 2 {
            return Err(ExprError::arity(self.name, 2, args.len()));
        }
        let a = coerce_str(&args[0]);
        let b = coerce_str(&args[1]);
        Ok(Value::Bool((self.test)(&a, &b)))
    }
}

fn coerce_str(value: &Value) -> String {
    value.as_str().unwrap_or_default().replace('\'', "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Always;

    impl BuiltinFunction for Always {
        fn name(&self) -> &str {
            "always"
        }

        fn arity(&self) -> usize {
            0
        }

        fn call(&self, _args: &[Value]) -> Result<Value> {
            Ok(json!(true))
        }
    }

    fn call(name: &str, args: &[Value]) -> Value {
        FunctionRegistry::with_builtins()
            .resolve(name, args.len())
            .unwrap()
            .call(args)
            .unwrap()
    }

    #[test]
    fn test_starts_with() {
        assert_eq!(
            call("startsWith", &[json!("refs/heads/main"), json!("refs/heads/")]),
            json!(true)
        );
        assert_eq!(
            call("startsWith", &[json!("refs/tags/v1"), json!("refs/heads/")]),
            json!(false)
        );
    }

    #[test]
    fn test_ends_with_and_contains() {
        assert_eq!(call("endsWith", &[json!("app.tar.gz"), json!(".gz")]), json!(true));
        assert_eq!(call("contains", &[json!("hello world"), json!("lo w")]), json!(true));
        assert_eq!(call("contains", &[json!("hello"), json!("bye")]), json!(false));
    }

    #[test]
    fn test_quotes_are_stripped() {
        assert_eq!(
            call("startsWith", &[json!("'refs/tags/v1'"), json!("refs/tags")]),
            json!(true)
        );
    }

    #[test]
    fn test_non_string_arguments_are_empty() {
        // Everything starts with the empty string; nothing non-empty starts a null
        assert_eq!(call("startsWith", &[json!("abc"), json!(12)]), json!(true));
        assert_eq!(call("startsWith", &[json!(null), json!("a")]), json!(false));
    }

    #[test]
    fn test_unknown_function() {
        let err = FunctionRegistry::with_builtins()
            .resolve("format", 2)
            .err()
            .unwrap();
        assert!(matches!(err, ExprError::UnknownFunction(name) if name == "format"));
    }

    #[test]
    fn test_arity_mismatch() {
        let err = FunctionRegistry::with_builtins()
            .resolve("startsWith", 1)
            .err()
            .unwrap();
        assert!(matches!(
            err,
            ExprError::ArityMismatch {
                expected: 2,
                actual: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_default_registry_is_builtins_only() {
        let registry = FunctionRegistry::default();
        let mut names: Vec<_> = registry.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        assert_eq!(names, vec!["contains", "endsWith", "startsWith"]);
    }

    #[test]
    fn test_register_custom_function() {
        let mut registry = FunctionRegistry::new();
        assert!(registry.get("always").is_none());

        registry.register(Arc::new(Always));
        let function = registry.resolve("always", 0).unwrap();
        assert_eq!(function.call(&[]).unwrap(), json!(true));
    }
}
