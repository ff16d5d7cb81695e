//! Expression evaluator
//!
//! Walks a parsed [`Expression`] once against a [`Context`]. Comparisons are
//! weak: values of different kinds are never equal and never coerced, and
//! ordering operators on incomparable operands yield `false` rather than an
//! error.

use serde_json::{Number, Value};
use std::cmp::Ordering;

use super::ast::{ComparisonOp, Expression, Function, Literal, Object};
use super::context::Context;
use super::functions::FunctionRegistry;
use crate::error::{ExprError, Result};

static NULL: Value = Value::Null;

/// Evaluates expressions using a fixed function registry
#[derive(Clone, Default)]
pub struct Evaluator {
    functions: FunctionRegistry,
}

impl Evaluator {
    /// Evaluator with the built-in functions
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluate an expression. The left side is evaluated before the right;
    /// a failure on the left is returned without evaluating the right.
    pub fn evaluate(&self, expr: &Expression, context: &Context) -> Result<Value> {
        let lhs = self.evaluate_literal(&expr.lhs, context)?;
        match &expr.rhs {
            None => Ok(lhs),
            Some((op, rhs)) => {
                let rhs = self.evaluate_literal(rhs, context)?;
                let result = apply(*op, &lhs, &rhs);
                log::debug!("{} {} {} => {}", lhs, op, rhs, result);
                Ok(result)
            }
        }
    }

    pub fn evaluate_literal(&self, literal: &Literal, context: &Context) -> Result<Value> {
        match literal {
            Literal::Nil => Ok(Value::Null),
            Literal::Str(raw) => Ok(Value::String(unquote(raw))),
            Literal::Int(i) => Ok(Value::from(*i)),
            Literal::Float(f) => Ok(Number::from_f64(*f).map_or(Value::Null, Value::Number)),
            Literal::Bool(b) => Ok(Value::Bool(*b)),
            Literal::Function(function) => self.call_function(function, context),
            Literal::Object(object) => resolve_object(object, context),
        }
    }

    fn call_function(&self, function: &Function, context: &Context) -> Result<Value> {
        let builtin = self.functions.resolve(&function.name, function.args.len())?;
        let args = function
            .args
            .iter()
            .map(|arg| self.evaluate_literal(arg, context))
            .collect::<Result<Vec<_>>>()?;
        log::debug!("Calling {} with {:?}", function.name, args);
        builtin.call(&args)
    }
}

/// Evaluate with the built-in functions
pub fn evaluate(expr: &Expression, context: &Context) -> Result<Value> {
    Evaluator::new().evaluate(expr, context)
}

/// Look up `head` in the context and follow the accessors. Heads outside the
/// fixed root set never resolve. A missing key resolves to null, and
/// accessors on null stay null.
fn resolve_object(object: &Object, context: &Context) -> Result<Value> {
    let name = object
        .context_name()
        .ok_or_else(|| ExprError::unknown_context(&object.head))?;
    let root = context
        .get(name.as_str())
        .ok_or_else(|| ExprError::unknown_context(&object.head))?;

    let mut keys = object.keys();
    let mut current = match keys.next() {
        None => return Ok(Value::Object(root.clone())),
        Some(key) => root.get(key).unwrap_or(&NULL),
    };

    for key in keys {
        current = match current {
            Value::Object(map) => map.get(key).unwrap_or(&NULL),
            Value::Null => &NULL,
            _ => return Err(ExprError::malformed_context(key)),
        };
    }

    log::trace!("Resolved {}{} => {}", object.head, object.accessors.concat(), current);
    Ok(current.clone())
}

/// Remove the surrounding quotes of a string literal and collapse `''`
fn unquote(raw: &str) -> String {
    raw.strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
        .unwrap_or(raw)
        .replace("''", "'")
}

/// Apply a binary operator to two evaluated operands
pub fn apply(op: ComparisonOp, lhs: &Value, rhs: &Value) -> Value {
    let result = match op {
        ComparisonOp::Eq => values_equal(lhs, rhs),
        ComparisonOp::NotEq => !values_equal(lhs, rhs),
        ComparisonOp::Lt => compare(lhs, rhs) == Some(Ordering::Less),
        ComparisonOp::Lte => matches!(compare(lhs, rhs), Some(Ordering::Less | Ordering::Equal)),
        ComparisonOp::Gt => compare(lhs, rhs) == Some(Ordering::Greater),
        ComparisonOp::Gte => matches!(
            compare(lhs, rhs),
            Some(Ordering::Greater | Ordering::Equal)
        ),
        ComparisonOp::And => is_truthy(lhs) && is_truthy(rhs),
        ComparisonOp::Or => is_truthy(lhs) || is_truthy(rhs),
    };
    Value::Bool(result)
}

/// Same kind and same value. Integers and floats are different kinds.
pub fn values_equal(lhs: &Value, rhs: &Value) -> bool {
    lhs == rhs
}

/// Order two numbers or two strings; anything else is incomparable
pub fn compare(lhs: &Value, rhs: &Value) -> Option<Ordering> {
    match (lhs, rhs) {
        (Value::Number(a), Value::Number(b)) => match (a.as_i64(), b.as_i64()) {
            (Some(a), Some(b)) => Some(a.cmp(&b)),
            _ => a.as_f64()?.partial_cmp(&b.as_f64()?),
        },
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

/// `null`, `false`, `0` and `""` are falsy
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::parser::parse;
    use serde_json::json;

    fn eval(input: &str) -> Value {
        evaluate(&parse(input).unwrap(), &Context::empty()).unwrap()
    }

    fn eval_with(input: &str, context: Value) -> Result<Value> {
        let context = Context::from_value(context).unwrap();
        evaluate(&parse(input).unwrap(), &context)
    }

    #[test]
    fn test_bare_literals() {
        assert_eq!(eval("null"), json!(null));
        assert_eq!(eval("123"), json!(123));
        assert_eq!(eval("1.23"), json!(1.23));
        assert_eq!(eval("true"), json!(true));
        assert_eq!(eval("'bob'"), json!("bob"));
        assert_eq!(eval("'It''s open source!'"), json!("It's open source!"));
    }

    #[test]
    fn test_equality() {
        assert_eq!(eval("'hi' == 'hi'"), json!(true));
        assert_eq!(eval("'hi' == 'hello'"), json!(false));
        assert_eq!(eval("123 == 123"), json!(true));
        assert_eq!(eval("123 == 321"), json!(false));
        assert_eq!(eval("1.23 == 1.23"), json!(true));
        assert_eq!(eval("1.23 == 3.21"), json!(false));
        assert_eq!(eval("true == true"), json!(true));
        assert_eq!(eval("true == false"), json!(false));
        assert_eq!(eval("null == null"), json!(true));
    }

    #[test]
    fn test_inequality_across_kinds() {
        assert_eq!(eval("1 != 2"), json!(true));
        assert_eq!(eval("1 != 'asdf'"), json!(true));
        assert_eq!(eval("'asdf' != 'asdf'"), json!(false));
        assert_eq!(eval("1 == 1.0"), json!(false));
        assert_eq!(eval("0 == false"), json!(false));
        assert_eq!(eval("null == ''"), json!(false));
    }

    #[test]
    fn test_ordering() {
        assert_eq!(eval("1 < 2"), json!(true));
        assert_eq!(eval("2 < 1"), json!(false));
        assert_eq!(eval("2 <= 2"), json!(true));
        assert_eq!(eval("3 > 2"), json!(true));
        assert_eq!(eval("2 >= 3"), json!(false));
        assert_eq!(eval("1 < 1.5"), json!(true));
        assert_eq!(eval("-2.5 >= -3"), json!(true));
        assert_eq!(eval("'a' < 'b'"), json!(true));
    }

    #[test]
    fn test_ordering_incomparable_is_false() {
        assert_eq!(eval("'a' < 1"), json!(false));
        assert_eq!(eval("1 > null"), json!(false));
        assert_eq!(eval("true >= true"), json!(false));
    }

    #[test]
    fn test_logical_operators() {
        assert_eq!(eval("true && true"), json!(true));
        assert_eq!(eval("true && 0"), json!(false));
        assert_eq!(eval("'' || 1"), json!(true));
        assert_eq!(eval("null || false"), json!(false));
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(0.0)));
        assert!(!is_truthy(&json!("")));
        assert!(is_truthy(&json!("false")));
        assert!(is_truthy(&json!([])));
        assert!(is_truthy(&json!({})));
    }

    #[test]
    fn test_object_dot_and_bracket() {
        let ctx = json!({"github": {"token": "i-am-a-token"}});
        assert_eq!(
            eval_with("github.token", ctx.clone()).unwrap(),
            json!("i-am-a-token")
        );
        assert_eq!(
            eval_with("github['token']", ctx).unwrap(),
            json!("i-am-a-token")
        );
    }

    #[test]
    fn test_nested_object() {
        let ctx = json!({"github": {"event": {"base_ref": "i-am-the-base-ref"}}});
        assert_eq!(
            eval_with("github.event.base_ref", ctx.clone()).unwrap(),
            json!("i-am-the-base-ref")
        );
        assert_eq!(
            eval_with("github['event']['base_ref']", ctx).unwrap(),
            json!("i-am-the-base-ref")
        );
    }

    #[test]
    fn test_bare_root_returns_mapping() {
        let ctx = json!({"env": {"CI": "true"}});
        assert_eq!(eval_with("env", ctx).unwrap(), json!({"CI": "true"}));
    }

    #[test]
    fn test_missing_key_is_null() {
        let ctx = json!({"github": {"event": {"name": "push"}}});
        assert_eq!(eval_with("github.nope", ctx.clone()).unwrap(), json!(null));
        assert_eq!(
            eval_with("github.event.nope.deeper", ctx.clone()).unwrap(),
            json!(null)
        );
        assert_eq!(eval_with("github.nope == null", ctx).unwrap(), json!(true));
    }

    #[test]
    fn test_accessor_on_scalar_is_malformed() {
        let ctx = json!({"github": {"sha": "abc"}});
        match eval_with("github.sha.short", ctx) {
            Err(ExprError::MalformedContext { key }) => assert_eq!(key, "short"),
            other => panic!("Expected malformed context, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_context() {
        let ctx = json!({"github": {"token": "t"}});
        match eval_with("nosuch.token", ctx.clone()) {
            Err(ExprError::UnknownContext(name)) => assert_eq!(name, "nosuch"),
            other => panic!("Expected unknown context, got {:?}", other),
        }
        match eval_with("env.HOME", ctx) {
            Err(ExprError::UnknownContext(name)) => assert_eq!(name, "env"),
            other => panic!("Expected unknown context, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_root_ignores_matching_context_entry() {
        let ctx = json!({"nosuch": {"token": "leaked"}});
        match eval_with("nosuch.token", ctx) {
            Err(ExprError::UnknownContext(name)) => assert_eq!(name, "nosuch"),
            other => panic!("Expected unknown context, got {:?}", other),
        }
    }

    #[test]
    fn test_left_failure_short_circuits() {
        let ctx = json!({"github": {}});
        match eval_with("nosuch.a == unknownFn()", ctx) {
            Err(ExprError::UnknownContext(name)) => assert_eq!(name, "nosuch"),
            other => panic!("Expected left failure, got {:?}", other),
        }
    }

    #[test]
    fn test_right_failure_reported() {
        match eval_with("1 == unknownFn()", json!({})) {
            Err(ExprError::UnknownFunction(name)) => assert_eq!(name, "unknownFn"),
            other => panic!("Expected right failure, got {:?}", other),
        }
    }

    #[test]
    fn test_function_calls() {
        assert_eq!(
            eval("startsWith('refs/heads/main', 'refs/heads/')"),
            json!(true)
        );
        let ctx = json!({"github": {"ref": "refs/tags/v1.0"}});
        assert_eq!(
            eval_with("startsWith(github.ref, 'refs/tags/')", ctx.clone()).unwrap(),
            json!(true)
        );
        assert_eq!(
            eval_with("endsWith(github.ref, '.0') == true", ctx).unwrap(),
            json!(true)
        );
    }

    #[test]
    fn test_function_arity() {
        match eval_with("startsWith('a')", json!({})) {
            Err(ExprError::ArityMismatch {
                name,
                expected,
                actual,
            }) => {
                assert_eq!(name, "startsWith");
                assert_eq!(expected, 2);
                assert_eq!(actual, 1);
            }
            other => panic!("Expected arity mismatch, got {:?}", other),
        }
    }
}
