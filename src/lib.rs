// SPDX-License-Identifier: MIT

//! actions-expr: a small expression language for CI workflow conditions
//!
//! ```
//! use actions_expr::{evaluate, Context};
//! use serde_json::json;
//!
//! let ctx = Context::from_value(json!({"github": {"ref": "refs/tags/v1"}})).unwrap();
//! let out = evaluate("startsWith(github.ref, 'refs/tags/')", &ctx).unwrap();
//! assert_eq!(out, json!(true));
//! ```

pub mod config;
pub mod error;
pub mod expression;

use serde_json::Value;

pub use error::{ExprError, Result};
pub use expression::{parse, Context, Engine, Expression, Literal};

/// Lex, parse and evaluate `source` against `context` with the built-in functions
pub fn evaluate(source: &str, context: &Context) -> Result<Value> {
    Engine::new().evaluate(source, context)
}
