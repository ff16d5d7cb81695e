// SPDX-License-Identifier: MIT

//! Workflow expressions
//!
//! This module provides lexing, parsing and evaluation of expressions like:
//! - `github.sha == 'abc'`
//! - `github['event'].base_ref != null`
//! - `startsWith(github.ref, 'refs/tags/')`

mod ast;
mod context;
mod engine;
mod evaluator;
mod functions;
mod lexer;
mod parser;
mod token;

pub use ast::{accessor_key, ComparisonOp, Expression, Function, Literal, Object};
pub use context::Context;
pub use engine::Engine;
pub use evaluator::{apply, compare, evaluate, is_truthy, values_equal, Evaluator};
pub use lexer::{tokenize, Lexer};
pub use parser::{parse, parse_tokens, Parser, MAX_NESTING_DEPTH};
pub use token::{ContextName, Token, TokenKind};
