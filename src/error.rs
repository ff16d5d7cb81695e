// SPDX-License-Identifier: MIT

//! Typed error handling for actions-expr
//!
//! Every stage (lexing, parsing, evaluation, context decoding) reports
//! failures through [`ExprError`]; nothing in the library panics on bad
//! input or an unexpectedly shaped context.

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, ExprError>;

/// Top-level error type for actions-expr
#[derive(Debug, Error)]
pub enum ExprError {
    /// No token pattern matched at `position`
    #[error("Unexpected character '{found}' at offset {position}")]
    Lex { position: usize, found: char },

    /// The token stream did not match the grammar
    #[error("Parse error at offset {position}: expected {expected}, found {found}")]
    Parse {
        position: usize,
        expected: String,
        found: String,
    },

    /// An object literal names a root the context does not define
    #[error("No root context named {0}")]
    UnknownContext(String),

    /// An accessor was applied to a value that is not a mapping
    #[error("Context not structured as expected: cannot access '{key}' on a non-object value")]
    MalformedContext { key: String },

    /// A function call names something outside the built-in registry
    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    /// A built-in was called with the wrong number of arguments
    #[error("{name} needs {expected} arguments but has {actual}")]
    ArityMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    /// An operator that is recognized by the lexer but has no evaluation rule
    #[error("Operator '{operator}' at offset {position} is not supported")]
    Unsupported { operator: String, position: usize },

    /// I/O errors while reading a context file
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON context decoding errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// YAML context decoding errors
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

impl ExprError {
    /// Create a lex error
    pub fn lex(position: usize, found: char) -> Self {
        Self::Lex { position, found }
    }

    /// Create a parse error
    pub fn parse(position: usize, expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::Parse {
            position,
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Create an unknown context error
    pub fn unknown_context(name: impl Into<String>) -> Self {
        Self::UnknownContext(name.into())
    }

    /// Create a malformed context error
    pub fn malformed_context(key: impl Into<String>) -> Self {
        Self::MalformedContext { key: key.into() }
    }

    /// Create an arity mismatch error
    pub fn arity(name: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::ArityMismatch {
            name: name.into(),
            expected,
            actual,
        }
    }

    /// Byte offset into the source text, for errors raised before evaluation
    pub fn position(&self) -> Option<usize> {
        match self {
            Self::Lex { position, .. }
            | Self::Parse { position, .. }
            | Self::Unsupported { position, .. } => Some(*position),
            _ => None,
        }
    }
}
