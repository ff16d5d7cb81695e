// SPDX-License-Identifier: MIT

//! Abstract Syntax Tree for workflow expressions

use std::fmt;
use std::str::FromStr;

use super::token::ContextName;

/// Root of a parsed expression: a literal, optionally compared with another.
///
/// The operator and right-hand side travel together in one `Option`, so an
/// operator without an operand cannot be represented.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub lhs: Literal,
    pub rhs: Option<(ComparisonOp, Literal)>,
}

impl Expression {
    /// A bare literal with no operator
    pub fn literal(lhs: Literal) -> Self {
        Self { lhs, rhs: None }
    }

    /// `lhs op rhs`
    pub fn binary(lhs: Literal, op: ComparisonOp, rhs: Literal) -> Self {
        Self {
            lhs,
            rhs: Some((op, rhs)),
        }
    }

    pub fn operator(&self) -> Option<ComparisonOp> {
        self.rhs.as_ref().map(|(op, _)| *op)
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    /// ==
    Eq,
    /// !=
    NotEq,
    /// <
    Lt,
    /// <=
    Lte,
    /// >
    Gt,
    /// >=
    Gte,
    /// &&
    And,
    /// ||
    Or,
}

impl ComparisonOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonOp::Eq => "==",
            ComparisonOp::NotEq => "!=",
            ComparisonOp::Lt => "<",
            ComparisonOp::Lte => "<=",
            ComparisonOp::Gt => ">",
            ComparisonOp::Gte => ">=",
            ComparisonOp::And => "&&",
            ComparisonOp::Or => "||",
        }
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComparisonOp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "==" => Ok(ComparisonOp::Eq),
            "!=" => Ok(ComparisonOp::NotEq),
            "<" => Ok(ComparisonOp::Lt),
            "<=" => Ok(ComparisonOp::Lte),
            ">" => Ok(ComparisonOp::Gt),
            ">=" => Ok(ComparisonOp::Gte),
            "&&" => Ok(ComparisonOp::And),
            "||" => Ok(ComparisonOp::Or),
            other => Err(format!("unknown operator: {}", other)),
        }
    }
}

/// Directly evaluable leaf of an expression
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Nil,
    /// Raw source text, surrounding quotes and `''` escapes included
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Function(Function),
    Object(Object),
}

impl Literal {
    pub fn is_true(&self) -> bool {
        matches!(self, Literal::Bool(true))
    }
}

/// Reference into the evaluation context, e.g. `github.event['base_ref']`
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    pub head: String,
    /// Accessors as written: `.name` or `['name']`
    pub accessors: Vec<String>,
}

impl Object {
    pub fn new(head: impl Into<String>, accessors: Vec<String>) -> Self {
        Self {
            head: head.into(),
            accessors,
        }
    }

    /// The root this object names, if it is one of the fixed context roots
    pub fn context_name(&self) -> Option<ContextName> {
        self.head.parse().ok()
    }

    /// Accessor names with their delimiters removed
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.accessors.iter().map(|a| accessor_key(a))
    }
}

/// Strip the leading `.` or the wrapping `['` `']` from an accessor
pub fn accessor_key(accessor: &str) -> &str {
    if let Some(name) = accessor.strip_prefix('.') {
        return name;
    }
    accessor
        .strip_prefix("['")
        .and_then(|s| s.strip_suffix("']"))
        .unwrap_or(accessor)
}

/// Call of a built-in function
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: String,
    pub args: Vec<Literal>,
}

impl Function {
    pub fn new(name: impl Into<String>, args: Vec<Literal>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }
}
