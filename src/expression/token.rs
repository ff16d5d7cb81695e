// SPDX-License-Identifier: MIT

//! Token types produced by the lexer

use std::fmt;
use std::str::FromStr;

/// Token classes, in the order the lexer tries them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Null,
    Bool,
    Float,
    Integer,
    String,
    Whitespace,
    ContextName,
    ContextAccessor,
    Operator,
    Not,
    Identifier,
    EndOfInput,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Null => "Null",
            TokenKind::Bool => "Bool",
            TokenKind::Float => "Float",
            TokenKind::Integer => "Integer",
            TokenKind::String => "String",
            TokenKind::Whitespace => "Whitespace",
            TokenKind::ContextName => "ContextName",
            TokenKind::ContextAccessor => "ContextAccessor",
            TokenKind::Operator => "Operator",
            TokenKind::Not => "Not",
            TokenKind::Identifier => "Identifier",
            TokenKind::EndOfInput => "EndOfInput",
        };
        f.pad(name)
    }
}

/// A single lexed token with its raw source text
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    /// Byte offset of the first character
    pub position: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, position: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            position,
        }
    }

    pub fn end_of_input(position: usize) -> Self {
        Self::new(TokenKind::EndOfInput, "", position)
    }

    /// True for an Identifier token whose text is exactly `punct`
    pub fn is_punct(&self, punct: &str) -> bool {
        self.kind == TokenKind::Identifier && self.text == punct
    }

    /// Human readable description used in parse errors
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::EndOfInput => "end of input".to_string(),
            kind => format!("{} '{}'", kind, self.text),
        }
    }
}

/// The fixed set of context roots an expression may reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextName {
    Github,
    Env,
    Job,
    Steps,
    Runner,
    Secrets,
    Strategy,
    Matrix,
    Needs,
}

impl ContextName {
    pub const ALL: [ContextName; 9] = [
        ContextName::Github,
        ContextName::Env,
        ContextName::Job,
        ContextName::Steps,
        ContextName::Runner,
        ContextName::Secrets,
        ContextName::Strategy,
        ContextName::Matrix,
        ContextName::Needs,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContextName::Github => "github",
            ContextName::Env => "env",
            ContextName::Job => "job",
            ContextName::Steps => "steps",
            ContextName::Runner => "runner",
            ContextName::Secrets => "secrets",
            ContextName::Strategy => "strategy",
            ContextName::Matrix => "matrix",
            ContextName::Needs => "needs",
        }
    }
}

impl fmt::Display for ContextName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContextName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContextName::ALL
            .iter()
            .find(|name| name.as_str() == s)
            .copied()
            .ok_or_else(|| format!("unknown context name: {}", s))
    }
}
