// SPDX-License-Identifier: MIT

//! Expression lexer
//!
//! Converts raw expression text into typed tokens. At each position the token
//! classes are tried in a fixed order (see [`TokenKind`]) and the first one
//! that matches wins. The order is what keeps overlapping classes apart:
//! `Float` before `Integer` so `-9.2` is one token, two-character operators
//! before their one-character prefixes so `<=` never splits, and keywords
//! only match on a word boundary so `nullable` stays an identifier.

use super::token::{ContextName, Token, TokenKind};
use crate::error::{ExprError, Result};

const OPERATORS: [&str; 8] = ["<=", ">=", "==", "!=", "&&", "||", "<", ">"];

/// Lexer for the expression language. Stateless; one instance can be reused.
#[derive(Debug, Clone, Copy, Default)]
pub struct Lexer;

impl Lexer {
    pub fn new() -> Self {
        Self
    }

    /// Tokenize `input`, dropping whitespace. The last token is always `EndOfInput`.
    pub fn tokenize(&self, input: &str) -> Result<Vec<Token>> {
        let tokens: Vec<Token> = self
            .lex_all(input)?
            .into_iter()
            .filter(|t| t.kind != TokenKind::Whitespace)
            .collect();
        log::trace!("Lexed {} tokens from {:?}", tokens.len(), input);
        Ok(tokens)
    }

    /// Tokenize `input`, keeping whitespace tokens
    pub fn lex_all(&self, input: &str) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        let mut pos = 0;

        while pos < input.len() {
            let rest = &input[pos..];
            let (kind, len) = next_token(rest).map_err(|found| ExprError::lex(pos, found))?;
            tokens.push(Token::new(kind, &rest[..len], pos));
            pos += len;
        }

        tokens.push(Token::end_of_input(input.len()));
        Ok(tokens)
    }
}

/// Tokenize with a default lexer
pub fn tokenize(input: &str) -> Result<Vec<Token>> {
    Lexer::new().tokenize(input)
}

/// Classify the token at the start of `rest`. On failure returns the
/// offending character.
fn next_token(rest: &str) -> std::result::Result<(TokenKind, usize), char> {
    let first = match rest.chars().next() {
        Some(c) => c,
        None => return Err('\0'),
    };

    if let Some(len) = keyword(rest, "null") {
        return Ok((TokenKind::Null, len));
    }
    if let Some(len) = keyword(rest, "false").or_else(|| keyword(rest, "true")) {
        return Ok((TokenKind::Bool, len));
    }
    if let Some(len) = float(rest) {
        return Ok((TokenKind::Float, len));
    }
    if let Some(len) = integer(rest) {
        return Ok((TokenKind::Integer, len));
    }
    if first == '\'' {
        // An opening quote with no closing quote has nowhere else to go.
        return string(rest)
            .map(|len| (TokenKind::String, len))
            .ok_or(first);
    }
    if first.is_whitespace() {
        let len = rest
            .char_indices()
            .find(|(_, c)| !c.is_whitespace())
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        return Ok((TokenKind::Whitespace, len));
    }
    if let Some(len) = ContextName::ALL
        .iter()
        .find_map(|name| keyword(rest, name.as_str()))
    {
        return Ok((TokenKind::ContextName, len));
    }
    if let Some(len) = accessor(rest) {
        return Ok((TokenKind::ContextAccessor, len));
    }
    if let Some(op) = OPERATORS.iter().find(|op| rest.starts_with(*op)) {
        return Ok((TokenKind::Operator, op.len()));
    }
    if first == '!' {
        return Ok((TokenKind::Not, 1));
    }
    if let Some(len) = identifier(rest) {
        return Ok((TokenKind::Identifier, len));
    }

    Err(first)
}

fn is_word(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn count_while(bytes: &[u8], start: usize, pred: impl Fn(u8) -> bool) -> usize {
    bytes[start..].iter().take_while(|b| pred(**b)).count()
}

/// `kw` at the start of `rest`, not followed by a word character
fn keyword(rest: &str, kw: &str) -> Option<usize> {
    if !rest.starts_with(kw) {
        return None;
    }
    match rest.as_bytes().get(kw.len()) {
        Some(b) if is_word(*b) => None,
        _ => Some(kw.len()),
    }
}

/// `-?(0|[1-9][0-9]*)\.[0-9]+([eE][+-]?[0-9]+)?`
fn float(rest: &str) -> Option<usize> {
    let bytes = rest.as_bytes();
    let mut i = 0;

    if bytes.first() == Some(&b'-') {
        i += 1;
    }
    match bytes.get(i) {
        Some(b'0') => i += 1,
        Some(b'1'..=b'9') => i += 1 + count_while(bytes, i + 1, |b| b.is_ascii_digit()),
        _ => return None,
    }

    if bytes.get(i) != Some(&b'.') {
        return None;
    }
    let fraction = count_while(bytes, i + 1, |b| b.is_ascii_digit());
    if fraction == 0 {
        return None;
    }
    i += 1 + fraction;

    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        let digits = count_while(bytes, j, |b| b.is_ascii_digit());
        if digits > 0 {
            i = j + digits;
        }
    }

    Some(i)
}

/// `-?[0-9]+`
fn integer(rest: &str) -> Option<usize> {
    let bytes = rest.as_bytes();
    let sign = usize::from(bytes.first() == Some(&b'-'));
    let digits = count_while(bytes, sign, |b| b.is_ascii_digit());
    (digits > 0).then_some(sign + digits)
}

/// Single-quoted string; `''` is an escaped quote
fn string(rest: &str) -> Option<usize> {
    let bytes = rest.as_bytes();
    let mut i = 1;
    loop {
        let close = i + bytes[i..].iter().position(|b| *b == b'\'')?;
        if bytes.get(close + 1) == Some(&b'\'') {
            i = close + 2;
        } else {
            return Some(close + 1);
        }
    }
}

/// `.name` or `['name']` where name is `[A-Za-z0-9_-]+`
fn accessor(rest: &str) -> Option<usize> {
    let bytes = rest.as_bytes();
    let name = |start: usize| count_while(bytes, start, |b| is_word(b) || b == b'-');

    if rest.starts_with('.') {
        let len = name(1);
        return (len > 0).then_some(1 + len);
    }
    if rest.starts_with("['") {
        let len = name(2);
        if len > 0 && rest[2 + len..].starts_with("']") {
            return Some(2 + len + 2);
        }
    }
    None
}

/// A word (`[A-Za-z_][A-Za-z0-9_]*`) or a single ASCII punctuation character
fn identifier(rest: &str) -> Option<usize> {
    let bytes = rest.as_bytes();
    match bytes.first() {
        Some(b) if b.is_ascii_alphabetic() || *b == b'_' => Some(1 + count_while(bytes, 1, is_word)),
        Some(b) if b.is_ascii_punctuation() => Some(1),
        _ => None,
    }
}
