//! Expression parser
//!
//! Recursive descent over the lexer's token stream:
//!
//! ```text
//! Expression  := Literal (Operator Literal)? EndOfInput
//! Literal     := Null | String | Integer | Float | Bool | Function | Object
//! Function    := Identifier "(" (Literal ("," Literal)*)? ")"
//! Object      := (ContextName | Identifier) ContextAccessor*
//! ```
//!
//! Each literal kind starts with a distinct token kind, so one token of
//! lookahead picks the alternative. The only shared start is an identifier,
//! which is a function call when followed by `(` and a context reference
//! otherwise.

use super::ast::{ComparisonOp, Expression, Function, Literal, Object};
use super::lexer::Lexer;
use super::token::{Token, TokenKind};
use crate::error::{ExprError, Result};

/// Deepest function-call nesting accepted; also bounds evaluator recursion
pub const MAX_NESTING_DEPTH: usize = 64;

/// Parser over an already lexed token stream
pub struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    /// `tokens` must not contain whitespace; a missing `EndOfInput` is tolerated.
    pub fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    pub fn parse_expression(&mut self) -> Result<Expression> {
        let lhs = self.parse_literal()?;

        let expr = if self.peek_kind() == TokenKind::Operator {
            let op_token = self.advance();
            let op = op_token
                .text
                .parse::<ComparisonOp>()
                .map_err(|_| ExprError::parse(op_token.position, "an operator", op_token.describe()))?;
            let rhs = self.parse_literal()?;
            Expression::binary(lhs, op, rhs)
        } else {
            Expression::literal(lhs)
        };

        self.expect_end()?;
        log::debug!("Parsed expression: {:?}", expr);
        Ok(expr)
    }

    fn parse_literal(&mut self) -> Result<Literal> {
        let token = self.peek();
        match token.kind {
            TokenKind::Null => {
                self.advance();
                Ok(Literal::Nil)
            }
            TokenKind::String => {
                let text = self.advance().text.clone();
                Ok(Literal::Str(text))
            }
            TokenKind::Integer => {
                let token = self.advance();
                token.text.parse::<i64>().map(Literal::Int).map_err(|_| {
                    ExprError::parse(
                        token.position,
                        "an integer in the 64-bit range",
                        token.describe(),
                    )
                })
            }
            TokenKind::Float => {
                let token = self.advance();
                token
                    .text
                    .parse::<f64>()
                    .map(Literal::Float)
                    .map_err(|_| ExprError::parse(token.position, "a float", token.describe()))
            }
            TokenKind::Bool => {
                let value = self.advance().text == "true";
                Ok(Literal::Bool(value))
            }
            TokenKind::ContextName => self.parse_object(),
            TokenKind::Identifier if self.peek_at(1).is_punct("(") => self.parse_function(),
            TokenKind::Identifier if is_word(&token.text) => self.parse_object(),
            TokenKind::Not => Err(ExprError::Unsupported {
                operator: token.text.clone(),
                position: token.position,
            }),
            _ => Err(ExprError::parse(
                token.position,
                "a literal",
                token.describe(),
            )),
        }
    }

    fn parse_object(&mut self) -> Result<Literal> {
        let head = self.advance().text.clone();
        let mut accessors = Vec::new();
        while self.peek_kind() == TokenKind::ContextAccessor {
            accessors.push(self.advance().text.clone());
        }
        Ok(Literal::Object(Object::new(head, accessors)))
    }

    fn parse_function(&mut self) -> Result<Literal> {
        let name_token = self.advance();
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(ExprError::parse(
                name_token.position,
                format!("nesting depth <= {}", MAX_NESTING_DEPTH),
                name_token.describe(),
            ));
        }
        let name = name_token.text.clone();
        self.expect_punct("(")?;

        self.depth += 1;
        let args = self.parse_arguments();
        self.depth -= 1;

        Ok(Literal::Function(Function::new(name, args?)))
    }

    fn parse_arguments(&mut self) -> Result<Vec<Literal>> {
        let mut args = Vec::new();
        if !self.peek().is_punct(")") {
            args.push(self.parse_literal()?);
            while self.peek().is_punct(",") {
                self.advance();
                args.push(self.parse_literal()?);
            }
        }

        self.expect_punct(")")?;
        Ok(args)
    }

    fn expect_punct(&mut self, punct: &str) -> Result<()> {
        let token = self.peek();
        if token.is_punct(punct) {
            self.advance();
            Ok(())
        } else {
            Err(ExprError::parse(
                token.position,
                format!("'{}'", punct),
                token.describe(),
            ))
        }
    }

    fn expect_end(&self) -> Result<()> {
        let token = self.peek();
        if token.kind == TokenKind::EndOfInput {
            Ok(())
        } else {
            Err(ExprError::parse(
                token.position,
                "end of input",
                token.describe(),
            ))
        }
    }

    fn peek(&self) -> &'a Token {
        self.peek_at(0)
    }

    fn peek_kind(&self) -> TokenKind {
        self.peek().kind
    }

    /// Past the end of the slice every lookahead is `EndOfInput`
    fn peek_at(&self, offset: usize) -> &'a Token {
        static END: Token = Token {
            kind: TokenKind::EndOfInput,
            text: String::new(),
            position: 0,
        };
        self.tokens.get(self.pos + offset).unwrap_or(&END)
    }

    fn advance(&mut self) -> &'a Token {
        let token = self.peek();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }
}

fn is_word(text: &str) -> bool {
    text.chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
}

/// Parse a token stream into an expression
pub fn parse_tokens(tokens: &[Token]) -> Result<Expression> {
    Parser::new(tokens).parse_expression()
}

/// Lex and parse expression source text
pub fn parse(input: &str) -> Result<Expression> {
    let tokens = Lexer::new().tokenize(input)?;
    parse_tokens(&tokens)
}
