// SPDX-License-Identifier: MIT

//! Entry point composing lexer, parser and evaluator

use serde_json::Value;

use super::ast::Expression;
use super::context::Context;
use super::evaluator::Evaluator;
use super::lexer::Lexer;
use super::parser::parse_tokens;
use super::token::Token;
use crate::error::Result;

/// Owns an immutable lexer and evaluator. Holds no per-call state, so one
/// engine can be shared across threads.
#[derive(Clone, Default)]
pub struct Engine {
    lexer: Lexer,
    evaluator: Evaluator,
}

impl Engine {
    /// Engine with the built-in functions
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tokenize(&self, source: &str) -> Result<Vec<Token>> {
        self.lexer.tokenize(source)
    }

    pub fn parse(&self, source: &str) -> Result<Expression> {
        let tokens = self.tokenize(source)?;
        parse_tokens(&tokens)
    }

    /// Lex, parse and evaluate `source` against `context`
    pub fn evaluate(&self, source: &str, context: &Context) -> Result<Value> {
        let expr = self.parse(source)?;
        self.evaluator.evaluate(&expr, context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExprError;
    use serde_json::json;

    #[test]
    fn test_engine_end_to_end() {
        let engine = Engine::new();
        let ctx = Context::from_value(json!({"github": {"sha": "abc"}})).unwrap();

        assert_eq!(engine.evaluate("github.sha == 'abc'", &ctx).unwrap(), json!(true));
        assert_eq!(engine.evaluate("github.sha != 'abc'", &ctx).unwrap(), json!(false));
    }

    #[test]
    fn test_engine_surfaces_each_stage() {
        let engine = Engine::new();
        let ctx = Context::empty();

        assert!(matches!(engine.evaluate("1 == $", &ctx), Err(ExprError::Parse { .. })));
        assert!(matches!(engine.evaluate("'open", &ctx), Err(ExprError::Lex { .. })));
        assert!(matches!(
            engine.evaluate("github.sha", &ctx),
            Err(ExprError::UnknownContext(_))
        ));
    }

    #[test]
    fn test_engine_shared_across_threads() {
        let engine = Engine::new();
        let ctx = Context::from_value(json!({"matrix": {"os": "linux"}})).unwrap();

        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    assert_eq!(
                        engine.evaluate("matrix.os == 'linux'", &ctx).unwrap(),
                        json!(true)
                    );
                });
            }
        });
    }
}
