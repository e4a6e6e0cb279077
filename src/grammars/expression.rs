//! Expression accumulator shared by the operand grammars
//!
//! Operand grammars do not evaluate expressions; they collect the tokens of one expression
//! and leave evaluation to the assembler passes. The accumulator only checks that
//! parentheses balance.

use crate::error::ParseError;
use crate::lexing::{Token, TokenKind};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Expression {
    tokens: Vec<Token>,
    depth: usize,
}

impl Expression {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a term, operator or parenthesis
    pub fn add(&mut self, token: &Token) -> Result<(), ParseError> {
        match token.kind {
            TokenKind::LParen => self.depth += 1,
            TokenKind::RParen if self.depth == 0 => {
                return Err(ParseError::expected("'(' before ')'", token));
            }
            TokenKind::RParen => self.depth -= 1,
            _ => {}
        }
        self.tokens.push(token.clone());
        Ok(())
    }

    /// Append tokens collected elsewhere, e.g. by a sub-parse
    pub fn extend(&mut self, tokens: Vec<Token>) {
        self.tokens.extend(tokens);
    }

    /// Open parentheses
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The collected tokens. `at` is the token that ended the expression.
    pub fn finish(self, at: &Token) -> Result<Vec<Token>, ParseError> {
        if self.depth > 0 {
            return Err(ParseError::expected("')'", at));
        }
        Ok(self.tokens)
    }

    /// Like [`finish`](Expression::finish), but the expression must not be empty
    pub fn require(self, what: &str, at: &Token) -> Result<Vec<Token>, ParseError> {
        if self.tokens.is_empty() {
            return Err(ParseError::expected(what, at));
        }
        self.finish(at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(kind: TokenKind, text: &str) -> Token {
        Token::new(kind, text, 0..text.len())
    }

    #[test]
    fn test_balanced_parentheses() {
        let mut expression = Expression::new();
        for token in [
            token(TokenKind::LParen, "("),
            token(TokenKind::Label, "A"),
            token(TokenKind::Plus, "+"),
            token(TokenKind::Decimal, "4"),
            token(TokenKind::RParen, ")"),
        ] {
            expression.add(&token).unwrap();
        }
        assert_eq!(expression.depth(), 0);

        let end = token(TokenKind::EndOfStatement, "");
        let tokens = expression.finish(&end).unwrap();
        assert_eq!(tokens.len(), 5);
    }

    #[test]
    fn test_close_without_open() {
        let mut expression = Expression::new();
        let close = token(TokenKind::RParen, ")");
        let err = expression.add(&close).unwrap_err();
        assert_eq!(err, ParseError::expected("'(' before ')'", &close));
        assert_eq!(expression.finish(&close), Ok(Vec::new()));
    }

    #[test]
    fn test_unclosed_parenthesis() {
        let mut expression = Expression::new();
        expression.add(&token(TokenKind::LParen, "(")).unwrap();
        let end = token(TokenKind::EndOfOperands, " ");
        assert_eq!(
            expression.finish(&end),
            Err(ParseError::expected("')'", &end))
        );
    }

    #[test]
    fn test_require_non_empty() {
        let comma = token(TokenKind::Comma, ",");
        assert_eq!(
            Expression::new().require("base register", &comma),
            Err(ParseError::expected("base register", &comma))
        );
    }
}
