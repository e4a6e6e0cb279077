//! Implementation of the statement lexer
//!
//! The lexer keeps only a byte cursor into the statement. Each call classifies a single
//! lexeme starting at the cursor with the logos lexer of the requested vocabulary's family,
//! so the vocabulary can change between any two tokens.

use super::tokens::{FieldLexeme, OperandLexeme, TokenKind};
use super::vocabulary::{self, Family, VocabularyTable};
use super::{Token, TokenSource};
use crate::error::LexError;
use logos::Logos;

#[derive(Debug)]
pub struct Lexer {
    vocabularies: &'static VocabularyTable,
    input: String,
    pos: usize,
    operands_ended: bool,
    exhausted: bool,
}

impl Lexer {
    /// A lexer over the standard vocabularies
    pub fn new() -> Self {
        Self::with_vocabularies(vocabulary::standard())
    }

    pub fn with_vocabularies(vocabularies: &'static VocabularyTable) -> Self {
        Self {
            vocabularies,
            input: String::new(),
            pos: 0,
            operands_ended: false,
            exhausted: false,
        }
    }

    fn end_of_statement(&mut self) -> Token {
        self.exhausted = true;
        let end = self.input.len();
        Token::new(TokenKind::EndOfStatement, "", end..end)
    }
}

impl Default for Lexer {
    fn default() -> Self {
        Self::new()
    }
}

/// Classify the first lexeme of `rest`, returning its kind (if recognized) and length
fn first_lexeme<'s, L>(rest: &'s str, kind: fn(L) -> TokenKind) -> (Option<TokenKind>, usize)
where
    L: Logos<'s, Source = str>,
    L::Extras: Default,
{
    let mut lexer = L::lexer(rest);
    match lexer.next() {
        Some(Ok(lexeme)) => (Some(kind(lexeme)), lexer.span().end),
        Some(Err(_)) => (None, lexer.span().end),
        None => (None, rest.len()),
    }
}

impl TokenSource for Lexer {
    fn reset(&mut self, input: &str) {
        self.input.clear();
        self.input.push_str(input);
        self.pos = 0;
        self.operands_ended = false;
        self.exhausted = false;
    }

    fn next_token(&mut self, name: &str) -> Result<Token, LexError> {
        let vocabularies = self.vocabularies;
        let vocabulary = vocabularies
            .get(name)
            .ok_or_else(|| LexError::UnknownVocabulary {
                name: name.to_string(),
            })?;

        if self.exhausted {
            return Err(LexError::Exhausted {
                position: self.input.len(),
            });
        }
        if self.operands_ended || self.pos >= self.input.len() {
            return Ok(self.end_of_statement());
        }

        let rest = &self.input[self.pos..];
        let (kind, len) = match vocabulary.family {
            Family::Operand => first_lexeme::<OperandLexeme>(rest, OperandLexeme::kind),
            Family::Field => first_lexeme::<FieldLexeme>(rest, FieldLexeme::kind),
        };
        let span = self.pos..self.pos + len;
        let text = &self.input[span.clone()];

        match kind {
            Some(kind) if vocabulary.accepts(kind) => {
                let token = Token::new(kind, text, span.clone());
                self.pos = span.end;
                if kind == TokenKind::EndOfOperands {
                    self.operands_ended = true;
                }
                Ok(token)
            }
            _ => Err(LexError::Unrecognized {
                vocabulary: vocabulary.name.to_string(),
                position: span.start,
                text: text.to_string(),
            }),
        }
    }
}

/// Convenience function to tokenize a whole input with one vocabulary.
/// The returned tokens always end with `EndOfStatement`.
pub fn tokenize(source: &str, vocabulary: &str) -> Result<Vec<Token>, LexError> {
    let mut lexer = Lexer::new();
    lexer.reset(source);

    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token(vocabulary)?;
        let done = token.kind == TokenKind::EndOfStatement;
        tokens.push(token);
        if done {
            return Ok(tokens);
        }
    }
}
