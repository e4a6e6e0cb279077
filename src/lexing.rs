//! Token source for the parsing engine
//!
//! The engine never looks at characters. It pulls [`Token`]s from a [`TokenSource`], naming
//! on every call the vocabulary the current grammar context allows. The vocabulary decides
//! both how the characters are classified (operand lexemes or statement field lexemes) and
//! which token kinds are acceptable; anything else is reported as an unrecognized run.
//!
//! Two synthetic tokens bracket the input of an operand field:
//!
//! - `EndOfOperands` is produced for the first run of blanks. Everything after it is remarks
//!   and is never tokenized.
//! - `EndOfStatement` is produced exactly once, at the end of the input (or right after
//!   `EndOfOperands`). Asking for another token afterwards is a grammar defect.

pub mod lexer_impl;
pub mod tokens;
pub mod vocabulary;

pub use lexer_impl::{tokenize, Lexer};
pub use tokens::TokenKind;
pub use vocabulary::{Family, Vocabulary, VocabularyTable};

use crate::error::LexError;
use serde::Serialize;
use std::fmt;
use std::ops::Range;

/// A classified lexical unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Range<usize>,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, span: Range<usize>) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
        }
    }

    /// Byte offset of the token in the statement
    pub fn position(&self) -> usize {
        self.span.start
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.kind.is_end() {
            write!(f, "{} at {}", self.kind, self.position())
        } else {
            write!(f, "{} '{}' at {}", self.kind, self.text, self.position())
        }
    }
}

/// Where the parser driver pulls its tokens from
pub trait TokenSource {
    /// Start over on a new statement
    fn reset(&mut self, input: &str);

    /// Produce the next token recognized by the named vocabulary
    fn next_token(&mut self, vocabulary: &str) -> Result<Token, LexError>;
}
