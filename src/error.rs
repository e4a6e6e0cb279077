//! Error types
//!
//! Errors fall in two classes. A [`GrammarError`] is a defect in how a grammar was put
//! together (duplicate names, stepping a machine that is not running, misusing the
//! lookahead slot). User input never causes one, so callers should stop rather than carry on.
//! Everything else in [`ParseError`] is about the statement being parsed: the statement is
//! abandoned and the next one can be processed.

use crate::lexing::{Token, TokenKind};
use thiserror::Error;

/// A defect in grammar construction or in how a grammar drives the engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("machine {machine}: state {state} is already registered")]
    DuplicateState { machine: String, state: String },

    #[error("machine {machine}: start state {state:?} is not registered")]
    UnknownStartState {
        machine: String,
        state: Option<String>,
    },

    #[error("machine {machine}: next state {state} is not registered")]
    UnknownState { machine: String, state: String },

    #[error("machine {machine} has not been started")]
    NotStarted { machine: String },

    #[error("machine {machine} has already terminated")]
    AlreadyTerminated { machine: String },

    #[error("machine {machine}: state {state} has no action for {kind}")]
    NoActionDefined {
        machine: String,
        state: String,
        kind: TokenKind,
    },

    #[error("context {context} is already defined")]
    DuplicateContext { context: String },

    #[error("context {context} is not defined")]
    UnknownContext { context: String },

    #[error("cannot switch to context {context}: the vocabulary is fixed")]
    FixedVocabulary { context: String },

    #[error("no local scope is active")]
    NoLocalScope,

    #[error("scope stack is empty")]
    EmptyStack,

    #[error("{depth} pushed scope(s) left on the stack at termination")]
    UnbalancedScopes { depth: usize },

    #[error("no token is waiting in the lookahead buffer")]
    EmptyLookahead,

    #[error("a token is already queued in the lookahead buffer")]
    AlreadyQueued,
}

/// Token source failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("unrecognized input '{text}' at {position} (vocabulary {vocabulary})")]
    Unrecognized {
        vocabulary: String,
        position: usize,
        text: String,
    },

    #[error("vocabulary {name} is not defined")]
    UnknownVocabulary { name: String },

    #[error("input exhausted at {position}: end of statement was already produced")]
    Exhausted { position: usize },
}

impl LexError {
    /// Unknown vocabularies and reading past the end are grammar defects
    pub fn is_defect(&self) -> bool {
        !matches!(self, LexError::Unrecognized { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("expected {expected}, found {found}")]
    Syntax { expected: String, found: Token },

    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("grammar defect: {0}")]
    Grammar(#[from] GrammarError),
}

impl ParseError {
    /// "expected X, found Y" for the offending token
    pub fn expected(expected: impl Into<String>, found: &Token) -> Self {
        ParseError::Syntax {
            expected: expected.into(),
            found: found.clone(),
        }
    }

    pub fn is_defect(&self) -> bool {
        match self {
            ParseError::Syntax { .. } => false,
            ParseError::Lex(err) => err.is_defect(),
            ParseError::Grammar(_) => true,
        }
    }

    /// The token the error was raised on, if any
    pub fn token(&self) -> Option<&Token> {
        match self {
            ParseError::Syntax { found, .. } => Some(found),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_message() {
        let eos = Token::new(TokenKind::EndOfStatement, "", 1..1);
        let err = ParseError::expected("region name", &eos);
        assert_eq!(
            err.to_string(),
            "expected region name, found end of statement at 1"
        );
        assert!(!err.is_defect());
        assert_eq!(err.token(), Some(&eos));
    }

    #[test]
    fn test_classification() {
        let unrecognized: ParseError = LexError::Unrecognized {
            vocabulary: "region".to_string(),
            position: 4,
            text: "200".to_string(),
        }
        .into();
        assert!(!unrecognized.is_defect());

        let exhausted: ParseError = LexError::Exhausted { position: 3 }.into();
        assert!(exhausted.is_defect());

        let defect: ParseError = GrammarError::EmptyStack.into();
        assert!(defect.is_defect());
        assert_eq!(defect.to_string(), "grammar defect: scope stack is empty");
    }
}
