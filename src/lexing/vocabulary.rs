//! Lexical vocabularies
//!
//! A vocabulary is a named subset of [`TokenKind`]s the token source may produce at a given
//! point of a parse, together with the lexeme family used to classify the raw characters.
//! Grammars refer to vocabularies by name when they declare their contexts, and the parser
//! driver passes the active name on every tokenizer call.
//!
//! The standard table is built once and shared by every lexer.
use super::tokens::TokenKind;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Which logos lexer classifies the characters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    Operand,
    Field,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    pub name: &'static str,
    pub family: Family,
    accepts: Vec<TokenKind>,
}

impl Vocabulary {
    pub fn new(name: &'static str, family: Family, accepts: &[TokenKind]) -> Self {
        Self {
            name,
            family,
            accepts: accepts.to_vec(),
        }
    }

    /// End of statement is recognized in every vocabulary
    pub fn accepts(&self, kind: TokenKind) -> bool {
        kind == TokenKind::EndOfStatement || self.accepts.contains(&kind)
    }
}

/// Vocabularies by name
#[derive(Debug, Default)]
pub struct VocabularyTable {
    vocabularies: HashMap<&'static str, Vocabulary>,
}

impl VocabularyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a vocabulary, replacing any previous one with the same name
    pub fn insert(&mut self, vocabulary: Vocabulary) {
        self.vocabularies.insert(vocabulary.name, vocabulary);
    }

    pub fn get(&self, name: &str) -> Option<&Vocabulary> {
        self.vocabularies.get(name)
    }

    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.vocabularies.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

/// Every token of an operand field, used by expression operands
pub const OPERAND: &str = "operand";
/// Only a region name may follow the comma of a START operand
pub const REGION: &str = "region";
pub const LABEL: &str = "label";
pub const OPERATION: &str = "operation";
pub const OPERANDS: &str = "operands";
pub const REMARKS: &str = "remarks";

static STANDARD: Lazy<VocabularyTable> = Lazy::new(|| {
    use TokenKind::*;

    let mut table = VocabularyTable::new();
    table.insert(Vocabulary::new(
        OPERAND,
        Family::Operand,
        &[
            Label,
            Decimal,
            SelfDefining,
            Plus,
            Minus,
            Star,
            Slash,
            LParen,
            RParen,
            Comma,
            EndOfOperands,
        ],
    ));
    table.insert(Vocabulary::new(
        REGION,
        Family::Operand,
        &[Label, EndOfOperands],
    ));
    table.insert(Vocabulary::new(LABEL, Family::Field, &[Name, Text, Spaces]));
    table.insert(Vocabulary::new(OPERATION, Family::Field, &[Name, Spaces]));
    table.insert(Vocabulary::new(OPERANDS, Family::Field, &[Text, Name, Spaces]));
    table.insert(Vocabulary::new(
        REMARKS,
        Family::Field,
        &[Name, Text, Quote, Spaces],
    ));
    table
});

/// The vocabularies used by the built-in grammars
pub fn standard() -> &'static VocabularyTable {
    &STANDARD
}
