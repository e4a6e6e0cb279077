//! Token definitions for assembler statements
//!
//! [`TokenKind`] is the closed set of token-type ids that grammar action tables are keyed by.
//! The raw character classification is done by two logos lexers, one per lexeme family:
//!
//! - [`OperandLexeme`] splits an operand field into expression terms, operators and
//!   punctuation. A run of blanks ends the operand field.
//! - [`FieldLexeme`] splits a whole source statement into its blank-separated fields.
//!
//! Both families map onto [`TokenKind`]. Which kinds are acceptable at a given point of a
//! parse is decided by the active vocabulary, see [`super::vocabulary`].
use logos::Logos;
use serde::Serialize;
use std::fmt;

/// All token-type ids known to the toolkit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum TokenKind {
    // Operand field
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
    Equals,

    // Statement fields
    Name,
    Text,
    Quote,
    Spaces,

    // Synthetic markers
    EndOfOperands,
    EndOfStatement,
}

impl TokenKind {
    /// Short description used in "expected X, found Y" messages
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::Label => "label",
            TokenKind::Decimal => "decimal number",
            TokenKind::SelfDefining => "self-defining term",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Star => "'*'",
            TokenKind::Slash => "'/'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::Comma => "comma",
            TokenKind::Equals => "'='",
            TokenKind::Name => "name",
            TokenKind::Text => "text",
            TokenKind::Quote => "quote",
            TokenKind::Spaces => "spaces",
            TokenKind::EndOfOperands => "end of operands",
            TokenKind::EndOfStatement => "end of statement",
        }
    }

    /// Check if this token is one of the two end markers
    pub fn is_end(self) -> bool {
        matches!(self, TokenKind::EndOfOperands | TokenKind::EndOfStatement)
    }

    /// Terms and operators of an arithmetic expression, parentheses excluded
    pub const TERMS: &'static [TokenKind] = &[
        TokenKind::Label,
        TokenKind::Decimal,
        TokenKind::SelfDefining,
        TokenKind::Plus,
        TokenKind::Minus,
        TokenKind::Star,
        TokenKind::Slash,
    ];

    /// Everything that can appear inside an arithmetic expression
    pub const EXPRESSION_PARTS: &'static [TokenKind] = &[
        TokenKind::Label,
        TokenKind::Decimal,
        TokenKind::SelfDefining,
        TokenKind::Plus,
        TokenKind::Minus,
        TokenKind::Star,
        TokenKind::Slash,
        TokenKind::LParen,
        TokenKind::RParen,
    ];
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// Lexemes of an operand field
#[derive(Logos, Debug, PartialEq, Eq, Clone, Copy)]
pub enum OperandLexeme {
    // Symbols: up to the assembler to limit the length
    #[regex(r"[A-Za-z@#$_][A-Za-z0-9@#$_]*")]
    Label,

    #[regex(r"[0-9]+")]
    Decimal,

    // X'0F', C'AB', B'0101'
    #[regex(r"[XxCcBb]'[^']*'")]
    SelfDefining,

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(",")]
    Comma,
    #[token("=")]
    Equals,

    // Blanks terminate the operand field, the rest is remarks
    #[regex(r"[ \t]+")]
    Blanks,
}

impl OperandLexeme {
    pub fn kind(self) -> TokenKind {
        match self {
            OperandLexeme::Label => TokenKind::Label,
            OperandLexeme::Decimal => TokenKind::Decimal,
            OperandLexeme::SelfDefining => TokenKind::SelfDefining,
            OperandLexeme::Plus => TokenKind::Plus,
            OperandLexeme::Minus => TokenKind::Minus,
            OperandLexeme::Star => TokenKind::Star,
            OperandLexeme::Slash => TokenKind::Slash,
            OperandLexeme::LParen => TokenKind::LParen,
            OperandLexeme::RParen => TokenKind::RParen,
            OperandLexeme::Comma => TokenKind::Comma,
            OperandLexeme::Equals => TokenKind::Equals,
            OperandLexeme::Blanks => TokenKind::EndOfOperands,
        }
    }
}

/// Lexemes of a complete source statement
#[derive(Logos, Debug, PartialEq, Eq, Clone, Copy)]
pub enum FieldLexeme {
    // Wins over Text when both match the same run
    #[regex(r"[A-Za-z@#$_][A-Za-z0-9@#$_]*", priority = 5)]
    Name,

    // Any blank-free run, quoted strings may contain blanks
    #[regex(r"([^ \t']|'[^']*')+", priority = 2)]
    Text,

    // An unbalanced quote, only meaningful in remarks
    #[token("'")]
    Quote,

    #[regex(r"[ \t]+")]
    Spaces,
}

impl FieldLexeme {
    pub fn kind(self) -> TokenKind {
        match self {
            FieldLexeme::Name => TokenKind::Name,
            FieldLexeme::Text => TokenKind::Text,
            FieldLexeme::Quote => TokenKind::Quote,
            FieldLexeme::Spaces => TokenKind::Spaces,
        }
    }
}
