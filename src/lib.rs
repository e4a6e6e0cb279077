//! # asmfsm
//!
//! A small parser-construction kit for mainframe assembler statements, and the grammars
//! built with it.
//!
//! A grammar is a finite-state machine: named states, each with a table of actions keyed by
//! the kind of the next token. Actions collect the parse result in a scope object and may
//! switch the lexical context, which changes the vocabulary the lexer is asked for on the
//! next token. This lets one statement be read with different token sets field by field, e.g.
//! an expression before a comma and nothing but a region name after it.
//!
//! ## Layout
//!
//! - [`fsm`]: the state machine definition and its runner
//! - [`lexing`]: tokens, vocabularies and the logos based [`Lexer`](lexing::Lexer)
//! - [`parsing`]: contexts, scopes, lookahead and the [`Parser`](parsing::Parser) driver
//! - [`grammars`]: statement fields and the operands of START, USING, ORG and END
//! - [`error`]: grammar defects versus user errors
//!
//! ## Example
//!
//! ```rust,ignore
//! use asmfsm::grammars::start;
//!
//! let operands = start::parse("100,REGIONX", false)?;
//! assert_eq!(operands.region.as_deref(), Some("REGIONX"));
//! ```

pub mod error;
pub mod fsm;
pub mod grammars;
pub mod lexing;
pub mod parsing;

pub use error::{GrammarError, LexError, ParseError};
pub use grammars::{operand_grammar, parse_line, parse_operands, Operands, ParsedLine};
