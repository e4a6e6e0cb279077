//! Built-in grammars
//!
//! Each grammar module declares its states and contexts once, in a `Lazy` static, and exposes
//! a `parse` function running a fresh [`Parser`](crate::parsing::Parser) over it.
//!
//! - [`statement`] splits a source line into label, operation, operands and remarks
//! - [`start`], [`using`] and [`operand`] read the operand field of particular directives
//!
//! [`operand_grammar`] maps an operation mnemonic to the grammar of its operand field and
//! [`parse_line`] chains the two steps.

pub mod expression;
pub mod operand;
pub mod start;
pub mod statement;
pub mod using;

pub use expression::Expression;
pub use operand::ExpressionOperand;
pub use start::StartOperands;
pub use statement::Statement;
pub use using::UsingOperands;

use crate::error::ParseError;
use crate::fsm::Step;
use crate::lexing::Token;
use serde::Serialize;

/// Operand grammars, keyed by the mnemonics that use them
pub const MNEMONICS: &[(&str, OperandGrammar)] = &[
    ("START", OperandGrammar::Start),
    ("CSECT", OperandGrammar::Start),
    ("USING", OperandGrammar::Using),
    ("ORG", OperandGrammar::Expression),
    ("END", OperandGrammar::Expression),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandGrammar {
    Start,
    Using,
    Expression,
}

impl OperandGrammar {
    pub fn name(self) -> &'static str {
        match self {
            OperandGrammar::Start => start::grammar().name(),
            OperandGrammar::Using => using::grammar().name(),
            OperandGrammar::Expression => operand::grammar().name(),
        }
    }

    pub fn parse(self, operands: &str, trace: bool) -> Result<Operands, ParseError> {
        Ok(match self {
            OperandGrammar::Start => Operands::Start(start::parse(operands, trace)?),
            OperandGrammar::Using => Operands::Using(using::parse(operands, trace)?),
            OperandGrammar::Expression => {
                Operands::Expression(operand::parse(operands, trace)?)
            }
        })
    }
}

/// Parsed operand field of a statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "grammar", rename_all = "snake_case")]
pub enum Operands {
    Start(StartOperands),
    Using(UsingOperands),
    Expression(ExpressionOperand),
}

/// A source statement with its operand field parsed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedLine {
    pub statement: Statement,
    pub operands: Option<Operands>,
}

/// The operand grammar of `mnemonic`, case insensitive
pub fn operand_grammar(mnemonic: &str) -> Option<OperandGrammar> {
    MNEMONICS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(mnemonic))
        .map(|(_, grammar)| *grammar)
}

/// Parse an operand field. Returns None if `mnemonic` has no operand grammar.
pub fn parse_operands(
    mnemonic: &str,
    operands: &str,
    trace: bool,
) -> Result<Option<Operands>, ParseError> {
    operand_grammar(mnemonic)
        .map(|grammar| grammar.parse(operands, trace))
        .transpose()
}

/// Parse a source statement and, if its operation has a grammar, its operand field
pub fn parse_line(line: &str, trace: bool) -> Result<ParsedLine, ParseError> {
    let statement = statement::parse(line, trace)?;
    let operands = match statement.operation.as_deref() {
        Some(operation) if !statement.comment => {
            let field = statement.operands.as_deref().unwrap_or_default();
            parse_operands(operation, field, trace)?
        }
        _ => None,
    };
    Ok(ParsedLine {
        statement,
        operands,
    })
}

/// Accept the end of the operand field and stop
pub(crate) fn end_of_operands<C>(_cx: &mut C, _token: &Token) -> Result<Step, ParseError> {
    Ok(Step::Terminate)
}

pub(crate) fn expected_end<C>(_cx: &mut C, token: &Token) -> Result<Step, ParseError> {
    Err(ParseError::expected("end of operands", token))
}
