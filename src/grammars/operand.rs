//! Single expression operands (ORG, END)
//!
//! ```text
//! ORG [expression]
//! END [expression]
//! ```
//!
//! Read with the single-context driver: the operand vocabulary stays active for the whole
//! statement and no context is ever switched. The accumulator lives in the scope's local
//! slot and is created by the first term.

use super::expression::Expression;
use super::expected_end;
use crate::error::{GrammarError, ParseError};
use crate::fsm::{Action, State, Step};
use crate::lexing::vocabulary::OPERAND;
use crate::lexing::{Token, TokenKind};
use crate::parsing::{Grammar, Parser, Scope, ScopeManager};
use once_cell::sync::Lazy;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExpressionOperand {
    /// None when the operand was omitted
    pub expression: Option<Vec<Token>>,
    #[serde(skip)]
    pending: Option<Expression>,
}

impl Scope for ExpressionOperand {
    type Local = Expression;

    fn local_slot(&mut self) -> &mut Option<Expression> {
        &mut self.pending
    }

    fn local(&self) -> Option<&Expression> {
        self.pending.as_ref()
    }
}

type Cx = ScopeManager<ExpressionOperand>;

fn add_token(cx: &mut Cx, token: &Token) -> Result<Step, ParseError> {
    cx.scope_mut()
        .local_slot()
        .get_or_insert_with(Expression::new)
        .add(token)?;
    Ok(Step::Next("expression"))
}

fn expression_done(cx: &mut Cx, token: &Token) -> Result<Step, ParseError> {
    if let Ok(pending) = cx.take_local() {
        cx.scope_mut().expression = Some(pending.finish(token)?);
    }
    Ok(Step::Terminate)
}

fn build() -> Result<Grammar<ExpressionOperand>, GrammarError> {
    use TokenKind::*;

    let mut grammar = Grammar::single_context("expression", OPERAND);
    grammar.register_state(
        State::new("expression")
            .on_each(
                TokenKind::EXPRESSION_PARTS,
                Action::new("add_token", add_token),
            )
            .on_each(
                &[EndOfOperands, EndOfStatement],
                Action::new("expression_done", expression_done),
            )
            .on_error(Action::new("expected_end", expected_end)),
    )?;
    grammar.set_start("expression");
    grammar.validate()?;
    Ok(grammar)
}

static GRAMMAR: Lazy<Grammar<ExpressionOperand>> =
    Lazy::new(|| build().unwrap_or_else(|err| panic!("expression operand grammar: {err}")));

pub fn grammar() -> &'static Grammar<ExpressionOperand> {
    &GRAMMAR
}

/// Parse an operand field holding at most one expression
pub fn parse(operands: &str, trace: bool) -> Result<ExpressionOperand, ParseError> {
    Parser::new(grammar()).with_trace(trace).parse(operands)
}
