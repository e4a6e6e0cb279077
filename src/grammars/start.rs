//! Operands of the START and CSECT directives
//!
//! ```text
//! START [start-expression] [, region-name]
//! ```
//!
//! The expression is read in the `init` context with the full operand vocabulary. A comma
//! switches to the `region` context, whose vocabulary only knows labels, so anything but a
//! region name after the comma is rejected by the token source already.

use super::expression::Expression;
use super::{end_of_operands, expected_end};
use crate::error::{GrammarError, ParseError};
use crate::fsm::{Action, State, Step};
use crate::lexing::vocabulary::{OPERAND, REGION};
use crate::lexing::{Token, TokenKind};
use crate::parsing::{Context, Grammar, Parser, Scope, ScopeManager};
use once_cell::sync::Lazy;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StartOperands {
    /// Tokens of the start expression, empty if omitted
    pub start: Vec<Token>,
    pub region: Option<String>,
    #[serde(skip)]
    local: Option<Expression>,
}

impl Scope for StartOperands {
    type Local = Expression;

    fn local_slot(&mut self) -> &mut Option<Expression> {
        &mut self.local
    }

    fn local(&self) -> Option<&Expression> {
        self.local.as_ref()
    }
}

type Cx = ScopeManager<StartOperands>;

const INIT: &str = "init";
const REGION_CONTEXT: &str = "region";

fn add_token(cx: &mut Cx, token: &Token) -> Result<Step, ParseError> {
    cx.local_mut()?.add(token)?;
    Ok(Step::Next("init"))
}

fn finish_start(cx: &mut Cx, token: &Token) -> Result<(), ParseError> {
    let expression = cx.take_local()?;
    cx.scope_mut().start = expression.finish(token)?;
    Ok(())
}

fn start_done(cx: &mut Cx, token: &Token) -> Result<Step, ParseError> {
    finish_start(cx, token)?;
    cx.switch_context(REGION_CONTEXT, None)?;
    Ok(Step::Next("region"))
}

fn operands_done(cx: &mut Cx, token: &Token) -> Result<Step, ParseError> {
    finish_start(cx, token)?;
    Ok(Step::Terminate)
}

fn region_name(cx: &mut Cx, token: &Token) -> Result<Step, ParseError> {
    cx.scope_mut().region = Some(token.text.clone());
    Ok(Step::Next("end"))
}

fn expect_region(_cx: &mut Cx, token: &Token) -> Result<Step, ParseError> {
    Err(ParseError::expected("region name", token))
}

fn expect_expression(_cx: &mut Cx, token: &Token) -> Result<Step, ParseError> {
    Err(ParseError::expected("start expression or comma", token))
}

fn build() -> Result<Grammar<StartOperands>, GrammarError> {
    use TokenKind::*;

    let mut grammar = Grammar::context_sensitive("start", INIT);
    grammar.define_context(Context::new(INIT, OPERAND, Expression::new))?;
    grammar.define_context(Context::new(REGION_CONTEXT, REGION, Expression::new))?;

    grammar.register_state(
        State::new("init")
            .on_each(
                TokenKind::EXPRESSION_PARTS,
                Action::new("add_token", add_token),
            )
            .on(Comma, Action::new("start_done", start_done))
            .on_each(
                &[EndOfOperands, EndOfStatement],
                Action::new("operands_done", operands_done),
            )
            .on_error(Action::new("expect_expression", expect_expression)),
    )?;
    grammar.register_state(
        State::new("region")
            .on(Label, Action::new("region_name", region_name))
            .on_error(Action::new("expect_region", expect_region)),
    )?;
    grammar.register_state(
        State::new("end")
            .on_each(
                &[EndOfOperands, EndOfStatement],
                Action::new("end", end_of_operands),
            )
            .on_error(Action::new("expected_end", expected_end))
            .terminal(),
    )?;
    grammar.set_start("init");
    grammar.validate()?;
    Ok(grammar)
}

static GRAMMAR: Lazy<Grammar<StartOperands>> =
    Lazy::new(|| build().unwrap_or_else(|err| panic!("START operand grammar: {err}")));

pub fn grammar() -> &'static Grammar<StartOperands> {
    &GRAMMAR
}

/// Parse the operand field of a START statement
pub fn parse(operands: &str, trace: bool) -> Result<StartOperands, ParseError> {
    Parser::new(grammar()).with_trace(trace).parse(operands)
}
