//! Operands of the USING directive
//!
//! ```text
//! USING base, register [, register]...
//! USING (begin, end), register [, register]...
//! ```
//!
//! A leading parenthesis is ambiguous: it opens either a range or a parenthesized base
//! expression such as `(A+4)*2`. The grammar reads what follows into a fresh scope pushed on
//! the scope stack. A comma at parenthesis depth 0 settles it as a range; a closing
//! parenthesis at depth 0 settles it as an expression, and the sub-scope's tokens are merged
//! back into the base expression of the outer scope.
//!
//! Without a parenthesis the first token is queued on the lookahead and read again by the
//! `base` state, which owns the base expression.

use super::expression::Expression;
use crate::error::{GrammarError, ParseError};
use crate::fsm::{Action, State, Step};
use crate::lexing::vocabulary::OPERAND;
use crate::lexing::{Token, TokenKind};
use crate::parsing::{Context, Grammar, Parser, Scope, ScopeManager};
use once_cell::sync::Lazy;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UsingOperands {
    /// Base address, or the beginning of the range
    pub base: Vec<Token>,
    /// End of the range, if the first operand was a range
    pub end: Option<Vec<Token>>,
    pub registers: Vec<Vec<Token>>,
    #[serde(skip)]
    local: Option<Expression>,
}

impl Scope for UsingOperands {
    type Local = Expression;

    fn local_slot(&mut self) -> &mut Option<Expression> {
        &mut self.local
    }

    fn local(&self) -> Option<&Expression> {
        self.local.as_ref()
    }
}

type Cx = ScopeManager<UsingOperands>;

const BASE: &str = "base";
const REGISTER: &str = "register";

fn open_range(cx: &mut Cx, token: &Token) -> Result<Step, ParseError> {
    cx.local_mut()?.add(token)?;
    cx.push_scope(UsingOperands::default());
    cx.switch_context(BASE, None)?;
    Ok(Step::Next("range_begin"))
}

fn defer_base(cx: &mut Cx, token: &Token) -> Result<Step, ParseError> {
    cx.stack(token.clone())?;
    Ok(Step::Next("base"))
}

fn expect_base(_cx: &mut Cx, token: &Token) -> Result<Step, ParseError> {
    Err(ParseError::expected("base address", token))
}

fn add_base(cx: &mut Cx, token: &Token) -> Result<Step, ParseError> {
    cx.local_mut()?.add(token)?;
    Ok(Step::Next("base"))
}

fn base_done(cx: &mut Cx, token: &Token) -> Result<Step, ParseError> {
    let base = cx.take_local()?.require("base address", token)?;
    cx.scope_mut().base = base;
    cx.switch_context(REGISTER, None)?;
    Ok(Step::Next("register"))
}

fn expect_register(_cx: &mut Cx, token: &Token) -> Result<Step, ParseError> {
    Err(ParseError::expected("base register", token))
}

fn add_range_begin(cx: &mut Cx, token: &Token) -> Result<Step, ParseError> {
    cx.local_mut()?.add(token)?;
    Ok(Step::Next("range_begin"))
}

fn close_begin(cx: &mut Cx, token: &Token) -> Result<Step, ParseError> {
    if cx.local()?.depth() > 0 {
        return add_range_begin(cx, token);
    }
    // (expression) rather than (begin,end)
    let inner = cx.take_local()?.require("expression", token)?;
    cx.pop_scope()?;
    let base = cx.local_mut()?;
    base.extend(inner);
    base.add(token)?;
    Ok(Step::Next("base"))
}

fn range_begin_done(cx: &mut Cx, token: &Token) -> Result<Step, ParseError> {
    let local = cx.take_local()?;
    if local.depth() > 0 {
        return Err(ParseError::expected("')'", token));
    }
    let begin = local.require("range begin", token)?;
    cx.scope_mut().base = begin;
    cx.switch_context(BASE, None)?;
    Ok(Step::Next("range_end"))
}

fn add_range_end(cx: &mut Cx, token: &Token) -> Result<Step, ParseError> {
    cx.local_mut()?.add(token)?;
    Ok(Step::Next("range_end"))
}

fn close_range(cx: &mut Cx, token: &Token) -> Result<Step, ParseError> {
    if cx.local()?.depth() > 0 {
        return add_range_end(cx, token);
    }
    let end = cx.take_local()?.require("range end", token)?;
    let range = cx.pop_sub_scope()?;
    let scope = cx.scope_mut();
    scope.base = range.base;
    scope.end = Some(end);
    Ok(Step::Next("range_close"))
}

fn expect_close(_cx: &mut Cx, token: &Token) -> Result<Step, ParseError> {
    Err(ParseError::expected("')'", token))
}

fn range_closed(cx: &mut Cx, _token: &Token) -> Result<Step, ParseError> {
    cx.switch_context(REGISTER, None)?;
    Ok(Step::Next("register"))
}

fn expect_comma(_cx: &mut Cx, token: &Token) -> Result<Step, ParseError> {
    Err(ParseError::expected("comma", token))
}

fn add_register(cx: &mut Cx, token: &Token) -> Result<Step, ParseError> {
    cx.local_mut()?.add(token)?;
    Ok(Step::Next("register"))
}

fn finish_register(cx: &mut Cx, token: &Token) -> Result<(), ParseError> {
    let register = cx.take_local()?.require("base register", token)?;
    cx.scope_mut().registers.push(register);
    Ok(())
}

fn register_done(cx: &mut Cx, token: &Token) -> Result<Step, ParseError> {
    finish_register(cx, token)?;
    cx.switch_context(REGISTER, None)?;
    Ok(Step::Next("register"))
}

fn registers_done(cx: &mut Cx, token: &Token) -> Result<Step, ParseError> {
    finish_register(cx, token)?;
    Ok(Step::Terminate)
}

fn build() -> Result<Grammar<UsingOperands>, GrammarError> {
    use TokenKind::*;

    let mut grammar = Grammar::context_sensitive("using", BASE);
    grammar.define_context(Context::new(BASE, OPERAND, Expression::new))?;
    grammar.define_context(Context::new(REGISTER, OPERAND, Expression::new))?;

    grammar.register_state(
        State::new("first")
            .on(LParen, Action::new("open_range", open_range))
            .on_each(TokenKind::TERMS, Action::new("defer_base", defer_base))
            .on_error(Action::new("expect_base", expect_base)),
    )?;
    grammar.register_state(
        State::new("base")
            .on_each(TokenKind::TERMS, Action::new("add_base", add_base))
            .on_each(&[LParen, RParen], Action::new("add_base", add_base))
            .on(Comma, Action::new("base_done", base_done))
            .on_error(Action::new("expect_register", expect_register)),
    )?;
    grammar.register_state(
        State::new("range_begin")
            .on_each(TokenKind::TERMS, Action::new("add_range_begin", add_range_begin))
            .on(LParen, Action::new("add_range_begin", add_range_begin))
            .on(RParen, Action::new("close_begin", close_begin))
            .on(Comma, Action::new("range_begin_done", range_begin_done))
            .on_error(Action::new("expect_close", expect_close)),
    )?;
    grammar.register_state(
        State::new("range_end")
            .on_each(TokenKind::TERMS, Action::new("add_range_end", add_range_end))
            .on(LParen, Action::new("add_range_end", add_range_end))
            .on(RParen, Action::new("close_range", close_range))
            .on_error(Action::new("expect_close", expect_close)),
    )?;
    grammar.register_state(
        State::new("range_close")
            .on(Comma, Action::new("range_closed", range_closed))
            .on_each(
                &[EndOfOperands, EndOfStatement],
                Action::new("expect_register", expect_register),
            )
            .on_error(Action::new("expect_comma", expect_comma)),
    )?;
    grammar.register_state(
        State::new("register")
            .on_each(TokenKind::TERMS, Action::new("add_register", add_register))
            .on_each(&[LParen, RParen], Action::new("add_register", add_register))
            .on(Comma, Action::new("register_done", register_done))
            .on_each(
                &[EndOfOperands, EndOfStatement],
                Action::new("registers_done", registers_done),
            ),
    )?;
    grammar.set_start("first");
    grammar.validate()?;
    Ok(grammar)
}

static GRAMMAR: Lazy<Grammar<UsingOperands>> =
    Lazy::new(|| build().unwrap_or_else(|err| panic!("USING operand grammar: {err}")));

pub fn grammar() -> &'static Grammar<UsingOperands> {
    &GRAMMAR
}

/// Parse the operand field of a USING statement
pub fn parse(operands: &str, trace: bool) -> Result<UsingOperands, ParseError> {
    Parser::new(grammar()).with_trace(trace).parse(operands)
}
