//! Source statement fields
//!
//! ```text
//! [label] operation [operands [remarks]]
//! * comment
//! ```
//!
//! A statement starting in column 1 has a label; a statement starting with a blank has none.
//! Each field is read in its own context, and the vocabulary of the context decides what the
//! field may contain: the operation field only holds a name, the operand field any run of
//! non-blank characters (quoted strings may contain blanks), the remarks anything at all.
//! Remarks are collected in the local scope of the `remarks` context. For a comment statement
//! the local scope is seeded with the comment's first word.

use crate::error::{GrammarError, ParseError};
use crate::fsm::{Action, State, Step};
use crate::lexing::vocabulary::{LABEL, OPERANDS, OPERATION, REMARKS};
use crate::lexing::{Token, TokenKind};
use crate::parsing::{Context, Grammar, Parser, Scope, ScopeManager};
use once_cell::sync::Lazy;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Statement {
    pub label: Option<String>,
    pub operation: Option<String>,
    pub operands: Option<String>,
    pub remarks: Option<String>,
    pub comment: bool,
    #[serde(skip)]
    local: Option<String>,
}

impl Scope for Statement {
    type Local = String;

    fn local_slot(&mut self) -> &mut Option<String> {
        &mut self.local
    }

    fn local(&self) -> Option<&String> {
        self.local.as_ref()
    }
}

type Cx = ScopeManager<Statement>;

fn label(cx: &mut Cx, token: &Token) -> Result<Step, ParseError> {
    cx.scope_mut().label = Some(token.text.clone());
    Ok(Step::Next("label_end"))
}

fn comment_or_label(cx: &mut Cx, token: &Token) -> Result<Step, ParseError> {
    if !token.text.starts_with('*') {
        return Err(ParseError::expected("label", token));
    }
    cx.scope_mut().comment = true;
    cx.switch_context(REMARKS, Some(token.text.clone()))?;
    Ok(Step::Next("remarks"))
}

fn operation_field(cx: &mut Cx, _token: &Token) -> Result<Step, ParseError> {
    cx.switch_context(OPERATION, None)?;
    Ok(Step::Next("operation"))
}

fn expect_operation(_cx: &mut Cx, token: &Token) -> Result<Step, ParseError> {
    Err(ParseError::expected("operation", token))
}

fn operation(cx: &mut Cx, token: &Token) -> Result<Step, ParseError> {
    cx.scope_mut().operation = Some(token.text.clone());
    Ok(Step::Next("operation_end"))
}

fn operands_field(cx: &mut Cx, _token: &Token) -> Result<Step, ParseError> {
    cx.switch_context(OPERANDS, None)?;
    Ok(Step::Next("operands"))
}

fn operands(cx: &mut Cx, token: &Token) -> Result<Step, ParseError> {
    cx.scope_mut().operands = Some(token.text.clone());
    Ok(Step::Next("operands_end"))
}

fn remarks_field(cx: &mut Cx, _token: &Token) -> Result<Step, ParseError> {
    cx.switch_context(REMARKS, None)?;
    Ok(Step::Next("remarks"))
}

fn expect_blank(_cx: &mut Cx, token: &Token) -> Result<Step, ParseError> {
    Err(ParseError::expected("blank", token))
}

fn remark(cx: &mut Cx, token: &Token) -> Result<Step, ParseError> {
    cx.local_mut()?.push_str(&token.text);
    Ok(Step::Next("remarks"))
}

fn remarks_done(cx: &mut Cx, _token: &Token) -> Result<Step, ParseError> {
    let remarks = cx.take_local()?;
    let remarks = remarks.trim_end();
    if !remarks.is_empty() {
        cx.scope_mut().remarks = Some(remarks.to_string());
    }
    Ok(Step::Terminate)
}

fn statement_done(_cx: &mut Cx, _token: &Token) -> Result<Step, ParseError> {
    Ok(Step::Terminate)
}

fn build() -> Result<Grammar<Statement>, GrammarError> {
    use TokenKind::*;

    let mut grammar = Grammar::context_sensitive("statement", LABEL);
    grammar.define_context(Context::global(LABEL, LABEL))?;
    grammar.define_context(Context::global(OPERATION, OPERATION))?;
    grammar.define_context(Context::global(OPERANDS, OPERANDS))?;
    grammar.define_context(Context::new(REMARKS, REMARKS, String::new))?;

    grammar.register_state(
        State::new("label")
            .on(Name, Action::new("label", label))
            .on(Text, Action::new("comment_or_label", comment_or_label))
            .on(Spaces, Action::new("operation_field", operation_field))
            .on_error(Action::new("expect_operation", expect_operation)),
    )?;
    grammar.register_state(
        State::new("label_end")
            .on(Spaces, Action::new("operation_field", operation_field))
            .on(EndOfStatement, Action::new("expect_operation", expect_operation))
            .on_error(Action::new("expect_blank", expect_blank)),
    )?;
    grammar.register_state(
        State::new("operation")
            .on(Name, Action::new("operation", operation))
            .on_error(Action::new("expect_operation", expect_operation)),
    )?;
    grammar.register_state(
        State::new("operation_end")
            .on(Spaces, Action::new("operands_field", operands_field))
            .on(EndOfStatement, Action::new("statement_done", statement_done))
            .on_error(Action::new("expect_blank", expect_blank)),
    )?;
    grammar.register_state(
        State::new("operands")
            .on_each(&[Text, Name], Action::new("operands", operands))
            .on(EndOfStatement, Action::new("statement_done", statement_done)),
    )?;
    grammar.register_state(
        State::new("operands_end")
            .on(Spaces, Action::new("remarks_field", remarks_field))
            .on(EndOfStatement, Action::new("statement_done", statement_done))
            .on_error(Action::new("expect_blank", expect_blank)),
    )?;
    grammar.register_state(
        State::new("remarks")
            .on_each(&[Name, Text, Quote, Spaces], Action::new("remark", remark))
            .on(EndOfStatement, Action::new("remarks_done", remarks_done)),
    )?;
    grammar.set_start("label");
    grammar.validate()?;
    Ok(grammar)
}

static GRAMMAR: Lazy<Grammar<Statement>> =
    Lazy::new(|| build().unwrap_or_else(|err| panic!("statement grammar: {err}")));

pub fn grammar() -> &'static Grammar<Statement> {
    &GRAMMAR
}

/// Split a source statement into its fields
pub fn parse(line: &str, trace: bool) -> Result<Statement, ParseError> {
    Parser::new(grammar()).with_trace(trace).parse(line.trim_end())
}
