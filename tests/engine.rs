//! Engine behavior seen through a small grammar defined outside the crate
//!
//! The grammar reads `name (name ...) name ...`: names at the top level are collected in the
//! outer scope, a parenthesized group is collected by a nested scope. A `,` switches to the
//! `tail` context, which gets a fresh local scope and the region vocabulary.

use asmfsm::error::{GrammarError, ParseError};
use asmfsm::fsm::{Action, State, Step};
use asmfsm::lexing::{Token, TokenKind};
use asmfsm::parsing::{Context, Grammar, Parser, Scope, ScopeManager};
use std::sync::atomic::{AtomicUsize, Ordering};

static LOCALS: AtomicUsize = AtomicUsize::new(0);

#[derive(Debug, PartialEq)]
struct Local {
    id: usize,
    names: Vec<String>,
}

fn new_local() -> Local {
    Local {
        id: LOCALS.fetch_add(1, Ordering::SeqCst),
        names: Vec::new(),
    }
}

#[derive(Debug, Default, PartialEq)]
struct Names {
    names: Vec<String>,
    groups: Vec<Vec<String>>,
    tail_local: Option<usize>,
    head_local: Option<usize>,
    local: Option<Local>,
}

impl Scope for Names {
    type Local = Local;

    fn local_slot(&mut self) -> &mut Option<Local> {
        &mut self.local
    }

    fn local(&self) -> Option<&Local> {
        self.local.as_ref()
    }
}

type Cx = ScopeManager<Names>;

fn name(cx: &mut Cx, token: &Token) -> Result<Step, ParseError> {
    cx.scope_mut().names.push(token.text.clone());
    Ok(Step::Next("names"))
}

fn open(cx: &mut Cx, _token: &Token) -> Result<Step, ParseError> {
    cx.push_scope(Names::default());
    Ok(Step::Next("names"))
}

fn close(cx: &mut Cx, token: &Token) -> Result<Step, ParseError> {
    let group = cx
        .pop_sub_scope()
        .map_err(|_| ParseError::expected("'(' before ')'", token))?;
    cx.scope_mut().groups.push(group.names);
    Ok(Step::Next("names"))
}

fn tail(cx: &mut Cx, _token: &Token) -> Result<Step, ParseError> {
    let head = cx.local()?.id;
    cx.scope_mut().head_local = Some(head);
    cx.switch_context("tail", None)?;
    let tail = cx.local()?.id;
    cx.scope_mut().tail_local = Some(tail);
    Ok(Step::Next("tail"))
}

fn tail_name(cx: &mut Cx, token: &Token) -> Result<Step, ParseError> {
    cx.local_mut()?.names.push(token.text.clone());
    Ok(Step::Next("tail"))
}

fn requeue(cx: &mut Cx, token: &Token) -> Result<Step, ParseError> {
    cx.stack(token.clone())?;
    cx.stack(token.clone())?;
    Ok(Step::Next("names"))
}

fn done(_cx: &mut Cx, _token: &Token) -> Result<Step, ParseError> {
    Ok(Step::Terminate)
}

fn grammar() -> Grammar<Names> {
    use TokenKind::*;

    let mut grammar = Grammar::context_sensitive("names", "head");
    grammar
        .define_context(Context::new("head", "operand", new_local))
        .unwrap();
    grammar
        .define_context(Context::new("tail", "region", new_local))
        .unwrap();
    grammar
        .register_state(
            State::new("names")
                .on(Label, Action::new("name", name))
                .on(LParen, Action::new("open", open))
                .on(RParen, Action::new("close", close))
                .on(Comma, Action::new("tail", tail))
                .on(Star, Action::new("requeue", requeue))
                .on_each(&[EndOfOperands, EndOfStatement], Action::new("done", done)),
        )
        .unwrap();
    grammar
        .register_state(
            State::new("tail")
                .on(Label, Action::new("tail_name", tail_name))
                .on_each(&[EndOfOperands, EndOfStatement], Action::new("done", done)),
        )
        .unwrap();
    grammar.set_start("names");
    grammar
}

#[test]
fn test_nested_scopes_are_symmetric() {
    let grammar = grammar();
    let names = Parser::new(&grammar).parse("A(B(C)D)E").unwrap();
    assert_eq!(names.names, vec!["A", "E"]);
    assert_eq!(names.groups, vec![vec!["B".to_string(), "D".to_string()]]);
}

#[test]
fn test_unbalanced_groups() {
    let grammar = grammar();
    let mut parser = Parser::new(&grammar);
    assert_eq!(
        parser.parse("A(B"),
        Err(ParseError::Grammar(GrammarError::UnbalancedScopes { depth: 1 }))
    );
    let err = parser.parse("A)").unwrap_err();
    assert_eq!(err.to_string(), "expected '(' before ')', found ')' ')' at 1");
}

#[test]
fn test_context_switch_isolation() {
    let grammar = grammar();
    let names = Parser::new(&grammar).parse("A,TAIL").unwrap();

    let head = names.head_local.unwrap();
    let tail = names.tail_local.unwrap();
    assert_ne!(head, tail);
    let local = names.local.unwrap();
    assert_eq!(local.id, tail);
    assert_eq!(local.names, vec!["TAIL"]);

    // the tail context reads with the region vocabulary, which has no numbers
    let err = Parser::new(&grammar).parse("A,100").unwrap_err();
    assert_eq!(
        err.to_string(),
        "unrecognized input '100' at 2 (vocabulary region)"
    );
}

#[test]
fn test_lookahead_holds_one_token() {
    let grammar = grammar();
    assert_eq!(
        Parser::new(&grammar).parse("*"),
        Err(ParseError::Grammar(GrammarError::AlreadyQueued))
    );
}

#[test]
fn test_missing_initial_context() {
    let mut grammar: Grammar<Names> = Grammar::context_sensitive("broken", "nowhere");
    grammar
        .register_state(State::new("names").on(TokenKind::EndOfStatement, Action::new("done", done)))
        .unwrap();
    grammar.set_start("names");
    assert_eq!(
        grammar.validate(),
        Err(GrammarError::UnknownContext {
            context: "nowhere".to_string()
        })
    );
    assert_eq!(
        Parser::new(&grammar).parse(""),
        Err(ParseError::Grammar(GrammarError::UnknownContext {
            context: "nowhere".to_string()
        }))
    );
}

#[test]
fn test_duplicate_definitions() {
    let mut grammar = grammar();
    assert_eq!(
        grammar.register_state(State::new("tail")),
        Err(GrammarError::DuplicateState {
            machine: "names".to_string(),
            state: "tail".to_string()
        })
    );
    assert_eq!(
        grammar.define_context(Context::new("head", "operand", new_local)),
        Err(GrammarError::DuplicateContext {
            context: "head".to_string()
        })
    );
}
