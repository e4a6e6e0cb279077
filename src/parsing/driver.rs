//! Parser driver
//!
//! The [`Parser`] is the loop that connects a [`TokenSource`] to a [`Grammar`]. Every
//! iteration takes the lookahead token if an action queued one, otherwise pulls a new token
//! with the vocabulary of the active context, and feeds it to the machine. The loop ends when
//! the machine terminates; the completed global scope is the result of the parse.
//!
//! A parser can be reused for any number of statements. The grammar tables are only borrowed,
//! all per-parse state (runner, scope manager) is created inside [`Parser::parse_with`].

use super::grammar::{Grammar, Mode};
use super::manager::ScopeManager;
use super::scope::Scope;
use crate::error::ParseError;
use crate::fsm::Status;
use crate::lexing::{Lexer, TokenSource};
use std::sync::Arc;

pub struct Parser<'g, G: Scope, T: TokenSource = Lexer> {
    grammar: &'g Grammar<G>,
    source: T,
    trace: bool,
}

impl<'g, G: Scope> Parser<'g, G, Lexer> {
    /// A parser reading from the standard lexer
    pub fn new(grammar: &'g Grammar<G>) -> Self {
        Self::with_source(grammar, Lexer::new())
    }
}

impl<'g, G: Scope, T: TokenSource> Parser<'g, G, T> {
    pub fn with_source(grammar: &'g Grammar<G>, source: T) -> Self {
        Self {
            grammar,
            source,
            trace: false,
        }
    }

    /// Log every dispatch on the trace target
    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    pub fn grammar(&self) -> &'g Grammar<G> {
        self.grammar
    }

    pub fn source(&self) -> &T {
        &self.source
    }

    /// Parse `input` starting in the grammar's initial context with a default scope
    pub fn parse(&mut self, input: &str) -> Result<G, ParseError>
    where
        G: Default,
    {
        self.parse_with(input, None, G::default)
    }

    /// Parse `input` into the scope built by `scope`.
    ///
    /// `initial` overrides the initial context of a context-sensitive grammar. Naming a
    /// context for a single-context grammar is a defect.
    pub fn parse_with(
        &mut self,
        input: &str,
        initial: Option<&'static str>,
        scope: impl FnOnce() -> G,
    ) -> Result<G, ParseError> {
        let grammar = self.grammar;
        let mut cx = match grammar.mode() {
            Mode::Fixed(vocabulary) => {
                let mut cx = ScopeManager::fixed(scope(), vocabulary);
                if let Some(initial) = initial {
                    cx.switch_context(initial, None)?;
                }
                cx
            }
            Mode::ContextSensitive(default) => {
                let mut cx = ScopeManager::new(scope(), Arc::clone(grammar.contexts()));
                cx.switch_context(initial.unwrap_or(default), None)?;
                cx
            }
        };

        self.source.reset(input);
        let mut runner = grammar.fsm().runner().with_trace(self.trace);
        runner.start()?;

        loop {
            let token = if cx.lookahead_mut().is_loaded() {
                cx.unstack()?
            } else {
                let vocabulary = cx.vocabulary().unwrap_or_default();
                self.source.next_token(vocabulary)?
            };

            let status = runner.step(&mut cx, &token);
            cx.lookahead_mut().consumed();
            if status? == Status::Done {
                break;
            }
        }

        Ok(cx.into_scope()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{GrammarError, LexError};
    use crate::fsm::{Action, State, Step};
    use crate::lexing::{Token, TokenKind};
    use crate::parsing::context::Context;
    use std::collections::VecDeque;

    /// Replays canned tokens and records the vocabulary of every request
    #[derive(Default)]
    struct Script {
        tokens: VecDeque<Token>,
        requests: Vec<String>,
    }

    impl Script {
        fn of(kinds: &[(TokenKind, &str)]) -> Self {
            let tokens = kinds
                .iter()
                .enumerate()
                .map(|(at, (kind, text))| Token::new(*kind, *text, at..at + 1))
                .collect();
            Self {
                tokens,
                requests: Vec::new(),
            }
        }
    }

    impl TokenSource for Script {
        fn reset(&mut self, _input: &str) {
            self.requests.clear();
        }

        fn next_token(&mut self, vocabulary: &str) -> Result<Token, LexError> {
            self.requests.push(vocabulary.to_string());
            self.tokens.pop_front().ok_or(LexError::Exhausted { position: 0 })
        }
    }

    #[derive(Debug, Default, PartialEq)]
    struct Words {
        words: Vec<String>,
        local: Option<Vec<String>>,
    }

    impl Scope for Words {
        type Local = Vec<String>;

        fn local_slot(&mut self) -> &mut Option<Vec<String>> {
            &mut self.local
        }

        fn local(&self) -> Option<&Vec<String>> {
            self.local.as_ref()
        }
    }

    type Cx = ScopeManager<Words>;

    fn collect(cx: &mut Cx, token: &Token) -> Result<Step, ParseError> {
        cx.scope_mut().words.push(token.text.clone());
        Ok(Step::Next("words"))
    }

    fn finish(_cx: &mut Cx, _token: &Token) -> Result<Step, ParseError> {
        Ok(Step::Terminate)
    }

    fn to_remarks(cx: &mut Cx, token: &Token) -> Result<Step, ParseError> {
        cx.switch_context("quiet", None)?;
        cx.stack(token.clone())?;
        Ok(Step::Next("remarks"))
    }

    fn remark(cx: &mut Cx, token: &Token) -> Result<Step, ParseError> {
        cx.local_mut()?.push(token.text.clone());
        Ok(Step::Next("remarks"))
    }

    fn push_only(cx: &mut Cx, _token: &Token) -> Result<Step, ParseError> {
        cx.push_scope(Words::default());
        Ok(Step::Next("words"))
    }

    fn words_grammar() -> Grammar<Words> {
        let mut grammar = Grammar::context_sensitive("words", "loud");
        grammar
            .define_context(Context::new("loud", "operand", Vec::new))
            .unwrap();
        grammar
            .define_context(Context::new("quiet", "remarks", Vec::new))
            .unwrap();
        grammar
            .register_state(
                State::new("words")
                    .on(TokenKind::Label, Action::new("collect", collect))
                    .on(TokenKind::Comma, Action::new("to_remarks", to_remarks))
                    .on(TokenKind::Decimal, Action::new("push_only", push_only))
                    .on(TokenKind::EndOfStatement, Action::new("finish", finish)),
            )
            .unwrap();
        grammar
            .register_state(
                State::new("remarks")
                    .on_each(
                        &[TokenKind::Comma, TokenKind::Name],
                        Action::new("remark", remark),
                    )
                    .on(TokenKind::EndOfStatement, Action::new("finish", finish)),
            )
            .unwrap();
        grammar.set_start("words");
        grammar
    }

    #[test]
    fn test_parse_until_terminate() {
        let grammar = words_grammar();
        let script = Script::of(&[
            (TokenKind::Label, "A"),
            (TokenKind::Label, "B"),
            (TokenKind::EndOfStatement, ""),
        ]);
        let mut parser = Parser::with_source(&grammar, script);
        let words = parser.parse("A B").unwrap();
        assert_eq!(words.words, vec!["A", "B"]);
        assert_eq!(parser.source().requests, vec!["operand"; 3]);
    }

    #[test]
    fn test_lookahead_is_redispatched_in_new_context() {
        let grammar = words_grammar();
        let script = Script::of(&[
            (TokenKind::Label, "A"),
            (TokenKind::Comma, ","),
            (TokenKind::Name, "rest"),
            (TokenKind::EndOfStatement, ""),
        ]);
        let mut parser = Parser::with_source(&grammar, script);
        let words = parser.parse("A,rest").unwrap();

        assert_eq!(words.words, vec!["A"]);
        // the comma was pulled once and dispatched twice
        assert_eq!(words.local, Some(vec![",".to_string(), "rest".to_string()]));
        assert_eq!(
            parser.source().requests,
            vec!["operand", "operand", "remarks", "remarks"]
        );
    }

    #[test]
    fn test_initial_context_override() {
        let grammar = words_grammar();
        let script = Script::of(&[(TokenKind::EndOfStatement, "")]);
        let mut parser = Parser::with_source(&grammar, script);
        parser.parse_with("", Some("quiet"), Words::default).unwrap();
        assert_eq!(parser.source().requests, vec!["remarks"]);
    }

    #[test]
    fn test_token_source_errors_propagate() {
        let grammar = words_grammar();
        let script = Script::of(&[(TokenKind::Label, "A")]);
        let mut parser = Parser::with_source(&grammar, script);
        assert_eq!(
            parser.parse("A"),
            Err(ParseError::Lex(LexError::Exhausted { position: 0 }))
        );
    }

    #[test]
    fn test_missing_action_is_a_defect() {
        let grammar = words_grammar();
        let script = Script::of(&[(TokenKind::Star, "*")]);
        let mut parser = Parser::with_source(&grammar, script);
        let err = parser.parse("*").unwrap_err();
        assert!(err.is_defect());
        assert!(matches!(
            err,
            ParseError::Grammar(GrammarError::NoActionDefined { .. })
        ));
    }

    #[test]
    fn test_unbalanced_scopes_at_termination() {
        let grammar = words_grammar();
        let script = Script::of(&[
            (TokenKind::Decimal, "1"),
            (TokenKind::EndOfStatement, ""),
        ]);
        let mut parser = Parser::with_source(&grammar, script);
        assert_eq!(
            parser.parse("1"),
            Err(ParseError::Grammar(GrammarError::UnbalancedScopes { depth: 1 }))
        );
    }

    #[test]
    fn test_single_context_rejects_initial_context() {
        let mut grammar: Grammar<Words> = Grammar::single_context("fixed", "operand");
        grammar
            .register_state(
                State::new("words").on(TokenKind::EndOfStatement, Action::new("finish", finish)),
            )
            .unwrap();
        grammar.set_start("words");

        let mut parser = Parser::with_source(&grammar, Script::of(&[(TokenKind::EndOfStatement, "")]));
        assert_eq!(
            parser.parse_with("", Some("loud"), Words::default),
            Err(ParseError::Grammar(GrammarError::FixedVocabulary {
                context: "loud".to_string()
            }))
        );

        let mut parser = Parser::with_source(&grammar, Script::of(&[(TokenKind::EndOfStatement, "")]));
        assert_eq!(parser.parse(""), Ok(Words::default()));
        assert_eq!(parser.source().requests, vec!["operand"]);
    }

    #[test]
    fn test_parser_is_reusable() {
        let grammar = words_grammar();
        let mut parser = Parser::new(&grammar);
        assert_eq!(parser.parse("A").unwrap().words, vec!["A"]);
        assert_eq!(parser.parse("B").unwrap().words, vec!["B"]);
    }
}
