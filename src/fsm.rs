//! Finite-state machine core
//!
//! An [`Fsm`] is the immutable definition of a machine: named [`State`]s and the name of
//! the start state. A [`Runner`] is one execution cursor over a definition. Keeping the two
//! apart lets a single definition (built once, kept in a static) drive any number of
//! parses, each with its own runner.
//!
//! One call to [`Runner::step`] is one dispatch cycle:
//!
//! 1. look up the current state
//! 2. select the action keyed by the token kind, or the state's error action
//! 3. invoke it with the caller's context
//! 4. terminate if the state is terminal or the action returned [`Step::Terminate`],
//!    otherwise move to the state the action named
//!
//! After termination the runner forgets its current state and can be started again.

pub mod state;
pub mod trace;

pub use state::{Action, ActionFn, State, Step};
pub use trace::{TraceLine, TRACE_TARGET};

use crate::error::{GrammarError, ParseError};
use crate::lexing::Token;
use std::collections::HashMap;
use std::fmt;

pub struct Fsm<C> {
    name: String,
    states: HashMap<&'static str, State<C>>,
    start: Option<&'static str>,
}

impl<C> Fsm<C> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            states: HashMap::new(),
            start: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn register_state(&mut self, state: State<C>) -> Result<(), GrammarError> {
        if self.states.contains_key(state.name()) {
            return Err(GrammarError::DuplicateState {
                machine: self.name.clone(),
                state: state.name().to_string(),
            });
        }
        self.states.insert(state.name(), state);
        Ok(())
    }

    /// Record the start state. It only has to exist by the time a runner starts.
    pub fn set_start(&mut self, name: &'static str) {
        self.start = Some(name);
    }

    pub fn state(&self, name: &str) -> Option<&State<C>> {
        self.states.get(name)
    }

    /// Check that the start state is set and registered
    pub fn validate(&self) -> Result<&'static str, GrammarError> {
        match self.start {
            Some(start) if self.states.contains_key(start) => Ok(start),
            start => Err(GrammarError::UnknownStartState {
                machine: self.name.clone(),
                state: start.map(str::to_string),
            }),
        }
    }

    pub fn runner(&self) -> Runner<'_, C> {
        Runner {
            fsm: self,
            current: None,
            started: false,
            terminated: false,
            trace: false,
        }
    }
}

impl<C> fmt::Debug for Fsm<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut states: Vec<_> = self.states.keys().collect();
        states.sort();
        f.debug_struct("Fsm")
            .field("name", &self.name)
            .field("states", &states)
            .field("start", &self.start)
            .finish()
    }
}

/// Outcome of one dispatch cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Running,
    Done,
}

/// Execution cursor over an [`Fsm`]
pub struct Runner<'f, C> {
    fsm: &'f Fsm<C>,
    current: Option<&'static str>,
    started: bool,
    terminated: bool,
    trace: bool,
}

impl<'f, C> Runner<'f, C> {
    /// Log a line for every dispatch
    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    pub fn start(&mut self) -> Result<(), GrammarError> {
        let start = self.fsm.validate()?;
        self.current = Some(start);
        self.started = true;
        self.terminated = false;
        Ok(())
    }

    pub fn current(&self) -> Option<&'static str> {
        self.current
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Feed one token to the machine
    pub fn step(&mut self, cx: &mut C, token: &Token) -> Result<Status, ParseError> {
        let machine = self.fsm.name();
        let current = match self.current {
            Some(current) if self.started => current,
            _ if self.terminated => {
                return Err(GrammarError::AlreadyTerminated {
                    machine: machine.to_string(),
                }
                .into())
            }
            _ => {
                return Err(GrammarError::NotStarted {
                    machine: machine.to_string(),
                }
                .into())
            }
        };

        let state = self
            .fsm
            .state(current)
            .ok_or_else(|| GrammarError::UnknownState {
                machine: machine.to_string(),
                state: current.to_string(),
            })?;
        let action = state
            .action_for(token.kind)
            .ok_or_else(|| GrammarError::NoActionDefined {
                machine: machine.to_string(),
                state: current.to_string(),
                kind: token.kind,
            })?;

        let step = action.invoke(cx, token)?;
        let next = match step {
            Step::Next(next) if !state.is_terminal() => Some(next),
            _ => None,
        };

        if self.trace {
            log::info!(
                target: TRACE_TARGET,
                "{}",
                TraceLine {
                    machine,
                    state: current,
                    token,
                    action: action.name(),
                    next,
                }
            );
        }

        match next {
            None => {
                self.terminated = true;
                self.started = false;
                self.current = None;
                Ok(Status::Done)
            }
            Some(next) if self.fsm.state(next).is_some() => {
                self.current = Some(next);
                Ok(Status::Running)
            }
            Some(next) => Err(GrammarError::UnknownState {
                machine: machine.to_string(),
                state: next.to_string(),
            }
            .into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexing::TokenKind;

    type Log = Vec<&'static str>;

    fn to_end(log: &mut Log, _: &Token) -> Result<Step, ParseError> {
        log.push("to_end");
        Ok(Step::Next("end"))
    }

    fn finish(log: &mut Log, _: &Token) -> Result<Step, ParseError> {
        log.push("finish");
        Ok(Step::Next("end"))
    }

    fn stop(log: &mut Log, _: &Token) -> Result<Step, ParseError> {
        log.push("stop");
        Ok(Step::Terminate)
    }

    fn stay(log: &mut Log, _: &Token) -> Result<Step, ParseError> {
        log.push("stay");
        Ok(Step::Next("start"))
    }

    fn nowhere(_: &mut Log, _: &Token) -> Result<Step, ParseError> {
        Ok(Step::Next("missing"))
    }

    fn two_state() -> Fsm<Log> {
        let mut fsm = Fsm::new("two");
        fsm.register_state(
            State::new("start")
                .on(TokenKind::Comma, Action::new("to_end", to_end))
                .on(TokenKind::Label, Action::new("stay", stay))
                .on(TokenKind::EndOfOperands, Action::new("stop", stop))
                .on(TokenKind::Decimal, Action::new("nowhere", nowhere)),
        )
        .unwrap();
        fsm.register_state(
            State::new("end")
                .on(TokenKind::EndOfStatement, Action::new("finish", finish))
                .terminal(),
        )
        .unwrap();
        fsm.set_start("start");
        fsm
    }

    fn token(kind: TokenKind) -> Token {
        Token::new(kind, "", 0..0)
    }

    #[test]
    fn test_registration_lookup_is_identity() {
        let mut fsm: Fsm<Log> = Fsm::new("m");
        fsm.register_state(State::new("a")).unwrap();
        let first = fsm.state("a").unwrap() as *const State<Log>;
        let second = fsm.state("a").unwrap() as *const State<Log>;
        assert!(std::ptr::eq(first, second));

        assert_eq!(
            fsm.register_state(State::new("a")),
            Err(GrammarError::DuplicateState {
                machine: "m".to_string(),
                state: "a".to_string()
            })
        );
    }

    #[test]
    fn test_start_requires_registered_state() {
        let mut fsm: Fsm<Log> = Fsm::new("m");
        assert_eq!(
            fsm.runner().start(),
            Err(GrammarError::UnknownStartState {
                machine: "m".to_string(),
                state: None
            })
        );

        fsm.set_start("a");
        assert_eq!(
            fsm.runner().start(),
            Err(GrammarError::UnknownStartState {
                machine: "m".to_string(),
                state: Some("a".to_string())
            })
        );

        fsm.register_state(State::new("a")).unwrap();
        assert!(fsm.runner().start().is_ok());
    }

    #[test]
    fn test_two_state_machine_terminates_in_end_state_and_restarts() {
        let fsm = two_state();
        let mut runner = fsm.runner();
        let mut log = Vec::new();

        runner.start().unwrap();
        assert_eq!(runner.current(), Some("start"));
        assert_eq!(
            runner.step(&mut log, &token(TokenKind::Comma)),
            Ok(Status::Running)
        );
        assert_eq!(runner.current(), Some("end"));
        assert_eq!(
            runner.step(&mut log, &token(TokenKind::EndOfStatement)),
            Ok(Status::Done)
        );
        assert!(runner.is_terminated());
        assert!(!runner.is_started());
        assert_eq!(runner.current(), None);

        runner.start().unwrap();
        assert!(runner.is_started());
        assert!(!runner.is_terminated());
        assert_eq!(runner.current(), Some("start"));
        assert_eq!(log, vec!["to_end", "finish"]);
    }

    #[test]
    fn test_action_can_terminate() {
        let fsm = two_state();
        let mut runner = fsm.runner();
        let mut log = Vec::new();

        runner.start().unwrap();
        assert_eq!(
            runner.step(&mut log, &token(TokenKind::Label)),
            Ok(Status::Running)
        );
        assert_eq!(
            runner.step(&mut log, &token(TokenKind::EndOfOperands)),
            Ok(Status::Done)
        );
        assert_eq!(log, vec!["stay", "stop"]);
    }

    #[test]
    fn test_terminating_action_ends_on_first_step_and_restarts() {
        let fsm = two_state();
        let mut runner = fsm.runner();
        let mut log = Vec::new();

        runner.start().unwrap();
        assert_eq!(
            runner.step(&mut log, &token(TokenKind::EndOfOperands)),
            Ok(Status::Done)
        );
        assert!(runner.is_terminated());

        runner.start().unwrap();
        assert_eq!(runner.current(), Some("start"));
        assert_eq!(
            runner.step(&mut log, &token(TokenKind::EndOfOperands)),
            Ok(Status::Done)
        );
        assert_eq!(log, vec!["stop", "stop"]);
    }

    #[test]
    fn test_step_out_of_sequence() {
        let fsm = two_state();
        let mut runner = fsm.runner();
        let mut log = Vec::new();

        assert_eq!(
            runner.step(&mut log, &token(TokenKind::Comma)),
            Err(GrammarError::NotStarted {
                machine: "two".to_string()
            }
            .into())
        );

        runner.start().unwrap();
        runner.step(&mut log, &token(TokenKind::EndOfOperands)).unwrap();
        assert_eq!(
            runner.step(&mut log, &token(TokenKind::Comma)),
            Err(GrammarError::AlreadyTerminated {
                machine: "two".to_string()
            }
            .into())
        );
    }

    #[test]
    fn test_missing_action_is_a_defect() {
        let fsm = two_state();
        let mut runner = fsm.runner();
        runner.start().unwrap();

        let err = runner
            .step(&mut Vec::new(), &token(TokenKind::Star))
            .unwrap_err();
        assert_eq!(
            err,
            GrammarError::NoActionDefined {
                machine: "two".to_string(),
                state: "start".to_string(),
                kind: TokenKind::Star,
            }
            .into()
        );
        assert!(err.is_defect());
    }

    #[test]
    fn test_next_state_must_exist() {
        let fsm = two_state();
        let mut runner = fsm.runner();
        runner.start().unwrap();

        assert_eq!(
            runner.step(&mut Vec::new(), &token(TokenKind::Decimal)),
            Err(GrammarError::UnknownState {
                machine: "two".to_string(),
                state: "missing".to_string()
            }
            .into())
        );
    }
}
