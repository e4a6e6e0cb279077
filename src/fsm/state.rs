//! States and actions
//!
//! A [`State`] is plain data: a table from [`TokenKind`] to [`Action`], an optional error
//! action used for every kind without an entry, and a flag marking it terminal. Actions are
//! named function pointers so the tables can live in statics and be shared by any number
//! of parsers.

use crate::error::ParseError;
use crate::lexing::{Token, TokenKind};
use std::collections::HashMap;
use std::fmt;

/// What the machine does after an action ran
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Continue in the named state
    Next(&'static str),
    /// Stop the machine now
    Terminate,
}

pub type ActionFn<C> = fn(&mut C, &Token) -> Result<Step, ParseError>;

/// A named unit of grammar behavior
pub struct Action<C> {
    name: &'static str,
    run: ActionFn<C>,
}

impl<C> Action<C> {
    pub const fn new(name: &'static str, run: ActionFn<C>) -> Self {
        Self { name, run }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn invoke(&self, cx: &mut C, token: &Token) -> Result<Step, ParseError> {
        (self.run)(cx, token)
    }
}

impl<C> Clone for Action<C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for Action<C> {}

impl<C> fmt::Debug for Action<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Action({})", self.name)
    }
}

pub struct State<C> {
    name: &'static str,
    actions: HashMap<TokenKind, Action<C>>,
    error_action: Option<Action<C>>,
    terminal: bool,
}

impl<C> State<C> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            actions: HashMap::new(),
            error_action: None,
            terminal: false,
        }
    }

    /// Run `action` when a token of `kind` arrives in this state
    pub fn on(mut self, kind: TokenKind, action: Action<C>) -> Self {
        self.actions.insert(kind, action);
        self
    }

    /// Register the same action for several kinds
    pub fn on_each(mut self, kinds: &[TokenKind], action: Action<C>) -> Self {
        for kind in kinds {
            self.actions.insert(*kind, action);
        }
        self
    }

    /// Action for every kind without an entry of its own
    pub fn on_error(mut self, action: Action<C>) -> Self {
        self.error_action = Some(action);
        self
    }

    /// The machine ends after any dispatch in this state
    pub fn terminal(mut self) -> Self {
        self.terminal = true;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    /// The action a token of `kind` selects, falling back to the error action
    pub fn action_for(&self, kind: TokenKind) -> Option<&Action<C>> {
        self.actions.get(&kind).or(self.error_action.as_ref())
    }

    /// Check if `kind` has an action of its own (not the error action)
    pub fn handles(&self, kind: TokenKind) -> bool {
        self.actions.contains_key(&kind)
    }
}

impl<C> fmt::Debug for State<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<_> = self.actions.keys().collect();
        kinds.sort();
        f.debug_struct("State")
            .field("name", &self.name)
            .field("kinds", &kinds)
            .field("error_action", &self.error_action)
            .field("terminal", &self.terminal)
            .finish()
    }
}
