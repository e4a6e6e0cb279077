//! Grammar tables
//!
//! A [`Grammar`] bundles the state machine of one statement syntax with the contexts its
//! actions switch between and the way the vocabulary is chosen for a parse. Grammars are
//! built once and kept in statics; building the tables is the expensive part and they never
//! change afterwards.

use super::context::{Context, ContextTable};
use super::manager::ScopeManager;
use super::scope::Scope;
use crate::error::GrammarError;
use crate::fsm::{Fsm, State};
use std::sync::Arc;

/// How the driver picks the vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// One vocabulary for the whole parse
    Fixed(&'static str),
    /// Start in the named context; actions may switch contexts
    ContextSensitive(&'static str),
}

pub struct Grammar<G: Scope> {
    fsm: Fsm<ScopeManager<G>>,
    contexts: Arc<ContextTable<G::Local>>,
    mode: Mode,
}

impl<G: Scope> Grammar<G> {
    /// A grammar parsed with the fixed `vocabulary`
    pub fn single_context(name: &str, vocabulary: &'static str) -> Self {
        Self {
            fsm: Fsm::new(name),
            contexts: Arc::new(ContextTable::new()),
            mode: Mode::Fixed(vocabulary),
        }
    }

    /// A grammar whose parses begin in the `initial` context
    pub fn context_sensitive(name: &str, initial: &'static str) -> Self {
        Self {
            fsm: Fsm::new(name),
            contexts: Arc::new(ContextTable::new()),
            mode: Mode::ContextSensitive(initial),
        }
    }

    pub fn name(&self) -> &str {
        self.fsm.name()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn fsm(&self) -> &Fsm<ScopeManager<G>> {
        &self.fsm
    }

    /// Contexts shared by every scope manager of this grammar
    pub fn contexts(&self) -> &Arc<ContextTable<G::Local>> {
        &self.contexts
    }

    pub fn register_state(&mut self, state: State<ScopeManager<G>>) -> Result<(), GrammarError> {
        self.fsm.register_state(state)
    }

    pub fn set_start(&mut self, name: &'static str) {
        self.fsm.set_start(name);
    }

    pub fn define_context(&mut self, context: Context<G::Local>) -> Result<(), GrammarError> {
        Arc::make_mut(&mut self.contexts).define(context)
    }

    /// Check the start state and, for context-sensitive grammars, the initial context
    pub fn validate(&self) -> Result<(), GrammarError> {
        self.fsm.validate()?;
        if let Mode::ContextSensitive(initial) = self.mode {
            if self.contexts.get(initial).is_none() {
                return Err(GrammarError::UnknownContext {
                    context: initial.to_string(),
                });
            }
        }
        Ok(())
    }
}
