//! Scope and context manager
//!
//! The [`ScopeManager`] is everything a grammar action can touch during a parse:
//!
//! - the active global scope, and through it the local scope of the active context
//! - the stack of saved global scopes, for sub-parses that need a fresh accumulator
//! - the lookahead slot
//! - the active context, and with it the vocabulary the driver asks the token source for

use super::context::ContextTable;
use super::lookahead::Lookahead;
use super::scope::Scope;
use crate::error::GrammarError;
use crate::lexing::Token;
use std::sync::Arc;

pub struct ScopeManager<G: Scope> {
    scope: G,
    saved: Vec<G>,
    lookahead: Lookahead,
    contexts: Arc<ContextTable<G::Local>>,
    switchable: bool,
    context: Option<&'static str>,
    vocabulary: Option<&'static str>,
}

impl<G: Scope> ScopeManager<G> {
    /// Manager for a context-sensitive parse. No context is active until the first switch.
    pub fn new(scope: G, contexts: Arc<ContextTable<G::Local>>) -> Self {
        Self {
            scope,
            saved: Vec::new(),
            lookahead: Lookahead::new(),
            contexts,
            switchable: true,
            context: None,
            vocabulary: None,
        }
    }

    /// Manager for a parse over one fixed vocabulary
    pub fn fixed(scope: G, vocabulary: &'static str) -> Self {
        Self {
            scope,
            saved: Vec::new(),
            lookahead: Lookahead::new(),
            contexts: Arc::new(ContextTable::new()),
            switchable: false,
            context: None,
            vocabulary: Some(vocabulary),
        }
    }

    pub fn scope(&self) -> &G {
        &self.scope
    }

    pub fn scope_mut(&mut self) -> &mut G {
        &mut self.scope
    }

    pub fn local(&self) -> Result<&G::Local, GrammarError> {
        self.scope.local().ok_or(GrammarError::NoLocalScope)
    }

    pub fn local_mut(&mut self) -> Result<&mut G::Local, GrammarError> {
        self.scope
            .local_slot()
            .as_mut()
            .ok_or(GrammarError::NoLocalScope)
    }

    /// Detach the local scope, leaving the slot empty
    pub fn take_local(&mut self) -> Result<G::Local, GrammarError> {
        self.scope
            .local_slot()
            .take()
            .ok_or(GrammarError::NoLocalScope)
    }

    pub fn context(&self) -> Option<&'static str> {
        self.context
    }

    /// Name of the vocabulary the token source must use for the next token
    pub fn vocabulary(&self) -> Option<&'static str> {
        self.vocabulary
    }

    /// Make `name` the active context. Unless the context is global, `supplied` (or a fresh
    /// local scope from the context's factory) replaces the current local scope.
    pub fn switch_context(
        &mut self,
        name: &str,
        supplied: Option<G::Local>,
    ) -> Result<(), GrammarError> {
        if !self.switchable {
            return Err(GrammarError::FixedVocabulary {
                context: name.to_string(),
            });
        }
        let context = self
            .contexts
            .get(name)
            .ok_or_else(|| GrammarError::UnknownContext {
                context: name.to_string(),
            })?;

        if !context.is_global() {
            *self.scope.local_slot() = supplied.or_else(|| context.new_local());
        }
        self.context = Some(context.name());
        self.vocabulary = Some(context.vocabulary());
        log::debug!(
            "context {} active, vocabulary {}",
            context.name(),
            context.vocabulary()
        );
        Ok(())
    }

    /// Save the active global scope and make `scope` active
    pub fn push_scope(&mut self, scope: G) {
        let saved = std::mem::replace(&mut self.scope, scope);
        self.saved.push(saved);
        log::debug!("pushed scope, depth {}", self.saved.len());
    }

    /// Reactivate the most recently saved global scope and return it. The sub-parse scope
    /// it displaces is dropped; use [`Self::pop_sub_scope`] to keep it.
    pub fn pop_scope(&mut self) -> Result<&mut G, GrammarError> {
        self.pop_sub_scope()?;
        Ok(&mut self.scope)
    }

    /// Reactivate the most recently saved global scope, handing back the sub-parse scope
    /// it displaces
    pub fn pop_sub_scope(&mut self) -> Result<G, GrammarError> {
        let saved = self.saved.pop().ok_or(GrammarError::EmptyStack)?;
        log::debug!("popped scope, depth {}", self.saved.len());
        Ok(std::mem::replace(&mut self.scope, saved))
    }

    /// Number of saved global scopes
    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    /// Present `token` again on the next dispatch cycle
    pub fn stack(&mut self, token: Token) -> Result<(), GrammarError> {
        self.lookahead.stack(token)
    }

    pub fn unstack(&mut self) -> Result<Token, GrammarError> {
        self.lookahead.unstack()
    }

    pub(crate) fn lookahead_mut(&mut self) -> &mut Lookahead {
        &mut self.lookahead
    }

    /// The completed global scope. Every pushed scope must have been popped.
    pub fn into_scope(self) -> Result<G, GrammarError> {
        if !self.saved.is_empty() {
            return Err(GrammarError::UnbalancedScopes {
                depth: self.saved.len(),
            });
        }
        Ok(self.scope)
    }
}
