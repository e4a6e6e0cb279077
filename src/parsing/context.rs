//! Grammar contexts
//!
//! A [`Context`] ties a name used by grammar actions to the lexical vocabulary the token
//! source must use while it is active. A context is either global (entering it leaves the
//! local scope alone) or carries a factory for a fresh local scope.

use crate::error::GrammarError;
use std::collections::HashMap;
use std::fmt;

pub struct Context<L> {
    name: &'static str,
    vocabulary: &'static str,
    local: Option<fn() -> L>,
}

impl<L> Context<L> {
    /// A context whose activation creates a new local scope
    pub fn new(name: &'static str, vocabulary: &'static str, local: fn() -> L) -> Self {
        Self {
            name,
            vocabulary,
            local: Some(local),
        }
    }

    /// A context that only changes the vocabulary
    pub fn global(name: &'static str, vocabulary: &'static str) -> Self {
        Self {
            name,
            vocabulary,
            local: None,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn vocabulary(&self) -> &'static str {
        self.vocabulary
    }

    pub fn is_global(&self) -> bool {
        self.local.is_none()
    }

    /// A fresh local scope, None for global contexts
    pub fn new_local(&self) -> Option<L> {
        self.local.map(|factory| factory())
    }
}

impl<L> Clone for Context<L> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            vocabulary: self.vocabulary,
            local: self.local,
        }
    }
}

impl<L> fmt::Debug for Context<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("name", &self.name)
            .field("vocabulary", &self.vocabulary)
            .field("global", &self.is_global())
            .finish()
    }
}

pub struct ContextTable<L> {
    contexts: HashMap<&'static str, Context<L>>,
}

impl<L> ContextTable<L> {
    pub fn new() -> Self {
        Self {
            contexts: HashMap::new(),
        }
    }

    pub fn define(&mut self, context: Context<L>) -> Result<(), GrammarError> {
        if self.contexts.contains_key(context.name) {
            return Err(GrammarError::DuplicateContext {
                context: context.name.to_string(),
            });
        }
        self.contexts.insert(context.name, context);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Context<L>> {
        self.contexts.get(name)
    }

    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }
}

impl<L> Clone for ContextTable<L> {
    fn clone(&self) -> Self {
        Self {
            contexts: self.contexts.clone(),
        }
    }
}

impl<L> Default for ContextTable<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L> fmt::Debug for ContextTable<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut contexts: Vec<_> = self.contexts.values().collect();
        contexts.sort_by_key(|context| context.name);
        f.debug_list().entries(contexts).finish()
    }
}
