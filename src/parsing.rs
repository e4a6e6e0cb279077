//! Context-sensitive parsing on top of the state machine core
//!
//! A grammar's actions operate on a [`ScopeManager`]: the global scope collecting the parse
//! result, the local scope of the active context, a stack of saved global scopes for nested
//! sub-parses and a one-slot lookahead. The [`Parser`] drives a [`Grammar`] with tokens from a
//! [`TokenSource`](crate::lexing::TokenSource), asking for each token in the vocabulary of the
//! active context.
//!
//! Two kinds of grammars exist (see [`Mode`]):
//!
//! - single-context grammars read the whole statement with one fixed vocabulary
//! - context-sensitive grammars start in an initial context and their actions switch
//!   contexts, and with them vocabularies, as the statement is recognized

pub mod context;
pub mod driver;
pub mod grammar;
pub mod lookahead;
pub mod manager;
pub mod scope;

pub use context::{Context, ContextTable};
pub use driver::Parser;
pub use grammar::{Grammar, Mode};
pub use lookahead::Lookahead;
pub use manager::ScopeManager;
pub use scope::Scope;
