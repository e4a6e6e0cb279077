//! One-slot lookahead buffer
//!
//! An action that sees a token belonging to the next construct can [`stack`](Lookahead::stack)
//! it; the driver then presents it again to whatever state the action moved to, before
//! pulling anything new from the token source. At most one token is ever queued.

use crate::error::GrammarError;
use crate::lexing::Token;

#[derive(Debug, Default)]
pub struct Lookahead {
    slot: Option<Token>,
    in_flight: bool,
}

impl Lookahead {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `token` to be dispatched again
    pub fn stack(&mut self, token: Token) -> Result<(), GrammarError> {
        if self.slot.is_some() {
            return Err(GrammarError::AlreadyQueued);
        }
        self.slot = Some(token);
        Ok(())
    }

    /// Take the queued token for dispatch. It counts as in flight until
    /// [`consumed`](Lookahead::consumed) is called.
    pub fn unstack(&mut self) -> Result<Token, GrammarError> {
        if self.slot.is_none() {
            return Err(GrammarError::EmptyLookahead);
        }
        if self.in_flight {
            return Err(GrammarError::AlreadyQueued);
        }
        self.in_flight = true;
        self.slot.take().ok_or(GrammarError::EmptyLookahead)
    }

    /// The dispatch cycle of the last unstacked token finished
    pub fn consumed(&mut self) {
        self.in_flight = false;
    }

    pub fn is_loaded(&self) -> bool {
        self.slot.is_some()
    }
}
