//! Result accumulators
//!
//! Every grammar collects its result in a global scope object, created fresh for each parse
//! and handed back to the caller when the machine terminates. A global scope carries a slot
//! for the local scope of the active context: entering a context that is not global puts a
//! new local accumulator there, replacing the previous one.

pub trait Scope {
    /// Accumulator type of the grammar's non-global contexts
    type Local;

    fn local_slot(&mut self) -> &mut Option<Self::Local>;

    fn local(&self) -> Option<&Self::Local>;
}
