//! High-level operations: counting traversals over a store.

pub mod counter;

pub use counter::{CountOutcome, TrueBCounter, NO_ROOT};
