//! Secondary indexes over the in-memory graph.

pub mod label_index;

pub use label_index::LabelIndex;
