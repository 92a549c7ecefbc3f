//! One entry point for label and property lookups, cached or not.

pub mod attributes;
pub mod config;
pub mod operations;

pub use attributes::AttributeFacade;
pub use config::CacheConfig;
pub use operations::{LabelOperations, PropertyOperations};
