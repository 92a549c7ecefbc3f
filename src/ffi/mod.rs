//! C ABI for embedding the traversal in other processes.

pub mod c_api;
