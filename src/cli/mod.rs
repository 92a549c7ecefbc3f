//! Command-line interface for the `ttrav` tool.

pub mod commands;
