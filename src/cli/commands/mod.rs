//! Command implementations for codeir
//!
//! Each command is implemented in its own module.

pub mod apply;
pub mod config;
pub mod map;
pub mod missing;
pub mod nodes;
pub mod symbols;
