//! codeir - Declaration IR for source code
//!
//! Parses C, C++, JavaScript, TypeScript/TSX and Python into a per-file
//! table of functions, classes and types with byte-exact spans, and
//! reconciles generated code blocks back onto the original buffers.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod infra;
pub mod models;
pub mod services;

pub use error::{CodeirError, CodeirResult};
