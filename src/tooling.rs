//! Tooling & Integration Layer
//!
//! The command-line surface: argument parsing, dispatch, and result formatting.

pub mod cli;
pub mod format;

pub use cli::{Cli, CliContext, Commands};
