//! Integration tests for gen-bootstrap

mod lifecycle_commands;
mod parse;
mod prompt_commands;
mod secret_commands;
mod support;
mod tool_commands;
