//! Configuration sources, lowest to highest precedence.

pub mod dotenv;
pub mod environment;
pub mod workspace_file;
