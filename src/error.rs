//! Error taxonomy for gen-bootstrap.
//!
//! Every command returns `Result<_, BootstrapError>`; the binary prints the error and
//! exits with [`BootstrapError::exit_code`].

use thiserror::Error;

/// Errors surfaced at the command boundary.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// Required setting or option missing, or still the placeholder value
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// An external executable is not on PATH
    #[error("'{program}' CLI not found. Please install and configure it.")]
    ExternalToolNotFound { program: String },

    /// An external executable exited non-zero
    #[error("'{program}' exited with code {exit_code}")]
    ExternalToolFailure {
        program: String,
        exit_code: i32,
        stdout: String,
        stderr: String,
    },

    /// The test runner failed; the process exits with the runner's own code
    #[error("Tests failed with return code: {exit_code}")]
    TestsFailed { exit_code: i32 },

    /// An external command did not finish within its timeout
    #[error("'{program}' timed out after {seconds} seconds")]
    Timeout { program: String, seconds: u64 },

    /// A Google Cloud REST call failed
    #[error("Remote API error ({status}): {message}")]
    RemoteApi { status: u16, message: String },

    /// A fetched secret payload did not match its CRC32C checksum
    #[error("Checksum mismatch for {resource}: expected {expected}, computed {computed}")]
    Checksum {
        resource: String,
        expected: u32,
        computed: u32,
    },

    /// A tool handler returned an error
    #[error("Tool '{name}' failed: {message}")]
    ToolFailed { name: String, message: String },

    /// A named tool, prompt, or file does not exist
    #[error("{0}")]
    NotFound(String),

    /// Invalid user input (conflicting flags, malformed JSON/YAML)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Local file read/write failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BootstrapError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            BootstrapError::TestsFailed { exit_code } if *exit_code != 0 => *exit_code,
            _ => 1,
        }
    }

    /// Convenience constructor for a missing external tool.
    pub fn tool_not_found(program: impl Into<String>) -> Self {
        BootstrapError::ExternalToolNotFound {
            program: program.into(),
        }
    }
}

impl From<config::ConfigError> for BootstrapError {
    fn from(err: config::ConfigError) -> Self {
        BootstrapError::ConfigError(err.to_string())
    }
}

impl From<serde_json::Error> for BootstrapError {
    fn from(err: serde_json::Error) -> Self {
        BootstrapError::InvalidInput(format!("JSON error: {}", err))
    }
}

impl From<serde_yaml::Error> for BootstrapError {
    fn from(err: serde_yaml::Error) -> Self {
        BootstrapError::InvalidInput(format!("YAML error: {}", err))
    }
}

impl From<reqwest::Error> for BootstrapError {
    fn from(err: reqwest::Error) -> Self {
        BootstrapError::RemoteApi {
            status: err.status().map(|s| s.as_u16()).unwrap_or(0),
            message: err.to_string(),
        }
    }
}
