//! Configuration
//!
//! Typed settings loaded once at process entry from defaults, an optional
//! `gen-bootstrap.toml` in the workspace, the workspace `.env` file, and the
//! process environment. The resulting [`Settings`] value is passed by reference
//! to every component; there is no global settings object.

pub mod facade;
pub mod merge;
pub mod sources;

use crate::error::BootstrapError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use facade::ConfigLoader;

/// Project id value that marks an unconfigured project.
pub const PLACEHOLDER_PROJECT_ID: &str = "your-gcp-project-id";

/// Environment variable consulted last when resolving a project id.
pub const PROJECT_ID_ENV: &str = "GCP_PROJECT_ID";

fn default_project_id() -> String {
    PLACEHOLDER_PROJECT_ID.to_string()
}

fn default_prompt_secret_id() -> String {
    "default-prompt".to_string()
}

fn default_gemini_model() -> String {
    "gemini-1.5-pro-latest".to_string()
}

fn default_location() -> String {
    "us-central1".to_string()
}

fn default_tools_dir() -> PathBuf {
    PathBuf::from("tools")
}

fn default_prompts_dir() -> PathBuf {
    PathBuf::from("prompts")
}

fn default_tokenizer_command() -> String {
    "ttok".to_string()
}

/// `gpt-4` selects the `cl100k_base` encoding in the tokenizer CLI.
fn default_tokenizer_model() -> String {
    "gpt-4".to_string()
}

/// Application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Google Cloud project id (`GCP_PROJECT_ID`)
    #[serde(default = "default_project_id")]
    pub gcp_project_id: String,

    /// Secret holding the default agent prompt (`DEFAULT_PROMPT_SECRET_ID`)
    #[serde(default = "default_prompt_secret_id")]
    pub default_prompt_secret_id: String,

    /// Model used by the agent (`DEFAULT_GEMINI_MODEL`)
    #[serde(default = "default_gemini_model")]
    pub default_gemini_model: String,

    /// Region for Vertex AI requests (`GCP_LOCATION`)
    #[serde(default = "default_location")]
    pub gcp_location: String,

    /// Directory scanned for tool manifests, relative to the workspace
    #[serde(default = "default_tools_dir")]
    pub tools_dir: PathBuf,

    /// Directory holding local prompt files, relative to the workspace
    #[serde(default = "default_prompts_dir")]
    pub prompts_dir: PathBuf,

    /// Upper bound for captured external commands; unbounded when unset
    #[serde(default)]
    pub command_timeout_secs: Option<u64>,

    /// Tokenizer executable
    #[serde(default = "default_tokenizer_command")]
    pub tokenizer_command: String,

    /// Model name handed to the tokenizer to select its encoding
    #[serde(default = "default_tokenizer_model")]
    pub tokenizer_model: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            gcp_project_id: default_project_id(),
            default_prompt_secret_id: default_prompt_secret_id(),
            default_gemini_model: default_gemini_model(),
            gcp_location: default_location(),
            tools_dir: default_tools_dir(),
            prompts_dir: default_prompts_dir(),
            command_timeout_secs: None,
            tokenizer_command: default_tokenizer_command(),
            tokenizer_model: default_tokenizer_model(),
        }
    }
}

impl Settings {
    /// Configured project id, or `None` when empty or still the placeholder.
    pub fn project_id(&self) -> Option<&str> {
        configured(&self.gcp_project_id)
    }

    /// Resolve the effective project id.
    ///
    /// Precedence: explicit flag, settings, `GCP_PROJECT_ID`. Fails with a
    /// configuration error before any external call is attempted.
    pub fn resolve_project_id(&self, explicit: Option<&str>) -> Result<String, BootstrapError> {
        if let Some(id) = explicit {
            if !id.trim().is_empty() {
                return Ok(id.trim().to_string());
            }
        }
        if let Some(id) = self.project_id() {
            return Ok(id.to_string());
        }
        if let Ok(id) = std::env::var(PROJECT_ID_ENV) {
            if let Some(id) = configured(&id) {
                return Ok(id.to_string());
            }
        }
        Err(BootstrapError::ConfigError(
            "GCP Project ID not determined. Please provide it via --project/--project-id, \
             .env, or the GCP_PROJECT_ID environment variable."
                .to_string(),
        ))
    }
}

fn configured(value: &str) -> Option<&str> {
    let value = value.trim();
    if value.is_empty() || value == PLACEHOLDER_PROJECT_ID {
        None
    } else {
        Some(value)
    }
}
