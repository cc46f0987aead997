//! Prompt Stores
//!
//! Prompts live either as flat files in the workspace `prompts/` directory or as
//! versioned resources in the Vertex AI prompt registry. Both sit behind
//! [`PromptStore`]; new prompts are described by a YAML [`PromptDefinition`].

pub mod commands;
pub mod local;
pub mod vertex;

use crate::error::BootstrapError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub use commands::{PromptCommandService, PromptCreateResult, PromptGetResult, PromptListResult};
pub use local::LocalPromptStore;
pub use vertex::VertexPromptRegistry;

/// One prompt as reported by a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptRecord {
    pub id: String,
    pub display_name: String,
    pub version: Option<String>,
    pub model: Option<String>,
    /// Prompt text; listings may leave it out
    pub content: Option<String>,
}

/// YAML prompt description used by `prompts create`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptDefinition {
    pub prompt_name: Option<String>,
    pub model_name: Option<String>,
    pub prompt_data: Option<String>,
    pub system_instruction: Option<String>,
}

/// Definition with every mandatory field present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidPrompt {
    pub prompt_name: String,
    pub model_name: String,
    pub prompt_data: String,
    pub system_instruction: Option<String>,
}

impl PromptDefinition {
    pub fn parse(yaml: &str) -> Result<Self, BootstrapError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, BootstrapError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            BootstrapError::NotFound(format!("Cannot read prompt file '{}': {}", path.display(), e))
        })?;
        Self::parse(&content)
    }

    /// Require `prompt_name`, `model_name`, and `prompt_data`.
    pub fn validate(self) -> Result<ValidPrompt, BootstrapError> {
        let missing: Vec<&str> = [
            ("prompt_name", &self.prompt_name),
            ("model_name", &self.model_name),
            ("prompt_data", &self.prompt_data),
        ]
        .iter()
        .filter(|(_, value)| value.as_deref().map_or(true, |v| v.trim().is_empty()))
        .map(|(field, _)| *field)
        .collect();
        if !missing.is_empty() {
            return Err(BootstrapError::InvalidInput(format!(
                "YAML file must contain 'prompt_name', 'model_name', and 'prompt_data' (missing: {}).",
                missing.join(", ")
            )));
        }
        Ok(ValidPrompt {
            prompt_name: self.prompt_name.unwrap_or_default(),
            model_name: self.model_name.unwrap_or_default(),
            prompt_data: self.prompt_data.unwrap_or_default(),
            system_instruction: self.system_instruction.filter(|s| !s.trim().is_empty()),
        })
    }
}

#[async_trait]
pub trait PromptStore: Send + Sync {
    /// Human-readable location shown in listings.
    fn describe(&self) -> String;

    async fn list(&self) -> Result<Vec<PromptRecord>, BootstrapError>;

    /// One prompt with its content; `version` selects a specific revision.
    async fn get(&self, id: &str, version: Option<&str>) -> Result<PromptRecord, BootstrapError>;

    async fn create(&self, prompt: &ValidPrompt) -> Result<PromptRecord, BootstrapError>;
}
