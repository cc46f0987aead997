//! Prompt command service: one entry point per `prompts` CLI variant.

use super::{PromptDefinition, PromptRecord, PromptStore};
use crate::error::BootstrapError;
use std::path::Path;

pub struct PromptCommandService;

#[derive(Debug, Clone)]
pub struct PromptListResult {
    pub source: String,
    pub prompts: Vec<PromptRecord>,
}

#[derive(Debug, Clone)]
pub struct PromptGetResult {
    pub prompt: PromptRecord,
}

#[derive(Debug, Clone)]
pub struct PromptCreateResult {
    pub prompt: PromptRecord,
    pub source: String,
}

impl PromptCommandService {
    pub async fn list(store: &dyn PromptStore) -> Result<PromptListResult, BootstrapError> {
        Ok(PromptListResult {
            source: store.describe(),
            prompts: store.list().await?,
        })
    }

    pub async fn get(
        store: &dyn PromptStore,
        id: &str,
        version: Option<&str>,
    ) -> Result<PromptGetResult, BootstrapError> {
        Ok(PromptGetResult {
            prompt: store.get(id, version).await?,
        })
    }

    /// Create a prompt from a YAML definition file.
    pub async fn create(
        store: &dyn PromptStore,
        yaml_path: &Path,
    ) -> Result<PromptCreateResult, BootstrapError> {
        let prompt = PromptDefinition::from_file(yaml_path)?.validate()?;
        Ok(PromptCreateResult {
            prompt: store.create(&prompt).await?,
            source: store.describe(),
        })
    }
}
