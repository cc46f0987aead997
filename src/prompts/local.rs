//! Prompts as flat files in a local directory.

use super::{PromptRecord, PromptStore, ValidPrompt};
use crate::error::BootstrapError;
use async_trait::async_trait;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone)]
pub struct LocalPromptStore {
    dir: PathBuf,
}

impl LocalPromptStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn exists(&self) -> bool {
        self.dir.is_dir()
    }

    fn require_dir(&self) -> Result<(), BootstrapError> {
        if self.exists() {
            Ok(())
        } else {
            Err(BootstrapError::NotFound(format!(
                "Prompts directory '{}' not found.",
                self.dir.display()
            )))
        }
    }

    /// Non-hidden regular file names, sorted.
    pub fn file_names(&self) -> Result<Vec<String>, BootstrapError> {
        self.require_dir()?;
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if !name.starts_with('.') && entry.path().is_file() {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    /// A single plain path component; rejects separators, `.` and `..`.
    fn is_plain_name(name: &str) -> bool {
        let mut components = Path::new(name).components();
        matches!(components.next(), Some(Component::Normal(_))) && components.next().is_none()
    }

    fn record(name: &str, content: Option<String>) -> PromptRecord {
        PromptRecord {
            id: name.to_string(),
            display_name: name.to_string(),
            version: None,
            model: None,
            content,
        }
    }
}

#[async_trait]
impl PromptStore for LocalPromptStore {
    fn describe(&self) -> String {
        format!("local directory '{}'", self.dir.display())
    }

    async fn list(&self) -> Result<Vec<PromptRecord>, BootstrapError> {
        Ok(self
            .file_names()?
            .iter()
            .map(|name| Self::record(name, None))
            .collect())
    }

    async fn get(&self, id: &str, version: Option<&str>) -> Result<PromptRecord, BootstrapError> {
        self.require_dir()?;
        if version.is_some() {
            return Err(BootstrapError::InvalidInput(
                "local prompt files are not versioned; use --remote".to_string(),
            ));
        }
        let path = self.dir.join(id);
        if !Self::is_plain_name(id) || !path.is_file() {
            return Err(BootstrapError::NotFound(format!(
                "Prompt file '{}' not found in '{}'.",
                id,
                self.dir.display()
            )));
        }
        let content = fs::read_to_string(&path)?;
        Ok(Self::record(id, Some(content)))
    }

    async fn create(&self, prompt: &ValidPrompt) -> Result<PromptRecord, BootstrapError> {
        if !Self::is_plain_name(&prompt.prompt_name) {
            return Err(BootstrapError::InvalidInput(format!(
                "prompt_name '{}' must be a plain file name.",
                prompt.prompt_name
            )));
        }
        fs::create_dir_all(&self.dir)?;
        let name = format!("{}.txt", prompt.prompt_name);
        let path = self.dir.join(&name);
        if path.exists() {
            return Err(BootstrapError::InvalidInput(format!(
                "Prompt file '{}' already exists.",
                path.display()
            )));
        }
        let content = match &prompt.system_instruction {
            Some(system) => format!("{}\n\n{}", system.trim_end(), prompt.prompt_data),
            None => prompt.prompt_data.clone(),
        };
        fs::write(&path, &content)?;
        info!(path = %path.display(), "Created local prompt file");
        Ok(PromptRecord {
            model: Some(prompt.model_name.clone()),
            ..Self::record(&name, Some(content))
        })
    }
}
