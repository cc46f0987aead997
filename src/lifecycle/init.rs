//! `init`: create `.env` from the template and scaffold workspace directories.

use crate::config::sources::dotenv::DOTENV_FILE;
use crate::config::Settings;
use crate::error::BootstrapError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const TEMPLATE_ENV_FILE: &str = "template.env";

pub const EXAMPLE_MANIFEST_FILE: &str = "example_tool.toml";

pub const EXAMPLE_MANIFEST: &str = r#"# Tools exposed to the agent. Each [[tool]] sets exactly one of
# `native`, `command`, or `builtin`.

[[tool]]
native = "get_current_time"

[[tool]]
builtin = "google_search"

# [[tool]]
# name = "word_count"
# description = "Count the words in a text"
# command = ["python3", "tools/word_count.py"]
# parameters = [{ name = "text", type = "str" }]
"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvFileOutcome {
    Created,
    Overwritten,
    AlreadyExists,
    TemplateMissing,
}

#[derive(Debug, Clone)]
pub struct InitResult {
    pub env_file: EnvFileOutcome,
    pub created_dirs: Vec<PathBuf>,
    pub example_manifest: Option<PathBuf>,
}

/// Scaffold the workspace. With `force`, an existing `.env` is replaced by the template.
pub fn init_project(
    workspace: &Path,
    settings: &Settings,
    force: bool,
) -> Result<InitResult, BootstrapError> {
    let env_path = workspace.join(DOTENV_FILE);
    let template = workspace.join(TEMPLATE_ENV_FILE);
    let env_exists = env_path.exists();

    let env_file = if env_exists && !force {
        EnvFileOutcome::AlreadyExists
    } else if !template.is_file() {
        EnvFileOutcome::TemplateMissing
    } else {
        fs::copy(&template, &env_path)?;
        info!(path = %env_path.display(), "Created .env from template");
        if env_exists {
            EnvFileOutcome::Overwritten
        } else {
            EnvFileOutcome::Created
        }
    };

    let mut created_dirs = Vec::new();
    let mut example_manifest = None;
    let tools_dir = workspace.join(&settings.tools_dir);
    if !tools_dir.exists() {
        fs::create_dir_all(&tools_dir)?;
        let manifest = tools_dir.join(EXAMPLE_MANIFEST_FILE);
        fs::write(&manifest, EXAMPLE_MANIFEST)?;
        created_dirs.push(tools_dir);
        example_manifest = Some(manifest);
    }
    let prompts_dir = workspace.join(&settings.prompts_dir);
    if !prompts_dir.exists() {
        fs::create_dir_all(&prompts_dir)?;
        created_dirs.push(prompts_dir);
    }

    Ok(InitResult {
        env_file,
        created_dirs,
        example_manifest,
    })
}
