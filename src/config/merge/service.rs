//! MergeService: orchestrates sources and deserializes to Settings.

use crate::config::sources::{environment, workspace_file};
use crate::config::Settings;
use config::{Config, ConfigError};
use std::collections::HashMap;
use std::path::Path;

/// Merge service for settings composition.
pub struct MergeService;

impl MergeService {
    /// Load settings from the workspace file and the process environment.
    /// Precedence: field defaults (lowest) -> workspace file -> environment (highest).
    pub fn load(workspace_root: &Path) -> Result<Settings, ConfigError> {
        Self::load_with_env(workspace_root, None)
    }

    /// Same as [`MergeService::load`] with an explicit environment map.
    pub fn load_with_env(
        workspace_root: &Path,
        env: Option<HashMap<String, String>>,
    ) -> Result<Settings, ConfigError> {
        let builder = Config::builder();
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        let builder = environment::add_to_builder(builder, env)?;

        let config = builder.build()?;
        config.try_deserialize()
    }
}
