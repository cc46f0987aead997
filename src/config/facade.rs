//! ConfigLoader facade delegating to the merge service.

use super::merge::service::MergeService;
use super::sources::dotenv;
use super::Settings;
use config::ConfigError;
use std::collections::HashMap;
use std::path::Path;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load `.env` into the process environment, then merge all sources.
    pub fn load(workspace_root: &Path) -> Result<Settings, ConfigError> {
        dotenv::load(workspace_root);
        MergeService::load(workspace_root)
    }

    /// Merge sources against an explicit environment map instead of the
    /// process environment. `.env` is not consulted.
    pub fn load_with_env(
        workspace_root: &Path,
        env: HashMap<String, String>,
    ) -> Result<Settings, ConfigError> {
        MergeService::load_with_env(workspace_root, Some(env))
    }

    /// Create default settings.
    pub fn default() -> Settings {
        Settings::default()
    }
}
