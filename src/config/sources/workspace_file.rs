//! Workspace config file source: optional `gen-bootstrap.toml` at the workspace root.

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, File, FileFormat};
use std::path::{Path, PathBuf};

/// File name of the workspace configuration file.
pub const WORKSPACE_CONFIG_FILE: &str = "gen-bootstrap.toml";

/// Path of the workspace configuration file.
pub fn path(workspace_root: &Path) -> PathBuf {
    workspace_root.join(WORKSPACE_CONFIG_FILE)
}

/// Add the workspace file (if present) to builder.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    workspace_root: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let file_path = path(workspace_root);
    Ok(builder.add_source(
        File::from(file_path)
            .format(FileFormat::Toml)
            .required(false),
    ))
}
