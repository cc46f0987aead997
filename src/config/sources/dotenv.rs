//! `.env` loading for the CLI execution context.

use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Name of the per-workspace environment file.
pub const DOTENV_FILE: &str = ".env";

/// Load `<workspace>/.env` into the process environment.
///
/// Variables that are already set keep their value. A missing file is not an
/// error; a malformed one is logged and skipped. Returns the loaded path.
pub fn load(workspace_root: &Path) -> Option<PathBuf> {
    let path = workspace_root.join(DOTENV_FILE);
    if !path.is_file() {
        debug!(path = %path.display(), "No .env file found");
        return None;
    }
    match dotenvy::from_path(&path) {
        Ok(()) => {
            debug!(path = %path.display(), "Loaded .env file");
            Some(path)
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to load .env file");
            None
        }
    }
}
