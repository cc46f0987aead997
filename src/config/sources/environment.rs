//! Environment variable source: unprefixed, lowercased to field names.
//!
//! `GCP_PROJECT_ID` maps to `gcp_project_id`, `DEFAULT_GEMINI_MODEL` to
//! `default_gemini_model`, and so on. Unrelated variables are ignored at
//! deserialization time.

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::Environment;
use std::collections::HashMap;

/// Add environment variable overlay to builder.
///
/// `overrides` replaces the process environment as the source; tests use it to
/// avoid mutating global state.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    overrides: Option<HashMap<String, String>>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let environment = Environment::default().try_parsing(true);
    let environment = match overrides {
        Some(map) => environment.source(Some(map)),
        None => environment,
    };
    Ok(builder.add_source(environment))
}
