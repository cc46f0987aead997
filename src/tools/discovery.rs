//! Tool manifest discovery.
//!
//! A manifest is a `.toml` file in the tools directory declaring `[[tool]]`
//! entries. Each entry names exactly one handler:
//!
//! ```toml
//! [[tool]]
//! native = "get_current_time"
//!
//! [[tool]]
//! name = "word_count"
//! description = "Count words in text"
//! command = ["python3", "tools/word_count.py"]
//! parameters = [{ name = "text", type = "str" }]
//! ```

use super::descriptor::{first_line, ToolDescriptor, ToolHandler, ToolParameter};
use super::native::NativeTable;
use crate::error::BootstrapError;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Suffix recognized as a tool manifest.
pub const MANIFEST_EXTENSION: &str = "toml";

/// Framework tools executed by the model backend.
pub const KNOWN_BUILTINS: &[&str] = &["google_search"];

/// Parsed manifest file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToolManifest {
    #[serde(default, rename = "tool")]
    pub tools: Vec<ManifestTool>,
}

/// One `[[tool]]` entry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ManifestTool {
    pub name: Option<String>,
    pub description: Option<String>,
    pub documentation: Option<String>,
    pub native: Option<String>,
    pub command: Option<Vec<String>>,
    pub builtin: Option<String>,
    pub parameters: Option<Vec<ManifestParameter>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ManifestParameter {
    pub name: String,
    #[serde(rename = "type", default = "default_type")]
    pub type_name: String,
    pub default: Option<toml::Value>,
    pub description: Option<String>,
}

fn default_type() -> String {
    "any".to_string()
}

impl ManifestParameter {
    fn into_parameter(self) -> Result<ToolParameter, String> {
        let default = self
            .default
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| format!("parameter '{}': {}", self.name, e))?;
        Ok(ToolParameter {
            name: self.name,
            type_name: self.type_name,
            default,
            description: self.description,
        })
    }
}

impl ToolManifest {
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Resolve every entry against the native table.
    pub fn resolve(
        self,
        natives: &NativeTable,
        source: &Path,
    ) -> Result<Vec<ToolDescriptor>, String> {
        self.tools
            .into_iter()
            .enumerate()
            .map(|(index, tool)| {
                tool.resolve(natives, source)
                    .map_err(|e| format!("tool #{}: {}", index + 1, e))
            })
            .collect()
    }
}

impl ManifestTool {
    fn resolve(self, natives: &NativeTable, source: &Path) -> Result<ToolDescriptor, String> {
        let declared = [
            self.native.is_some(),
            self.command.is_some(),
            self.builtin.is_some(),
        ]
        .iter()
        .filter(|set| **set)
        .count();
        if declared != 1 {
            return Err(
                "exactly one of `native`, `command`, or `builtin` must be set".to_string(),
            );
        }

        let parameters = self
            .parameters
            .map(|params| {
                params
                    .into_iter()
                    .map(ManifestParameter::into_parameter)
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?;

        let mut descriptor = if let Some(binding) = &self.native {
            natives
                .get(binding)
                .ok_or_else(|| format!("no native function registered as '{}'", binding))?
                .descriptor()
        } else if let Some(argv) = self.command {
            if argv.is_empty() || argv[0].trim().is_empty() {
                return Err("`command` must name an executable".to_string());
            }
            let name = required_name(&self.name)?;
            ToolDescriptor {
                name,
                description: String::new(),
                documentation: None,
                parameters: Vec::new(),
                handler: ToolHandler::Command(argv),
                source: None,
            }
        } else {
            let builtin = self.builtin.unwrap_or_default();
            if !KNOWN_BUILTINS.contains(&builtin.as_str()) {
                return Err(format!("unknown built-in tool '{}'", builtin));
            }
            builtin_descriptor(&builtin)
        };

        if let Some(name) = self.name {
            if name.trim().is_empty() {
                return Err("`name` must not be empty".to_string());
            }
            descriptor.name = name;
        }
        if let Some(documentation) = self.documentation {
            descriptor.documentation = Some(documentation);
        }
        descriptor.description = match self.description {
            Some(description) => description,
            None if descriptor.description.is_empty() => descriptor
                .documentation
                .as_deref()
                .map(first_line)
                .unwrap_or_default(),
            None => descriptor.description,
        };
        if let Some(parameters) = parameters {
            descriptor.parameters = parameters;
        }
        descriptor.source = Some(source.to_path_buf());
        Ok(descriptor)
    }
}

/// Descriptor for a framework built-in; its parameters live in the model backend.
pub fn builtin_descriptor(name: &str) -> ToolDescriptor {
    ToolDescriptor {
        name: name.to_string(),
        description: format!("Built-in '{}' tool executed by the model backend.", name),
        documentation: None,
        parameters: Vec::new(),
        handler: ToolHandler::Builtin(name.to_string()),
        source: None,
    }
}

fn required_name(name: &Option<String>) -> Result<String, String> {
    match name {
        Some(name) if !name.trim().is_empty() => Ok(name.clone()),
        _ => Err("`name` is required for command tools".to_string()),
    }
}

/// Tools found in one directory scan plus per-file problems.
#[derive(Debug, Clone, Default)]
pub struct DiscoveryReport {
    pub tools: Vec<ToolDescriptor>,
    pub warnings: Vec<String>,
}

impl DiscoveryReport {
    /// Tools sorted by name.
    pub fn sorted(mut self) -> Vec<ToolDescriptor> {
        self.tools.sort_by(|a, b| a.name.cmp(&b.name));
        self.tools
    }
}

/// Scan `dir` for tool manifests.
///
/// A missing or non-directory path is an error. A manifest that cannot be read,
/// parsed, or resolved is skipped with a warning.
pub fn discover_tools(dir: &Path, natives: &NativeTable) -> Result<DiscoveryReport, BootstrapError> {
    if !dir.exists() {
        return Err(BootstrapError::ConfigError(format!(
            "Tools directory '{}' not found.",
            dir.display()
        )));
    }
    if !dir.is_dir() {
        return Err(BootstrapError::ConfigError(format!(
            "Tools path '{}' is not a directory.",
            dir.display()
        )));
    }

    let mut report = DiscoveryReport::default();
    for path in manifest_paths(dir)? {
        let result = fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|content| ToolManifest::parse(&content).map_err(|e| e.to_string()))
            .and_then(|manifest| manifest.resolve(natives, &path));
        match result {
            Ok(tools) => {
                debug!(manifest = %path.display(), count = tools.len(), "Loaded tool manifest");
                report.tools.extend(tools);
            }
            Err(e) => {
                warn!(manifest = %path.display(), error = %e, "Skipping tool manifest");
                report
                    .warnings
                    .push(format!("Could not load tools from {}: {}", path.display(), e));
            }
        }
    }
    Ok(report)
}

fn manifest_paths(dir: &Path) -> Result<Vec<PathBuf>, BootstrapError> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let hidden = entry.file_name().to_string_lossy().starts_with('.');
        let is_manifest = path.extension().and_then(|e| e.to_str()) == Some(MANIFEST_EXTENSION);
        if !hidden && is_manifest && path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}
