//! Tool command service: one entry point per `tools` CLI variant.
//!
//! The CLI parses, calls one method, and formats the returned result.

use super::descriptor::{ToolDescriptor, ToolHandler};
use super::discovery::discover_tools;
use super::native::NativeTable;
use crate::error::BootstrapError;
use crate::process::{CommandSpec, ProcessRunner};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub struct ToolCommandService;

/// Result of tools list.
#[derive(Debug, Clone)]
pub struct ToolListResult {
    pub dir: PathBuf,
    /// Sorted by name
    pub tools: Vec<ToolDescriptor>,
    pub warnings: Vec<String>,
}

/// Result of tools describe.
#[derive(Debug, Clone)]
pub struct ToolDescribeResult {
    pub tool: ToolDescriptor,
    pub warnings: Vec<String>,
}

impl ToolDescribeResult {
    /// Full documentation when it says more than the short description.
    pub fn extended_documentation(&self) -> Option<&str> {
        self.tool
            .documentation
            .as_deref()
            .map(str::trim)
            .filter(|doc| !doc.is_empty() && *doc != self.tool.description.trim())
    }
}

/// Result of tools invoke.
#[derive(Debug, Clone)]
pub struct ToolInvokeResult {
    pub name: String,
    pub output: String,
}

impl ToolCommandService {
    pub fn list(dir: &Path, natives: &NativeTable) -> Result<ToolListResult, BootstrapError> {
        let report = discover_tools(dir, natives)?;
        let warnings = report.warnings.clone();
        Ok(ToolListResult {
            dir: dir.to_path_buf(),
            tools: report.sorted(),
            warnings,
        })
    }

    pub fn describe(
        dir: &Path,
        natives: &NativeTable,
        name: &str,
    ) -> Result<ToolDescribeResult, BootstrapError> {
        let report = discover_tools(dir, natives)?;
        let tool = report
            .tools
            .iter()
            .find(|t| t.name == name)
            .cloned()
            .ok_or_else(|| {
                BootstrapError::NotFound(format!(
                    "Tool '{}' not found in '{}'.",
                    name,
                    dir.display()
                ))
            })?;
        Ok(ToolDescribeResult {
            tool,
            warnings: report.warnings,
        })
    }

    pub fn invoke(
        dir: &Path,
        natives: &NativeTable,
        name: &str,
        args: &Value,
        runner: &dyn ProcessRunner,
    ) -> Result<ToolInvokeResult, BootstrapError> {
        let described = Self::describe(dir, natives, name)?;
        let output = invoke_tool(&described.tool, args, runner)?;
        Ok(ToolInvokeResult {
            name: described.tool.name,
            output,
        })
    }
}

/// Parse `--args` text; absent means an empty object.
pub fn parse_args(raw: Option<&str>) -> Result<Value, BootstrapError> {
    match raw {
        None => Ok(Value::Object(Default::default())),
        Some(text) => Ok(serde_json::from_str(text)?),
    }
}

/// Run one tool with JSON object arguments.
///
/// Missing parameters with defaults are filled in before the handler runs.
pub fn invoke_tool(
    tool: &ToolDescriptor,
    args: &Value,
    runner: &dyn ProcessRunner,
) -> Result<String, BootstrapError> {
    let mut object = args
        .as_object()
        .cloned()
        .ok_or_else(|| BootstrapError::InvalidInput("tool arguments must be a JSON object".to_string()))?;
    for param in &tool.parameters {
        if object.contains_key(&param.name) {
            continue;
        }
        match &param.default {
            Some(default) => {
                object.insert(param.name.clone(), default.clone());
            }
            None => {
                return Err(BootstrapError::InvalidInput(format!(
                    "missing required argument '{}' for tool '{}'",
                    param.name, tool.name
                )))
            }
        }
    }
    let args = Value::Object(object);
    info!(tool = %tool.name, kind = tool.handler.kind(), "Invoking tool");

    match &tool.handler {
        ToolHandler::Native(function) => function(&args).map_err(|e| BootstrapError::ToolFailed {
            name: tool.name.clone(),
            message: e.to_string(),
        }),
        ToolHandler::Command(argv) => {
            let spec = CommandSpec::new(argv[0].clone())
                .args(argv[1..].iter().cloned())
                .stdin(args.to_string());
            let output = runner.run(&spec)?.into_result(&spec.program)?;
            debug!(tool = %tool.name, bytes = output.stdout.len(), "Tool command finished");
            Ok(output.stdout.trim_end().to_string())
        }
        ToolHandler::Builtin(builtin) => Err(BootstrapError::InvalidInput(format!(
            "'{}' is a built-in tool executed by the model backend and cannot be invoked locally",
            builtin
        ))),
    }
}
