//! Tool descriptor types.

use super::native::NativeFn;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::fmt;
use std::path::PathBuf;

/// One declared tool parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolParameter {
    pub name: String,
    /// Best-effort type name (`str`, `int`, `float`, `bool`, `any`, ...)
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ToolParameter {
    pub fn required(name: &str, type_name: &str) -> Self {
        Self {
            name: name.to_string(),
            type_name: type_name.to_string(),
            default: None,
            description: None,
        }
    }

    pub fn optional(name: &str, type_name: &str, default: Value) -> Self {
        Self {
            default: Some(default),
            ..Self::required(name, type_name)
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// JSON schema type for this parameter's type name.
    pub fn json_type(&self) -> &'static str {
        match self.type_name.as_str() {
            "str" | "string" => "string",
            "int" | "integer" => "integer",
            "float" | "number" => "number",
            "bool" | "boolean" => "boolean",
            "list" | "array" => "array",
            "dict" | "object" => "object",
            _ => "string",
        }
    }
}

impl fmt::Display for ToolParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.type_name)?;
        if let Some(default) = &self.default {
            match default {
                Value::String(s) => write!(f, " (default: {})", s)?,
                other => write!(f, " (default: {})", other)?,
            }
        }
        Ok(())
    }
}

/// What runs when the tool is invoked.
#[derive(Clone)]
pub enum ToolHandler {
    /// In-process function
    Native(NativeFn),
    /// External command; arguments are passed as JSON on stdin
    Command(Vec<String>),
    /// Tool executed by the model backend (e.g. `google_search`)
    Builtin(String),
}

impl ToolHandler {
    pub fn kind(&self) -> &'static str {
        match self {
            ToolHandler::Native(_) => "native",
            ToolHandler::Command(_) => "command",
            ToolHandler::Builtin(_) => "builtin",
        }
    }

    /// Whether parameters and documentation can be inspected locally.
    pub fn is_introspectable(&self) -> bool {
        !matches!(self, ToolHandler::Builtin(_))
    }
}

impl fmt::Debug for ToolHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolHandler::Native(_) => write!(f, "Native(<fn>)"),
            ToolHandler::Command(argv) => f.debug_tuple("Command").field(argv).finish(),
            ToolHandler::Builtin(name) => f.debug_tuple("Builtin").field(name).finish(),
        }
    }
}

/// A tool as seen by the agent, the CLI, and the web entry point.
#[derive(Debug, Clone)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    /// Full documentation text; the description is its first line by default
    pub documentation: Option<String>,
    /// Parameters in declaration order
    pub parameters: Vec<ToolParameter>,
    pub handler: ToolHandler,
    /// Manifest the tool was discovered in, if any
    pub source: Option<PathBuf>,
}

impl ToolDescriptor {
    /// JSON schema for the tool's arguments.
    pub fn parameters_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();
        for param in &self.parameters {
            let mut prop = Map::new();
            prop.insert("type".to_string(), json!(param.json_type()));
            if let Some(description) = &param.description {
                prop.insert("description".to_string(), json!(description));
            }
            if let Some(default) = &param.default {
                prop.insert("default".to_string(), default.clone());
            } else {
                required.push(param.name.clone());
            }
            properties.insert(param.name.clone(), Value::Object(prop));
        }
        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    /// Serializable summary used by the web entry point.
    pub fn summary(&self) -> Value {
        json!({
            "name": self.name,
            "description": self.description,
            "kind": self.handler.kind(),
            "parameters": self.parameters_schema(),
        })
    }
}

/// First non-empty line of a documentation block.
pub fn first_line(documentation: &str) -> String {
    documentation
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_display_includes_default() {
        let param = ToolParameter::optional("timezone", "str", json!("UTC"));
        assert_eq!(param.to_string(), "timezone: str (default: UTC)");
        let param = ToolParameter::optional("limit", "int", json!(5));
        assert_eq!(param.to_string(), "limit: int (default: 5)");
        assert_eq!(ToolParameter::required("text", "str").to_string(), "text: str");
    }

    #[test]
    fn test_schema_marks_parameters_without_default_required() {
        let tool = ToolDescriptor {
            name: "word_count".to_string(),
            description: "Count words".to_string(),
            documentation: None,
            parameters: vec![
                ToolParameter::required("text", "str"),
                ToolParameter::optional("lowercase", "bool", json!(false)),
            ],
            handler: ToolHandler::Command(vec!["wc".to_string(), "-w".to_string()]),
            source: None,
        };
        let schema = tool.parameters_schema();
        assert_eq!(schema["required"], json!(["text"]));
        assert_eq!(schema["properties"]["lowercase"]["type"], "boolean");
        assert_eq!(tool.summary()["kind"], "command");
    }

    #[test]
    fn test_first_line_skips_blank_lines() {
        assert_eq!(first_line("\n  Gets the time.\nMore."), "Gets the time.");
        assert_eq!(first_line(""), "");
    }
}
