//! Tool registry: the tools an agent or the web entry point can see.

use super::descriptor::ToolDescriptor;
use super::discovery::{builtin_descriptor, discover_tools, DiscoveryReport, KNOWN_BUILTINS};
use super::native::NativeTable;
use crate::error::BootstrapError;
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<ToolDescriptor>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every native tool plus the default built-ins.
    pub fn standard(natives: &NativeTable) -> Self {
        let mut registry = Self::new();
        for binding in natives.bindings() {
            if let Some(registration) = natives.get(binding) {
                registry.register(registration.descriptor());
            }
        }
        for builtin in KNOWN_BUILTINS {
            registry.register(builtin_descriptor(builtin));
        }
        registry
    }

    /// Registry populated from a manifest directory scan.
    pub fn discover(dir: &Path, natives: &NativeTable) -> Result<(Self, Vec<String>), BootstrapError> {
        let DiscoveryReport { tools, warnings } = discover_tools(dir, natives)?;
        Ok((Self { tools }, warnings))
    }

    pub fn register(&mut self, tool: ToolDescriptor) {
        self.tools.push(tool);
    }

    /// First tool with exactly this name.
    pub fn get(&self, name: &str) -> Option<&ToolDescriptor> {
        self.tools.iter().find(|t| t.name == name)
    }

    pub fn get_or_error(&self, name: &str) -> Result<&ToolDescriptor, BootstrapError> {
        self.get(name)
            .ok_or_else(|| BootstrapError::NotFound(format!("Tool '{}' not found.", name)))
    }

    /// Tools in registration order.
    pub fn tools(&self) -> &[ToolDescriptor] {
        &self.tools
    }

    pub fn list_sorted(&self) -> Vec<&ToolDescriptor> {
        let mut tools: Vec<_> = self.tools.iter().collect();
        tools.sort_by(|a, b| a.name.cmp(&b.name));
        tools
    }

    pub fn names(&self) -> Vec<String> {
        self.tools.iter().map(|t| t.name.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
