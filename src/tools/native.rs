//! Native tool functions registered at startup.
//!
//! A manifest entry with `native = "<binding>"` resolves against this table. The
//! registration supplies documentation and parameters, which the manifest may
//! override.

use super::descriptor::{first_line, ToolDescriptor, ToolHandler, ToolParameter};
use super::time;
use serde_json::Value;
use std::collections::BTreeMap;

/// Signature of an in-process tool function.
pub type NativeFn = fn(&Value) -> anyhow::Result<String>;

/// One registered native function.
#[derive(Debug, Clone)]
pub struct NativeRegistration {
    pub binding: String,
    pub function: NativeFn,
    pub documentation: String,
    pub parameters: Vec<ToolParameter>,
}

impl NativeRegistration {
    /// Descriptor named after the binding, described by the first doc line.
    pub fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: self.binding.clone(),
            description: first_line(&self.documentation),
            documentation: Some(self.documentation.clone()),
            parameters: self.parameters.clone(),
            handler: ToolHandler::Native(self.function),
            source: None,
        }
    }
}

/// Binding name to native function.
#[derive(Debug, Clone, Default)]
pub struct NativeTable {
    entries: BTreeMap<String, NativeRegistration>,
}

impl NativeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table with every native tool shipped in this crate.
    pub fn standard() -> Self {
        let mut table = Self::new();
        table.register(time::registration());
        table
    }

    pub fn register(&mut self, registration: NativeRegistration) {
        self.entries
            .insert(registration.binding.clone(), registration);
    }

    pub fn get(&self, binding: &str) -> Option<&NativeRegistration> {
        self.entries.get(binding)
    }

    pub fn bindings(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_table_contains_time_tool() {
        let table = NativeTable::standard();
        let registration = table.get(time::BINDING).unwrap();
        let descriptor = registration.descriptor();
        assert_eq!(descriptor.name, "get_current_time");
        assert_eq!(
            descriptor.description,
            "Gets the current time in a specified timezone."
        );
        assert_eq!(descriptor.parameters.len(), 1);
        assert_eq!(table.bindings().collect::<Vec<_>>(), vec!["get_current_time"]);
    }
}
