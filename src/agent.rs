//! Agent Definition
//!
//! The conversational agent served by the web entry point: a name, the model it
//! runs on, its instruction text, and the tools it may call. Built once from
//! settings; the chat runtime itself belongs to the agent framework.

use crate::config::Settings;
use crate::tools::{NativeTable, ToolDescriptor, ToolRegistry};
use serde_json::{json, Value};
use tracing::info;

pub const AGENT_NAME: &str = "gen_bootstrap_core_assistant";

/// Agent module path handed to `adk web`.
pub const AGENT_PATH: &str = "adk.agent:root_agent";

pub const INSTRUCTION: &str = "You are the gen-bootstrap assistant, a helpful AI designed to \
demonstrate the capabilities of the Google Agent Development Kit (ADK) within this scaffold \
project. Your primary goal is to assist the user with their queries by providing information \
and leveraging the tools available to you. Available tools are:\n\
- get_current_time: Use this to find the current time for any timezone.\n\
- google_search: Use this for general knowledge questions or finding current information online.\n\
Be polite, clear, and make sure to tell the user which tool you are using if you decide to use one.";

#[derive(Debug, Clone)]
pub struct AgentDefinition {
    pub name: String,
    pub model: String,
    pub instruction: String,
    pub tools: Vec<ToolDescriptor>,
}

impl AgentDefinition {
    /// The scaffold's agent: the time tool plus built-in search.
    pub fn build(settings: &Settings, natives: &NativeTable) -> Self {
        let registry = ToolRegistry::standard(natives);
        let agent = Self {
            name: AGENT_NAME.to_string(),
            model: settings.default_gemini_model.clone(),
            instruction: INSTRUCTION.to_string(),
            tools: registry.tools().to_vec(),
        };
        info!(
            agent = %agent.name,
            model = %agent.model,
            tools = ?agent.tool_names(),
            "Agent initialized"
        );
        agent
    }

    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name.as_str()).collect()
    }

    pub fn tool(&self, name: &str) -> Option<&ToolDescriptor> {
        self.tools.iter().find(|t| t.name == name)
    }

    /// JSON card describing the agent.
    pub fn card(&self) -> Value {
        json!({
            "name": self.name,
            "model": self.model,
            "instruction": self.instruction,
            "tools": self.tools.iter().map(ToolDescriptor::summary).collect::<Vec<_>>(),
        })
    }
}
