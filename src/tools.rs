//! Agent Tools
//!
//! Tools are named, described wrappers around something a model can invoke. They
//! come from two places: native functions registered at startup ([`NativeTable`])
//! and TOML manifests in the tools directory ([`discover_tools`]), which bind a
//! declared tool to a native function, an external command, or a framework
//! built-in.

pub mod commands;
pub mod descriptor;
pub mod discovery;
pub mod native;
pub mod registry;
pub mod time;

pub use commands::{
    invoke_tool, parse_args, ToolCommandService, ToolDescribeResult, ToolInvokeResult,
    ToolListResult,
};
pub use descriptor::{ToolDescriptor, ToolHandler, ToolParameter};
pub use discovery::{discover_tools, DiscoveryReport, ToolManifest};
pub use native::{NativeFn, NativeRegistration, NativeTable};
pub use registry::ToolRegistry;
