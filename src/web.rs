//! Web Entry Point
//!
//! axum server exposing the agent card, the tool list, local tool invocation,
//! and a custom health route.

pub mod handlers;

use crate::agent::AgentDefinition;
use crate::config::Settings;
use crate::error::BootstrapError;
use crate::process::ProcessRunner;
use crate::tools::{discover_tools, NativeTable, ToolRegistry};
use axum::{
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Settings handed to the agent runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuntimeConfig {
    pub session_store_url: String,
    pub model: String,
}

impl RuntimeConfig {
    /// Sessions live in `adk_sessions.db` under the absolute form of `cwd`.
    pub fn new(settings: &Settings, cwd: &Path) -> Self {
        Self {
            session_store_url: format!("sqlite:///{}/adk_sessions.db", absolute_dir(cwd).display()),
            model: settings.default_gemini_model.clone(),
        }
    }
}

fn absolute_dir(dir: &Path) -> PathBuf {
    dir.canonicalize().unwrap_or_else(|_| match std::env::current_dir() {
        Ok(current) => current.join(dir),
        Err(_) => dir.to_path_buf(),
    })
}

/// Shared state for all handlers.
#[derive(Clone)]
pub struct AppState {
    pub agent: Arc<AgentDefinition>,
    pub tools: Arc<ToolRegistry>,
    pub runtime: RuntimeConfig,
    pub runner: Arc<dyn ProcessRunner>,
}

impl AppState {
    /// Agent tools first, then tools discovered in the workspace tools directory.
    pub fn build(
        settings: &Settings,
        workspace_root: &Path,
        runner: Arc<dyn ProcessRunner>,
    ) -> Self {
        let natives = NativeTable::standard();
        let agent = AgentDefinition::build(settings, &natives);
        let mut tools = ToolRegistry::new();
        for tool in &agent.tools {
            tools.register(tool.clone());
        }

        let tools_dir = workspace_root.join(&settings.tools_dir);
        if tools_dir.is_dir() {
            match discover_tools(&tools_dir, &natives) {
                Ok(report) => {
                    for tool in report.tools {
                        if tools.get(&tool.name).is_none() {
                            tools.register(tool);
                        }
                    }
                }
                Err(e) => warn!(error = %e, "Tool discovery failed"),
            }
        }

        Self {
            agent: Arc::new(agent),
            tools: Arc::new(tools),
            runtime: RuntimeConfig::new(settings, workspace_root),
            runner,
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/custom_health", get(handlers::custom_health))
        .route("/agent", get(handlers::agent_card))
        .route("/tools", get(handlers::list_tools))
        .route("/tools/:name/invoke", post(handlers::invoke_tool))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn serve(state: AppState, addr: SocketAddr) -> Result<(), BootstrapError> {
    let app = create_router(state);
    let listener = TcpListener::bind(addr).await?;
    info!(address = %addr, "Starting web server");
    axum::serve(listener, app).await?;
    Ok(())
}

/// Parse `host:port` into a socket address.
pub fn bind_address(host: &str, port: u16) -> Result<SocketAddr, BootstrapError> {
    let host = if host == "localhost" { "127.0.0.1" } else { host };
    format!("{}:{}", host, port)
        .parse()
        .map_err(|_| BootstrapError::InvalidInput(format!("Invalid bind address: {}:{}", host, port)))
}
