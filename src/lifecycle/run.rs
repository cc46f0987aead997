//! `run`: serve the web app in-process, or hand off to the framework's dev UI.

use super::CommandEnv;
use crate::config::Settings;
use crate::error::BootstrapError;
use crate::process::{require, CommandSpec, ProcessRunner};
use crate::web::{self, AppState};
use std::path::Path;
use std::sync::Arc;

/// `poetry run adk web <agent_path>`
pub fn adk_web_command(agent_path: &str) -> CommandSpec {
    CommandSpec::new("poetry").args(["run", "adk", "web", agent_path])
}

/// Launch the framework dev UI attached to the terminal.
pub fn run_adk_ui(env: &CommandEnv<'_>, agent_path: &str) -> Result<(), BootstrapError> {
    env.console
        .plain(format!("Attempting to run Google ADK Web UI for agent: {}...", agent_path));
    require(env.runner, "poetry")?;
    let spec = adk_web_command(agent_path).current_dir(env.workspace);
    env.console.executing(&spec);
    let exit_code = env.runner.run_attached(&spec)?;
    if exit_code != 0 {
        return Err(BootstrapError::ExternalToolFailure {
            program: spec.program,
            exit_code,
            stdout: String::new(),
            stderr: String::new(),
        });
    }
    Ok(())
}

/// Serve the web entry point until interrupted.
pub fn serve_web(
    settings: &Settings,
    workspace: &Path,
    runner: Arc<dyn ProcessRunner>,
    host: &str,
    port: u16,
) -> Result<(), BootstrapError> {
    let addr = web::bind_address(host, port)?;
    let state = AppState::build(settings, workspace, runner);
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(web::serve(state, addr))
}
