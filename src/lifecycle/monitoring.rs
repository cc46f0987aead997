//! `monitoring setup`: verify the Cloud Monitoring API is enabled.

use super::CommandEnv;
use crate::error::BootstrapError;
use crate::process::{require, CommandSpec};

pub const MONITORING_API: &str = "monitoring.googleapis.com";

pub fn api_check_command(project_id: &str, api: &str) -> CommandSpec {
    CommandSpec::new("gcloud")
        .args(["services", "list"])
        .arg(format!("--project={}", project_id))
        .arg(format!("--filter=config.name={}", api))
        .arg("--format=value(config.name)")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitoringReport {
    pub project_id: String,
    pub api: String,
    pub enabled: bool,
}

pub fn monitoring_setup(
    env: &CommandEnv<'_>,
    project_id: Option<&str>,
) -> Result<MonitoringReport, BootstrapError> {
    env.console.plain("Verifying Cloud Monitoring setup...");
    require(env.runner, "gcloud")?;
    let project_id = env.settings.resolve_project_id(project_id)?;
    env.console.plain(format!("Using project ID: {}", project_id));
    env.console.plain(format!(
        "Checking if API '{}' is enabled for project '{}'...",
        MONITORING_API, project_id
    ));

    let output = env.runner.run(&api_check_command(&project_id, MONITORING_API))?;
    let enabled = if output.success() {
        output.stdout.contains(MONITORING_API)
    } else {
        env.console.error(format!(
            "Error checking API status for {}: {}",
            MONITORING_API,
            output.stderr.trim()
        ));
        false
    };

    Ok(MonitoringReport {
        project_id,
        api: MONITORING_API.to_string(),
        enabled,
    })
}
