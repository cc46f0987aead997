//! `deploy`: build from source and deploy to Cloud Run through `gcloud`.

use super::test_plan::{run_tests, TestPlan};
use super::CommandEnv;
use crate::error::BootstrapError;
use crate::process::{require, CommandSpec};
use std::fs;

pub const PROCFILE: &str = "Procfile";

pub const DEFAULT_PROCFILE: &str = "web: gen-bootstrap run --host 0.0.0.0 --port $PORT";

#[derive(Debug, Clone, Default)]
pub struct DeployOptions {
    pub service_name: Option<String>,
    pub region: Option<String>,
    pub project_id: Option<String>,
    pub run_tests: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployOutcome {
    Deployed { service: String, output: String },
    /// The user declined to continue without a Procfile
    Cancelled,
}

/// `gcloud run deploy <service> --source . --region <r> --project <p> ...`
pub fn deploy_command(service: &str, region: &str, project_id: &str) -> CommandSpec {
    CommandSpec::new("gcloud")
        .args(["run", "deploy", service, "--source", ".", "--region", region])
        .args(["--project", project_id])
        // Public endpoint; tighten for production services.
        .arg("--allow-unauthenticated")
        .args(["--platform", "managed"])
}

fn ask(
    env: &CommandEnv<'_>,
    given: Option<String>,
    question: &str,
    default: Option<&str>,
) -> Result<String, BootstrapError> {
    let answer = match given.filter(|v| !v.trim().is_empty()) {
        Some(value) => value,
        None => env.prompter.input(question, default)?,
    };
    let answer = answer.trim().to_string();
    if answer.is_empty() {
        return Err(BootstrapError::ConfigError(format!("{} is required.", question)));
    }
    Ok(answer)
}

pub fn deploy(env: &CommandEnv<'_>, options: DeployOptions) -> Result<DeployOutcome, BootstrapError> {
    if options.run_tests {
        env.console.heading("Running pre-deployment tests with coverage...");
        match run_tests(env, &TestPlan::pre_deploy()) {
            Ok(_) => env.console.success("Pre-deployment tests passed successfully!"),
            Err(BootstrapError::TestsFailed { exit_code }) => {
                env.console.error(format!(
                    "Pre-deployment tests failed (exit code: {}). Deployment aborted.",
                    exit_code
                ));
                return Err(BootstrapError::TestsFailed { exit_code: 1 });
            }
            Err(e) => return Err(e),
        }
        env.console.plain("-".repeat(30));
    }

    env.console.plain("Attempting to deploy application to Cloud Run...");
    require(env.runner, "gcloud")?;
    let project_id = env.settings.resolve_project_id(options.project_id.as_deref())?;
    let service = ask(env, options.service_name, "Cloud Run service name", None)?;
    let region = ask(
        env,
        options.region,
        "GCP region",
        Some(env.settings.gcp_location.as_str()),
    )?;

    let procfile = env.workspace.join(PROCFILE);
    if !procfile.exists() {
        env.console.warning(format!("WARNING: '{}' not found.", PROCFILE));
        let create = env.prompter.confirm(
            &format!("Create default '{}' with: '{}'?", PROCFILE, DEFAULT_PROCFILE),
            false,
        )?;
        if create {
            fs::write(&procfile, DEFAULT_PROCFILE)?;
            env.console.plain(format!("SUCCESS: '{}' created.", PROCFILE));
        } else if !env.prompter.confirm(
            "Continue deployment without Procfile (highly not recommended)?",
            false,
        )? {
            return Ok(DeployOutcome::Cancelled);
        }
    }

    let spec = deploy_command(&service, &region, &project_id).current_dir(env.workspace);
    env.console.executing(&spec);
    let output = env.runner.run(&spec)?;
    if !output.success() {
        env.console.error(format!(
            "ERROR: Deployment failed. Return code: {}",
            output.exit_code
        ));
        env.console.process_output(&output);
        return Err(BootstrapError::ExternalToolFailure {
            program: spec.program,
            exit_code: output.exit_code,
            stdout: output.stdout,
            stderr: output.stderr,
        });
    }
    env.console.success("SUCCESS: Deployment successful!");
    Ok(DeployOutcome::Deployed {
        service,
        output: output.stdout,
    })
}
