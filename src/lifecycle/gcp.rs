//! `setup-gcp`: enable the project's APIs and grant the default compute service
//! account the roles the agent needs.
//!
//! An API or IAM step that fails is reported and the remaining steps still run.
//! A failed project-number lookup stops the setup, since no IAM binding can be
//! formed without it.

use super::CommandEnv;
use crate::error::BootstrapError;
use crate::process::{require, CommandSpec, ProcessOutput};
use tracing::warn;

pub const REQUIRED_APIS: [&str; 8] = [
    "run.googleapis.com",
    "iam.googleapis.com",
    "secretmanager.googleapis.com",
    "aiplatform.googleapis.com",
    "logging.googleapis.com",
    "monitoring.googleapis.com",
    "cloudbuild.googleapis.com",
    "artifactregistry.googleapis.com",
];

pub const IAM_ROLES: [&str; 2] = ["roles/aiplatform.user", "roles/secretmanager.secretAccessor"];

pub fn enable_apis_command(project_id: &str) -> CommandSpec {
    CommandSpec::new("gcloud")
        .args(["services", "enable"])
        .args(REQUIRED_APIS)
        .arg(format!("--project={}", project_id))
}

pub fn project_number_command(project_id: &str) -> CommandSpec {
    CommandSpec::new("gcloud").args([
        "projects",
        "describe",
        project_id,
        "--format=value(projectNumber)",
    ])
}

pub fn iam_binding_command(project_id: &str, service_account: &str, role: &str) -> CommandSpec {
    CommandSpec::new("gcloud")
        .args(["projects", "add-iam-policy-binding", project_id])
        .arg(format!("--member=serviceAccount:{}", service_account))
        .arg(format!("--role={}", role))
        .arg("--condition=None")
}

/// Default Compute Engine service account of a project.
pub fn compute_service_account(project_number: &str) -> String {
    format!("{}-compute@developer.gserviceaccount.com", project_number)
}

#[derive(Debug, Clone, Default)]
pub struct SetupGcpOptions {
    pub project_id: Option<String>,
    pub interactive: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Done(String),
    AlreadyExists(String),
    Skipped(String),
    Failed { step: String, exit_code: i32 },
}

impl StepOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, StepOutcome::Failed { .. })
    }
}

#[derive(Debug, Clone)]
pub struct SetupGcpReport {
    pub project_id: String,
    pub service_account: String,
    pub steps: Vec<StepOutcome>,
}

impl SetupGcpReport {
    pub fn failures(&self) -> usize {
        self.steps.iter().filter(|s| s.is_failure()).count()
    }
}

fn confirmed(env: &CommandEnv<'_>, interactive: bool, question: &str) -> Result<bool, BootstrapError> {
    if !interactive {
        return Ok(true);
    }
    env.prompter.confirm(question, true)
}

/// Run one best-effort step; "already exists" counts as success.
fn run_step(env: &CommandEnv<'_>, step: &str, spec: &CommandSpec) -> Result<StepOutcome, BootstrapError> {
    let output = env.runner.run(spec)?;
    Ok(classify(env, step, &output))
}

fn classify(env: &CommandEnv<'_>, step: &str, output: &ProcessOutput) -> StepOutcome {
    if output.success() {
        env.console.success(format!("Successfully completed: {}", step));
        if !output.stdout.trim().is_empty() {
            env.console.plain(format!("gcloud output:\n{}", output.stdout.trim_end()));
        }
        StepOutcome::Done(step.to_string())
    } else if output.reports_already_exists() {
        env.console
            .warning(format!("Note: {} likely already exists.", step));
        env.console.process_output(&ProcessOutput {
            exit_code: 0,
            ..output.clone()
        });
        StepOutcome::AlreadyExists(step.to_string())
    } else {
        env.console.error(format!(
            "Error: {}. 'gcloud' exited with code {}.",
            step, output.exit_code
        ));
        env.console.process_output(output);
        env.console
            .warning("Continuing with other setup steps despite this issue.");
        warn!(step, exit_code = output.exit_code, "GCP setup step failed");
        StepOutcome::Failed {
            step: step.to_string(),
            exit_code: output.exit_code,
        }
    }
}

pub fn setup_gcp(env: &CommandEnv<'_>, options: SetupGcpOptions) -> Result<SetupGcpReport, BootstrapError> {
    env.console.plain("Starting GCP setup process...");
    require(env.runner, "gcloud")?;
    let project_id = env.settings.resolve_project_id(options.project_id.as_deref())?;
    env.console.plain(format!("Target GCP Project ID: {}", project_id));
    let mut steps = Vec::new();

    env.console.plain(format!(
        "\nAttempting to enable necessary APIs for project {}...",
        project_id
    ));
    let enable = enable_apis_command(&project_id);
    env.console.executing(&enable);
    let step = "enable APIs".to_string();
    if confirmed(
        env,
        options.interactive,
        &format!("Proceed with enabling these APIs for project {}?", project_id),
    )? {
        steps.push(run_step(env, &step, &enable)?);
    } else {
        env.console.plain("API enabling skipped by user.");
        steps.push(StepOutcome::Skipped(step));
    }

    env.console.plain(format!(
        "\nRetrieving project number for project {}...",
        project_id
    ));
    let describe = project_number_command(&project_id);
    env.console.executing(&describe);
    let output = env.runner.run(&describe)?;
    if !output.success() {
        env.console.error(format!(
            "Error getting project number. 'gcloud' exited with code {}.",
            output.exit_code
        ));
        env.console.process_output(&output);
        env.console
            .error("Cannot proceed with IAM setup without project number.");
        return Err(BootstrapError::ExternalToolFailure {
            program: describe.program,
            exit_code: output.exit_code,
            stdout: output.stdout,
            stderr: output.stderr,
        });
    }
    let project_number = output.stdout.trim().to_string();
    let service_account = compute_service_account(&project_number);
    env.console.plain(format!(
        "Project number: {}, default Compute Engine SA: {}",
        project_number, service_account
    ));

    for role in IAM_ROLES {
        let step = format!("grant '{}' to {}", role, service_account);
        env.console.plain(format!(
            "\nAttempting to grant '{}' to default Compute SA ({}) for project {}...",
            role, service_account, project_id
        ));
        let grant = iam_binding_command(&project_id, &service_account, role);
        env.console.executing(&grant);
        if confirmed(
            env,
            options.interactive,
            &format!("Proceed with granting '{}' to {}?", role, service_account),
        )? {
            steps.push(run_step(env, &step, &grant)?);
        } else {
            env.console
                .plain(format!("Granting '{}' skipped by user.", role));
            steps.push(StepOutcome::Skipped(step));
        }
    }

    Ok(SetupGcpReport {
        project_id,
        service_account,
        steps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::console::Console;
    use crate::testing::{ScriptedPrompter, ScriptedRunner};
    use std::path::Path;

    fn settings() -> Settings {
        Settings {
            gcp_project_id: "demo".to_string(),
            ..Settings::default()
        }
    }

    #[test]
    fn test_command_lines() {
        assert_eq!(
            enable_apis_command("demo").to_string(),
            format!("gcloud services enable {} --project=demo", REQUIRED_APIS.join(" "))
        );
        assert_eq!(
            iam_binding_command("demo", "123-compute@developer.gserviceaccount.com", "roles/aiplatform.user")
                .to_string(),
            "gcloud projects add-iam-policy-binding demo \
             --member=serviceAccount:123-compute@developer.gserviceaccount.com \
             --role=roles/aiplatform.user --condition=None"
        );
    }

    #[test]
    fn test_full_setup_sequence() {
        let settings = settings();
        let runner = ScriptedRunner::new()
            .with_stdout("")
            .with_stdout("123456\n")
            .with_failure(1, "ERROR: binding already exists")
            .with_failure(2, "PERMISSION_DENIED");
        let prompter = ScriptedPrompter::new();
        let console = Console::captured();
        let env = CommandEnv {
            settings: &settings,
            workspace: Path::new("."),
            runner: &runner,
            prompter: &prompter,
            console: &console,
        };
        let report = setup_gcp(&env, SetupGcpOptions::default()).unwrap();
        assert_eq!(report.service_account, "123456-compute@developer.gserviceaccount.com");
        assert_eq!(runner.calls().len(), 4);
        assert_eq!(
            runner.command_lines()[1],
            "gcloud projects describe demo --format=value(projectNumber)"
        );
        assert!(matches!(report.steps[1], StepOutcome::AlreadyExists(_)));
        assert!(matches!(report.steps[2], StepOutcome::Failed { exit_code: 2, .. }));
        assert_eq!(report.failures(), 1);
        assert!(prompter.questions().is_empty());
    }

    #[test]
    fn test_project_number_failure_is_fatal() {
        let settings = settings();
        let runner = ScriptedRunner::new()
            .with_stdout("")
            .with_failure(1, "not found");
        let prompter = ScriptedPrompter::new();
        let console = Console::captured();
        let env = CommandEnv {
            settings: &settings,
            workspace: Path::new("."),
            runner: &runner,
            prompter: &prompter,
            console: &console,
        };
        let err = setup_gcp(&env, SetupGcpOptions::default()).unwrap_err();
        assert!(matches!(err, BootstrapError::ExternalToolFailure { .. }));
        assert_eq!(runner.calls().len(), 2);
    }

    #[test]
    fn test_interactive_declines_skip_steps() {
        let settings = settings();
        let runner = ScriptedRunner::new().with_stdout("42\n");
        let prompter = ScriptedPrompter::new().with_confirms(&[false, false, true]);
        let console = Console::captured();
        let env = CommandEnv {
            settings: &settings,
            workspace: Path::new("."),
            runner: &runner,
            prompter: &prompter,
            console: &console,
        };
        let options = SetupGcpOptions {
            project_id: Some("other".to_string()),
            interactive: true,
        };
        let report = setup_gcp(&env, options).unwrap();
        assert_eq!(report.project_id, "other");
        assert!(matches!(report.steps[0], StepOutcome::Skipped(_)));
        assert!(matches!(report.steps[1], StepOutcome::Skipped(_)));
        assert!(matches!(report.steps[2], StepOutcome::Done(_)));
        let lines = runner.command_lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].contains("--role=roles/secretmanager.secretAccessor"));
        assert_eq!(prompter.questions().len(), 3);
    }

    #[test]
    fn test_missing_gcloud_stops_before_any_call() {
        let settings = settings();
        let runner = ScriptedRunner::new().without_program("gcloud");
        let prompter = ScriptedPrompter::new();
        let console = Console::captured();
        let env = CommandEnv {
            settings: &settings,
            workspace: Path::new("."),
            runner: &runner,
            prompter: &prompter,
            console: &console,
        };
        let err = setup_gcp(&env, SetupGcpOptions::default()).unwrap_err();
        assert!(err.to_string().contains("'gcloud'"));
        assert!(runner.calls().is_empty());
    }
}
