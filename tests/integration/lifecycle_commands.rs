use super::support::{settings, Harness};
use gen_bootstrap::config::Settings;
use gen_bootstrap::error::BootstrapError;
use gen_bootstrap::process::ProcessOutput;
use gen_bootstrap::testing::{MemorySecretStore, ScriptedPrompter, ScriptedRunner};
use std::fs;
use tempfile::TempDir;

#[test]
fn init_copies_template_and_scaffolds() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("template.env"), "GCP_PROJECT_ID=your-gcp-project-id\n").unwrap();
    let harness = Harness::new(temp.path(), Settings::default(), ScriptedRunner::new());

    let out = harness.run(&["init"]).unwrap();
    assert!(out.contains("Created .env from template.env."));
    assert!(temp.path().join(".env").is_file());
    assert!(temp.path().join("tools").join("example_tool.toml").is_file());
    assert!(temp.path().join("prompts").is_dir());

    let out = harness.run(&["init"]).unwrap();
    assert!(out.contains(".env file already exists"));

    // The scaffolded manifest is discoverable.
    let out = harness.run(&["tools", "list"]).unwrap();
    assert!(out.contains("get_current_time"));
    assert!(out.contains("google_search"));
}

#[test]
fn test_with_coverage_and_clean_removes_stale_data() {
    let temp = TempDir::new().unwrap();
    let data_dir = temp.path().join(".coverage_data");
    fs::create_dir(&data_dir).unwrap();
    fs::write(data_dir.join(".coverage"), "stale").unwrap();
    let harness = Harness::new(temp.path(), settings("demo"), ScriptedRunner::new());

    let out = harness.run(&["test", "--coverage", "--clean"]).unwrap();
    assert!(out.is_empty());
    assert!(!data_dir.join(".coverage").exists());
    let lines = harness.runner.command_lines();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("--cov=."));
    assert!(harness
        .context
        .console()
        .text()
        .contains("All tests passed successfully!"));
}

#[test]
fn test_failure_exit_code_mirrors_pytest() {
    let temp = TempDir::new().unwrap();
    let runner = ScriptedRunner::new().with_output(ProcessOutput {
        exit_code: 5,
        stdout: "no tests ran".to_string(),
        stderr: String::new(),
    });
    let harness = Harness::new(temp.path(), settings("demo"), runner);

    let err = harness.run(&["test"]).unwrap_err();
    assert_eq!(err.exit_code(), 5);
}

#[test]
fn setup_gcp_without_gcloud_names_it_and_stops() {
    let temp = TempDir::new().unwrap();
    let harness = Harness::new(
        temp.path(),
        settings("demo"),
        ScriptedRunner::new().without_program("gcloud"),
    );

    let err = harness.run(&["setup-gcp"]).unwrap_err();
    assert!(matches!(err, BootstrapError::ExternalToolNotFound { .. }));
    assert!(err.to_string().contains("gcloud"));
    assert_eq!(err.exit_code(), 1);
    assert!(harness.runner.calls().is_empty());
}

#[test]
fn setup_gcp_runs_four_commands() {
    let temp = TempDir::new().unwrap();
    let runner = ScriptedRunner::new().with_stdout("").with_stdout("987\n");
    let harness = Harness::new(temp.path(), settings("demo"), runner);

    let out = harness.run(&["setup-gcp", "--project", "flagged"]).unwrap();
    assert!(out.contains("GCP setup process completed."));
    let lines = harness.runner.command_lines();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("gcloud services enable run.googleapis.com"));
    assert!(lines[0].ends_with("--project=flagged"));
    assert!(lines[2].contains("--member=serviceAccount:987-compute@developer.gserviceaccount.com"));
    assert!(lines[3].ends_with("--condition=None"));
}

#[test]
fn monitoring_setup_reports_disabled_api() {
    let temp = TempDir::new().unwrap();
    let harness = Harness::new(temp.path(), settings("demo"), ScriptedRunner::new().with_stdout(""));

    let out = harness.run(&["monitoring", "setup"]).unwrap();
    assert!(out.contains("is NOT enabled for project 'demo'"));
    assert!(out.contains("setup-gcp"));
}

#[test]
fn monitoring_dashboard_and_alerts_are_notices_only() {
    let temp = TempDir::new().unwrap();
    let harness = Harness::new(temp.path(), settings("demo"), ScriptedRunner::new());

    let dashboard = harness.run(&["monitoring", "dashboard"]).unwrap();
    assert!(dashboard.starts_with("Command 'monitoring dashboard' is not yet implemented."));
    let alerts = harness.run(&["monitoring", "alerts"]).unwrap();
    assert!(alerts.contains("alert policies"));
    assert!(harness.runner.calls().is_empty());
}

#[test]
fn deploy_cancelled_without_procfile() {
    let temp = TempDir::new().unwrap();
    let harness = Harness::with_parts(
        temp.path(),
        settings("demo"),
        ScriptedRunner::new(),
        ScriptedPrompter::new().with_confirms(&[false, false]),
        MemorySecretStore::new(),
    );

    let out = harness
        .run(&["deploy", "--service-name", "svc", "--region", "us-central1"])
        .unwrap();
    assert_eq!(out, "Deployment cancelled by user.");
    assert!(harness.runner.calls().is_empty());
    assert_eq!(harness.prompter.questions().len(), 2);
}

#[test]
fn deploy_runs_gcloud_with_procfile() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("Procfile"), "web: app").unwrap();
    let harness = Harness::new(
        temp.path(),
        settings("demo"),
        ScriptedRunner::new().with_stdout("Service URL: https://svc.run.app\n"),
    );

    let out = harness
        .run(&["deploy", "--service-name", "svc", "--region", "europe-west1"])
        .unwrap();
    assert!(out.contains("Service 'svc' deployed."));
    assert_eq!(
        harness.runner.command_lines(),
        vec!["gcloud run deploy svc --source . --region europe-west1 --project demo \
              --allow-unauthenticated --platform managed"]
    );
}

#[test]
fn adk_ui_only_without_poetry_fails() {
    let temp = TempDir::new().unwrap();
    let harness = Harness::new(
        temp.path(),
        settings("demo"),
        ScriptedRunner::new().without_program("poetry"),
    );

    let err = harness.run(&["run", "--adk-ui-only"]).unwrap_err();
    assert!(err.to_string().contains("poetry"));
    assert_eq!(err.exit_code(), 1);
}
