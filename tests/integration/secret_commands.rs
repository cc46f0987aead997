use super::support::{settings, Harness};
use gen_bootstrap::config::Settings;
use gen_bootstrap::error::BootstrapError;
use gen_bootstrap::testing::{MemorySecretStore, ScriptedPrompter, ScriptedRunner};
use std::fs;
use tempfile::TempDir;

#[test]
fn get_requests_exact_version_resource() {
    let temp = TempDir::new().unwrap();
    let harness = Harness::new(temp.path(), settings("demo"), ScriptedRunner::new());
    harness.run(&["secrets", "create", "my-key"]).unwrap();
    for value in ["one", "two", "three"] {
        harness
            .run(&["secrets", "add-version", "my-key", "--data", value])
            .unwrap();
    }

    let out = harness
        .run(&["secrets", "get", "my-key", "--version", "3"])
        .unwrap();
    assert_eq!(out, "three");
    assert_eq!(
        harness.secrets.requested(),
        vec!["projects/demo/secrets/my-key/versions/3"]
    );
}

#[test]
fn secret_round_trip() {
    let temp = TempDir::new().unwrap();
    let payload = temp.path().join("payload.txt");
    fs::write(&payload, "from-file").unwrap();
    let harness = Harness::new(temp.path(), Settings::default(), ScriptedRunner::new());

    let out = harness
        .run(&["secrets", "create", "api-key", "--project-id", "proj"])
        .unwrap();
    assert_eq!(out, "Created secret: projects/proj/secrets/api-key");
    let out = harness
        .run(&["secrets", "add-version", "api-key", "--data", "s3cr3t", "--project-id", "proj"])
        .unwrap();
    assert_eq!(out, "Added secret version: projects/proj/secrets/api-key/versions/1");
    assert_eq!(
        harness
            .run(&["secrets", "get", "api-key", "--project-id", "proj"])
            .unwrap(),
        "s3cr3t"
    );

    let data_file = payload.to_str().unwrap();
    harness
        .run(&["secrets", "add-version", "api-key", "--data-file", data_file, "--project-id", "proj"])
        .unwrap();
    assert_eq!(
        harness
            .run(&["secrets", "get", "api-key", "--project-id", "proj"])
            .unwrap(),
        "from-file"
    );

    let out = harness.run(&["secrets", "list", "--project-id", "proj"]).unwrap();
    assert!(out.contains("  - api-key"));
}

#[test]
fn add_version_requires_a_payload() {
    let temp = TempDir::new().unwrap();
    let harness = Harness::new(temp.path(), settings("demo"), ScriptedRunner::new());

    let err = harness.run(&["secrets", "add-version", "my-key"]).unwrap_err();
    assert!(matches!(err, BootstrapError::InvalidInput(_)));
}

#[test]
fn fetch_defaults_to_prompt_secret_and_verifies_checksum() {
    let temp = TempDir::new().unwrap();
    let harness = Harness::with_parts(
        temp.path(),
        settings("demo"),
        ScriptedRunner::new(),
        ScriptedPrompter::new(),
        MemorySecretStore::new().with_corruption(),
    );
    harness.run(&["secrets", "create", "default-prompt"]).unwrap();
    harness
        .run(&["secrets", "add-version", "default-prompt", "--data", "You are helpful."])
        .unwrap();

    let err = harness.run(&["secrets", "fetch"]).unwrap_err();
    assert!(matches!(err, BootstrapError::Checksum { .. }));
    assert_eq!(
        harness.secrets.requested(),
        vec!["projects/demo/secrets/default-prompt/versions/latest"]
    );
}

#[test]
fn missing_project_fails_before_any_call() {
    if std::env::var("GCP_PROJECT_ID").is_ok() {
        return;
    }
    let temp = TempDir::new().unwrap();
    let harness = Harness::new(temp.path(), Settings::default(), ScriptedRunner::new());

    let err = harness.run(&["secrets", "list"]).unwrap_err();
    assert!(matches!(err, BootstrapError::ConfigError(_)));
    assert!(harness.runner.calls().is_empty());
    assert!(harness.secrets.requested().is_empty());
}
