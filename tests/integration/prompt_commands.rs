use super::support::{settings, Harness};
use gen_bootstrap::config::Settings;
use gen_bootstrap::error::BootstrapError;
use gen_bootstrap::testing::ScriptedRunner;
use std::fs;
use tempfile::TempDir;

#[test]
fn local_prompts_create_list_get() {
    let temp = TempDir::new().unwrap();
    let yaml = temp.path().join("greeter.yaml");
    fs::write(
        &yaml,
        "prompt_name: greeter\nmodel_name: gemini-1.5-pro\nprompt_data: Say hello.\n",
    )
    .unwrap();
    let harness = Harness::new(temp.path(), settings("demo"), ScriptedRunner::new());

    let out = harness
        .run(&["prompts", "create", "--file", yaml.to_str().unwrap()])
        .unwrap();
    assert!(out.contains("greeter.txt"));

    fs::write(temp.path().join("prompts").join(".hidden"), "x").unwrap();
    fs::write(temp.path().join("prompts").join("another.txt"), "Be brief.").unwrap();
    let out = harness.run(&["prompts", "list"]).unwrap();
    let another = out.find("another.txt").unwrap();
    let greeter = out.find("greeter.txt").unwrap();
    assert!(another < greeter);
    assert!(!out.contains(".hidden"));

    assert_eq!(
        harness.run(&["prompts", "get", "greeter.txt"]).unwrap(),
        "Say hello."
    );
    assert!(harness.runner.calls().is_empty());
}

#[test]
fn local_prompt_definition_requires_fields() {
    let temp = TempDir::new().unwrap();
    let yaml = temp.path().join("bad.yaml");
    fs::write(&yaml, "prompt_name: bad\n").unwrap();
    let harness = Harness::new(temp.path(), settings("demo"), ScriptedRunner::new());

    let err = harness
        .run(&["prompts", "create", "--file", yaml.to_str().unwrap()])
        .unwrap_err();
    assert!(err.to_string().contains("'prompt_name', 'model_name', and 'prompt_data'"));
}

#[test]
fn local_get_rejects_version() {
    let temp = TempDir::new().unwrap();
    let harness = Harness::new(temp.path(), settings("demo"), ScriptedRunner::new());

    let err = harness
        .run(&["prompts", "get", "greeter.txt", "--version", "2"])
        .unwrap_err();
    assert!(matches!(err, BootstrapError::InvalidInput(_)));
}

#[test]
fn remote_prompts_require_project() {
    if std::env::var("GCP_PROJECT_ID").is_ok() {
        return;
    }
    let temp = TempDir::new().unwrap();
    let harness = Harness::new(temp.path(), Settings::default(), ScriptedRunner::new());

    let err = harness.run(&["prompts", "--remote", "list"]).unwrap_err();
    assert!(matches!(err, BootstrapError::ConfigError(_)));
    assert!(harness.runner.calls().is_empty());
}
