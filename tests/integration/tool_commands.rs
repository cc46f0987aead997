use super::support::{settings, Harness};
use gen_bootstrap::console::Tone;
use gen_bootstrap::error::BootstrapError;
use gen_bootstrap::testing::ScriptedRunner;
use std::fs;
use tempfile::TempDir;

const TWO_TOOLS: &str = r#"
[[tool]]
native = "get_current_time"

[[tool]]
name = "word_count"
description = "Count the words in a text"
command = ["python3", "tools/word_count.py"]
parameters = [
    { name = "text", type = "str" },
    { name = "unique", type = "bool", default = false },
]
"#;

#[test]
fn empty_tools_dir_reports_no_tools() {
    let temp = TempDir::new().unwrap();
    fs::create_dir(temp.path().join("tools")).unwrap();
    let harness = Harness::new(temp.path(), settings("demo"), ScriptedRunner::new());

    let out = harness.run(&["tools", "list"]).unwrap();
    assert!(out.contains("No tools found"));
}

#[test]
fn missing_tools_dir_is_config_error() {
    let temp = TempDir::new().unwrap();
    let harness = Harness::new(temp.path(), settings("demo"), ScriptedRunner::new());

    let err = harness.run(&["tools", "list"]).unwrap_err();
    assert!(matches!(err, BootstrapError::ConfigError(_)));
    assert_eq!(err.exit_code(), 1);
}

#[test]
fn two_tools_listed_and_described_in_order() {
    let temp = TempDir::new().unwrap();
    let tools = temp.path().join("tools");
    fs::create_dir(&tools).unwrap();
    fs::write(tools.join("agent.toml"), TWO_TOOLS).unwrap();
    let harness = Harness::new(temp.path(), settings("demo"), ScriptedRunner::new());

    let out = harness.run(&["tools", "list"]).unwrap();
    assert!(out.contains("get_current_time"));
    assert!(out.contains("word_count"));
    assert!(out.contains("Total: 2 tool(s)"));

    let out = harness.run(&["tools", "describe", "word_count"]).unwrap();
    let text = out.find("- text: str").unwrap();
    let unique = out.find("- unique: bool (default: false)").unwrap();
    assert!(text < unique);

    let err = harness.run(&["tools", "describe", "nope"]).unwrap_err();
    assert!(matches!(err, BootstrapError::NotFound(_)));
}

#[test]
fn invoke_command_tool_passes_json_on_stdin() {
    let temp = TempDir::new().unwrap();
    let tools = temp.path().join("tools");
    fs::create_dir(&tools).unwrap();
    fs::write(tools.join("agent.toml"), TWO_TOOLS).unwrap();
    let harness = Harness::new(
        temp.path(),
        settings("demo"),
        ScriptedRunner::new().with_stdout("3\n"),
    );

    let out = harness
        .run(&["tools", "invoke", "word_count", "--args", r#"{"text":"a b c"}"#])
        .unwrap();
    assert_eq!(out, "3");
    let calls = harness.runner.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].to_string(), "python3 tools/word_count.py");
    let stdin: serde_json::Value = serde_json::from_str(calls[0].stdin.as_deref().unwrap()).unwrap();
    assert_eq!(stdin["text"], "a b c");
    assert_eq!(stdin["unique"], false);
}

#[test]
fn failing_command_tool_echoes_captured_streams() {
    let temp = TempDir::new().unwrap();
    let tools = temp.path().join("tools");
    fs::create_dir(&tools).unwrap();
    fs::write(tools.join("agent.toml"), TWO_TOOLS).unwrap();
    let harness = Harness::new(
        temp.path(),
        settings("demo"),
        ScriptedRunner::new().with_failure(2, "Traceback: ValueError: bad text"),
    );

    let err = harness
        .run(&["tools", "invoke", "word_count", "--args", r#"{"text":"a"}"#])
        .unwrap_err();
    assert!(matches!(err, BootstrapError::ExternalToolFailure { exit_code: 2, .. }));
    assert_eq!(err.exit_code(), 1);
    let echoed = harness.context.console().lines();
    assert!(echoed
        .iter()
        .any(|(tone, line)| *tone == Tone::Error && line.contains("ValueError: bad text")));
}

#[test]
fn invoke_native_tool() {
    let temp = TempDir::new().unwrap();
    let tools = temp.path().join("tools");
    fs::create_dir(&tools).unwrap();
    fs::write(tools.join("agent.toml"), TWO_TOOLS).unwrap();
    let harness = Harness::new(temp.path(), settings("demo"), ScriptedRunner::new());

    let out = harness.run(&["tools", "invoke", "get_current_time"]).unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(&out).is_ok());
    assert!(harness.runner.calls().is_empty());

    let err = harness
        .run(&["tools", "invoke", "get_current_time", "--args", "[1]"])
        .unwrap_err();
    assert!(matches!(err, BootstrapError::InvalidInput(_)));
}

#[test]
fn token_count_of_empty_text_spawns_nothing() {
    let temp = TempDir::new().unwrap();
    let harness = Harness::new(temp.path(), settings("demo"), ScriptedRunner::new());

    assert_eq!(harness.run(&["tokens", "count", ""]).unwrap(), "0");
    assert!(harness.runner.calls().is_empty());
}

#[test]
fn token_trim_uses_tokenizer_cli() {
    let temp = TempDir::new().unwrap();
    let harness = Harness::new(
        temp.path(),
        settings("demo"),
        ScriptedRunner::new().with_stdout("hello\n"),
    );

    let out = harness
        .run(&["tokens", "trim", "--max-tokens", "1", "hello world"])
        .unwrap();
    assert_eq!(out, "hello");
    assert_eq!(harness.runner.command_lines(), vec!["ttok -m gpt-4 -t 1"]);
}
