use clap::Parser;
use gen_bootstrap::tooling::cli::{Cli, Commands, SecretCommands};

#[test]
fn parse_valid_command_matrix() {
    let cases: Vec<Vec<&str>> = vec![
        vec!["gen-bootstrap", "init"],
        vec!["gen-bootstrap", "init", "--force"],
        vec!["gen-bootstrap", "run"],
        vec!["gen-bootstrap", "run", "--host", "127.0.0.1", "--port", "9000"],
        vec!["gen-bootstrap", "run", "--adk-ui-only", "--agent-path", "app.agent:root_agent"],
        vec!["gen-bootstrap", "deploy", "--service-name", "svc", "--region", "europe-west1"],
        vec!["gen-bootstrap", "deploy", "--run-tests"],
        vec!["gen-bootstrap", "test", "-p", "tests/unit", "-c", "--html", "--junit", "--clean"],
        vec!["gen-bootstrap", "setup-gcp", "--project", "demo", "--interactive"],
        vec!["gen-bootstrap", "tools", "list", "--dir", "agent_tools"],
        vec!["gen-bootstrap", "tools", "describe", "get_current_time"],
        vec!["gen-bootstrap", "tools", "invoke", "get_current_time", "--args", "{}"],
        vec!["gen-bootstrap", "secrets", "list", "--project-id", "demo"],
        vec!["gen-bootstrap", "secrets", "get", "my-key", "--version", "3"],
        vec!["gen-bootstrap", "secrets", "add-version", "my-key", "--data", "x"],
        vec!["gen-bootstrap", "secrets", "fetch"],
        vec!["gen-bootstrap", "prompts", "list"],
        vec!["gen-bootstrap", "prompts", "--remote", "get", "123", "--version", "2"],
        vec!["gen-bootstrap", "prompts", "create", "--file", "p.yaml", "--remote"],
        vec!["gen-bootstrap", "monitoring", "setup", "-p", "demo"],
        vec!["gen-bootstrap", "monitoring", "dashboard"],
        vec!["gen-bootstrap", "tokens", "count", "hello world"],
        vec!["gen-bootstrap", "tokens", "trim", "--max-tokens", "5", "--file", "notes.txt"],
        vec!["gen-bootstrap", "--workspace", "/tmp/ws", "--log-format", "text", "init"],
    ];

    for args in cases {
        let parsed = Cli::try_parse_from(args.clone());
        assert!(parsed.is_ok(), "expected valid parse for args: {args:?}");
    }
}

#[test]
fn parse_rejects_conflicting_secret_payloads() {
    let parsed = Cli::try_parse_from([
        "gen-bootstrap",
        "secrets",
        "add-version",
        "my-key",
        "--data",
        "x",
        "--data-file",
        "payload.bin",
    ]);
    assert!(parsed.is_err());
}

#[test]
fn parse_defaults() {
    let cli = Cli::try_parse_from(["gen-bootstrap", "secrets", "get", "my-key"]).unwrap();
    match cli.command {
        Commands::Secrets {
            command: SecretCommands::Get { version, .. },
            project_id,
        } => {
            assert_eq!(version, "latest");
            assert_eq!(project_id, None);
        }
        _ => panic!("expected secrets get"),
    }

    let cli = Cli::try_parse_from(["gen-bootstrap", "run"]).unwrap();
    match cli.command {
        Commands::Run {
            host,
            port,
            adk_ui_only,
            agent_path,
        } => {
            assert_eq!(host, "0.0.0.0");
            assert_eq!(port, 8080);
            assert!(!adk_ui_only);
            assert_eq!(agent_path, "adk.agent:root_agent");
        }
        _ => panic!("expected run"),
    }
    assert_eq!(cli.workspace.to_str(), Some("."));
}

#[test]
fn parse_rejects_unknown_commands() {
    assert!(Cli::try_parse_from(["gen-bootstrap", "scan"]).is_err());
    assert!(Cli::try_parse_from(["gen-bootstrap", "tokens", "trim", "text"]).is_err());
}
