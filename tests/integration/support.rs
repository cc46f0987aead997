use clap::Parser;
use gen_bootstrap::config::Settings;
use gen_bootstrap::console::Console;
use gen_bootstrap::error::BootstrapError;
use gen_bootstrap::testing::{MemorySecretStore, ScriptedPrompter, ScriptedRunner};
use gen_bootstrap::tooling::cli::{Cli, CliContext};
use std::path::Path;
use std::sync::Arc;

pub fn settings(project_id: &str) -> Settings {
    Settings {
        gcp_project_id: project_id.to_string(),
        ..Settings::default()
    }
}

pub struct Harness {
    pub context: CliContext,
    pub runner: Arc<ScriptedRunner>,
    pub prompter: Arc<ScriptedPrompter>,
    pub secrets: Arc<MemorySecretStore>,
}

impl Harness {
    pub fn new(workspace: &Path, settings: Settings, runner: ScriptedRunner) -> Self {
        Self::with_parts(workspace, settings, runner, ScriptedPrompter::new(), MemorySecretStore::new())
    }

    pub fn with_parts(
        workspace: &Path,
        settings: Settings,
        runner: ScriptedRunner,
        prompter: ScriptedPrompter,
        secrets: MemorySecretStore,
    ) -> Self {
        let runner = Arc::new(runner);
        let prompter = Arc::new(prompter);
        let secrets = Arc::new(secrets);
        let context = CliContext::new(
            workspace.to_path_buf(),
            settings,
            runner.clone(),
            prompter.clone(),
            Console::captured(),
        )
        .with_secret_store(secrets.clone());
        Self {
            context,
            runner,
            prompter,
            secrets,
        }
    }

    /// Parse `args` (without the program name) and execute.
    pub fn run(&self, args: &[&str]) -> Result<String, BootstrapError> {
        let argv = std::iter::once("gen-bootstrap").chain(args.iter().copied());
        let cli = Cli::try_parse_from(argv).expect("arguments should parse");
        self.context.execute(&cli.command)
    }
}
