//! CLI Tooling
//!
//! Command-line interface for gen-bootstrap. Each variant validates its inputs,
//! calls one service or lifecycle function, and renders the returned result.

use super::format::{
    format_init_result, format_monitoring_pending, format_monitoring_report, format_prompt,
    format_prompt_created, format_prompt_list, format_secret_list, format_setup_report, format_tool_describe,
    format_tool_list,
};
use crate::agent::AGENT_PATH;
use crate::config::Settings;
use crate::console::Console;
use crate::error::BootstrapError;
use crate::interactive::Prompter;
use crate::lifecycle::{
    deploy, init_project, monitoring_setup, run_adk_ui, run_tests, serve_web, setup_gcp,
    CommandEnv, DeployOptions, DeployOutcome, SetupGcpOptions, TestPlan,
};
use crate::process::{ProcessOutput, ProcessRunner};
use crate::prompts::{LocalPromptStore, PromptCommandService, PromptStore, VertexPromptRegistry};
use crate::rest;
use crate::secrets::{
    read_version_data, SecretCommandService, SecretManagerClient, SecretStore, LATEST_VERSION,
};
use crate::tokens::Tokenizer;
use crate::tools::{parse_args, NativeTable, ToolCommandService};
use clap::{Parser, Subcommand};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// gen-bootstrap - Bootstrap, run, and deploy a generative AI agent project
#[derive(Parser)]
#[command(name = "gen-bootstrap")]
#[command(about = "Bootstrap, run, and deploy a generative AI agent project on Google Cloud")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create .env from template.env and scaffold tools/ and prompts/
    Init {
        /// Overwrite an existing .env
        #[arg(long)]
        force: bool,
    },
    /// Serve the web app, or launch the ADK dev UI
    Run {
        /// Host to bind
        #[arg(long, default_value = "0.0.0.0")]
        host: String,
        /// Port to bind
        #[arg(long, default_value_t = 8080)]
        port: u16,
        /// Launch 'adk web' instead of the web app
        #[arg(long)]
        adk_ui_only: bool,
        /// Agent module path handed to 'adk web'
        #[arg(long, default_value = AGENT_PATH)]
        agent_path: String,
    },
    /// Deploy to Cloud Run from source
    Deploy {
        /// Cloud Run service name (prompted when omitted)
        #[arg(long)]
        service_name: Option<String>,
        /// GCP region (prompted when omitted)
        #[arg(long)]
        region: Option<String>,
        /// GCP project id
        #[arg(long)]
        project_id: Option<String>,
        /// Run the test suite with coverage first
        #[arg(long)]
        run_tests: bool,
    },
    /// Run the test suite with pytest
    Test {
        /// Test path
        #[arg(long, short = 'p', default_value = "tests")]
        path: String,
        /// Collect coverage
        #[arg(long, short = 'c')]
        coverage: bool,
        /// Write an HTML coverage report
        #[arg(long)]
        html: bool,
        /// Verbose pytest output
        #[arg(long, short = 'v')]
        verbose: bool,
        /// Write a JUnit XML report
        #[arg(long)]
        junit: bool,
        /// Report output directory
        #[arg(long, default_value = ".coverage")]
        output_dir: String,
        /// Remove stale coverage data first
        #[arg(long)]
        clean: bool,
    },
    /// Enable APIs and grant IAM roles in a GCP project
    SetupGcp {
        /// GCP project id
        #[arg(long, short = 'p')]
        project: Option<String>,
        /// Ask before each step
        #[arg(long)]
        interactive: bool,
    },
    /// Inspect and invoke agent tools
    Tools {
        #[command(subcommand)]
        command: ToolCommands,
    },
    /// Manage Secret Manager secrets
    Secrets {
        /// GCP project id
        #[arg(long, global = true)]
        project_id: Option<String>,
        #[command(subcommand)]
        command: SecretCommands,
    },
    /// Manage prompts (local files or the Vertex AI prompt registry)
    Prompts {
        /// Use the Vertex AI prompt registry
        #[arg(long, global = true)]
        remote: bool,
        /// GCP project id (remote only)
        #[arg(long, global = true)]
        project_id: Option<String>,
        /// Vertex AI location (remote only)
        #[arg(long, global = true)]
        location: Option<String>,
        #[command(subcommand)]
        command: PromptCommands,
    },
    /// Cloud Monitoring helpers
    Monitoring {
        #[command(subcommand)]
        command: MonitoringCommands,
    },
    /// Count or trim tokens
    Tokens {
        #[command(subcommand)]
        command: TokenCommands,
    },
}

#[derive(Subcommand)]
pub enum ToolCommands {
    /// List discovered tools
    List {
        /// Tools directory (default: settings tools_dir)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// Show one tool's parameters and documentation
    Describe {
        /// Tool name
        name: String,
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// Invoke a local tool
    Invoke {
        /// Tool name
        name: String,
        /// Arguments as a JSON object
        #[arg(long)]
        args: Option<String>,
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum SecretCommands {
    /// List secret ids
    List,
    /// Print one secret version
    Get {
        /// Secret id
        id: String,
        /// Version number or 'latest'
        #[arg(long, default_value = LATEST_VERSION)]
        version: String,
    },
    /// Create a secret with automatic replication
    Create {
        /// Secret id
        id: String,
    },
    /// Add a version to a secret
    AddVersion {
        /// Secret id
        id: String,
        /// Inline payload
        #[arg(long, conflicts_with = "data_file")]
        data: Option<String>,
        /// Read the payload from a file
        #[arg(long)]
        data_file: Option<PathBuf>,
    },
    /// Fetch the latest version with checksum verification
    Fetch {
        /// Secret id (default: settings default_prompt_secret_id)
        id: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum PromptCommands {
    /// List prompts
    List,
    /// Print one prompt
    Get {
        /// File name (local) or prompt id (remote)
        id: String,
        /// Prompt version (remote only)
        #[arg(long)]
        version: Option<String>,
    },
    /// Create a prompt from a YAML definition
    Create {
        /// YAML file with prompt_name, model_name, and prompt_data
        #[arg(long)]
        file: PathBuf,
    },
}

#[derive(Subcommand)]
pub enum MonitoringCommands {
    /// Verify the Cloud Monitoring API is enabled
    Setup {
        /// GCP project id
        #[arg(long, short = 'p')]
        project: Option<String>,
    },
    /// Manage a project monitoring dashboard (not yet implemented)
    Dashboard,
    /// Manage project alert policies (not yet implemented)
    Alerts,
}

#[derive(Subcommand)]
pub enum TokenCommands {
    /// Count the tokens in a text
    Count {
        /// Text to count
        #[arg(conflicts_with = "file")]
        text: Option<String>,
        /// Read the text from a file
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Print the prefix of a text that fits in a token budget
    Trim {
        /// Token budget
        #[arg(long)]
        max_tokens: usize,
        #[arg(conflicts_with = "file")]
        text: Option<String>,
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

/// CLI context holding settings and the external collaborators for one run.
pub struct CliContext {
    settings: Settings,
    workspace_root: PathBuf,
    runner: Arc<dyn ProcessRunner>,
    prompter: Arc<dyn Prompter>,
    console: Console,
    natives: NativeTable,
    secret_store: Option<Arc<dyn SecretStore>>,
    prompt_store: Option<Arc<dyn PromptStore>>,
}

impl CliContext {
    pub fn new(
        workspace_root: PathBuf,
        settings: Settings,
        runner: Arc<dyn ProcessRunner>,
        prompter: Arc<dyn Prompter>,
        console: Console,
    ) -> Self {
        Self {
            settings,
            workspace_root,
            runner,
            prompter,
            console,
            natives: NativeTable::standard(),
            secret_store: None,
            prompt_store: None,
        }
    }

    /// Use `store` instead of the Secret Manager REST client.
    pub fn with_secret_store(mut self, store: Arc<dyn SecretStore>) -> Self {
        self.secret_store = Some(store);
        self
    }

    /// Use `store` instead of the Vertex AI prompt registry for `--remote`.
    pub fn with_prompt_store(mut self, store: Arc<dyn PromptStore>) -> Self {
        self.prompt_store = Some(store);
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn console(&self) -> &Console {
        &self.console
    }

    fn env(&self) -> CommandEnv<'_> {
        CommandEnv {
            settings: &self.settings,
            workspace: &self.workspace_root,
            runner: self.runner.as_ref(),
            prompter: self.prompter.as_ref(),
            console: &self.console,
        }
    }

    fn block_on<F: Future>(&self, future: F) -> Result<F::Output, BootstrapError> {
        let runtime = tokio::runtime::Runtime::new()?;
        Ok(runtime.block_on(future))
    }

    fn tools_dir(&self, dir: Option<&Path>) -> PathBuf {
        match dir {
            Some(dir) => dir.to_path_buf(),
            None => self.workspace_root.join(&self.settings.tools_dir),
        }
    }

    /// Echo the captured streams of a failed external command.
    fn echo_failure(&self, e: BootstrapError) -> BootstrapError {
        if let BootstrapError::ExternalToolFailure {
            exit_code,
            stdout,
            stderr,
            ..
        } = &e
        {
            self.console.process_output(&ProcessOutput {
                exit_code: *exit_code,
                stdout: stdout.clone(),
                stderr: stderr.clone(),
            });
        }
        e
    }

    /// Bearer token; a failing `gcloud` call has its output echoed.
    fn access_token(&self) -> Result<String, BootstrapError> {
        rest::access_token(self.runner.as_ref()).map_err(|e| self.echo_failure(e))
    }

    fn secret_store(&self) -> Result<Arc<dyn SecretStore>, BootstrapError> {
        if let Some(store) = &self.secret_store {
            return Ok(Arc::clone(store));
        }
        let token = self.access_token()?;
        Ok(Arc::new(SecretManagerClient::new(token)))
    }

    fn prompt_store(
        &self,
        remote: bool,
        project_id: Option<&str>,
        location: Option<&str>,
    ) -> Result<Arc<dyn PromptStore>, BootstrapError> {
        if !remote {
            return Ok(Arc::new(LocalPromptStore::new(
                self.workspace_root.join(&self.settings.prompts_dir),
            )));
        }
        let project_id = self.settings.resolve_project_id(project_id)?;
        if let Some(store) = &self.prompt_store {
            return Ok(Arc::clone(store));
        }
        let location = location.unwrap_or(&self.settings.gcp_location).to_string();
        let token = self.access_token()?;
        Ok(Arc::new(VertexPromptRegistry::new(token, project_id, location)))
    }

    /// Execute a CLI command
    pub fn execute(&self, command: &Commands) -> Result<String, BootstrapError> {
        match command {
            Commands::Init { force } => {
                let result = init_project(&self.workspace_root, &self.settings, *force)?;
                Ok(format_init_result(&result))
            }
            Commands::Run {
                host,
                port,
                adk_ui_only,
                agent_path,
            } => {
                if *adk_ui_only {
                    run_adk_ui(&self.env(), agent_path)?;
                    return Ok(String::new());
                }
                info!(host = %host, port = *port, "Serving web app");
                serve_web(
                    &self.settings,
                    &self.workspace_root,
                    Arc::clone(&self.runner),
                    host,
                    *port,
                )?;
                Ok(String::new())
            }
            Commands::Deploy {
                service_name,
                region,
                project_id,
                run_tests,
            } => {
                let options = DeployOptions {
                    service_name: service_name.clone(),
                    region: region.clone(),
                    project_id: project_id.clone(),
                    run_tests: *run_tests,
                };
                match deploy(&self.env(), options)? {
                    DeployOutcome::Deployed { service, output } => {
                        let mut out = format!("Service '{}' deployed.", service);
                        if !output.trim().is_empty() {
                            out.push_str(&format!("\n{}", output.trim_end()));
                        }
                        Ok(out)
                    }
                    DeployOutcome::Cancelled => Ok("Deployment cancelled by user.".to_string()),
                }
            }
            Commands::Test {
                path,
                coverage,
                html,
                verbose,
                junit,
                output_dir,
                clean,
            } => {
                let plan = TestPlan {
                    path: path.clone(),
                    verbose: *verbose,
                    coverage: *coverage,
                    html: *html,
                    junit: *junit,
                    output_dir: output_dir.clone(),
                    clean: *clean,
                };
                run_tests(&self.env(), &plan)?;
                Ok(String::new())
            }
            Commands::SetupGcp {
                project,
                interactive,
            } => {
                let report = setup_gcp(
                    &self.env(),
                    SetupGcpOptions {
                        project_id: project.clone(),
                        interactive: *interactive,
                    },
                )?;
                Ok(format_setup_report(&report))
            }
            Commands::Tools { command } => self.handle_tools(command),
            Commands::Secrets {
                project_id,
                command,
            } => self.handle_secrets(project_id.as_deref(), command),
            Commands::Prompts {
                remote,
                project_id,
                location,
                command,
            } => self.handle_prompts(*remote, project_id.as_deref(), location.as_deref(), command),
            Commands::Monitoring { command } => match command {
                MonitoringCommands::Setup { project } => {
                    let report = monitoring_setup(&self.env(), project.as_deref())?;
                    Ok(format_monitoring_report(&report))
                }
                MonitoringCommands::Dashboard => Ok(format_monitoring_pending(
                    "dashboard",
                    "create or update a predefined Cloud Monitoring dashboard for key project metrics",
                )),
                MonitoringCommands::Alerts => Ok(format_monitoring_pending(
                    "alerts",
                    "create or update predefined Cloud Monitoring alert policies for critical conditions",
                )),
            },
            Commands::Tokens { command } => self.handle_tokens(command),
        }
    }

    fn handle_tools(&self, command: &ToolCommands) -> Result<String, BootstrapError> {
        match command {
            ToolCommands::List { dir } => {
                let dir = self.tools_dir(dir.as_deref());
                let result = ToolCommandService::list(&dir, &self.natives)?;
                Ok(format_tool_list(&result))
            }
            ToolCommands::Describe { name, dir } => {
                let dir = self.tools_dir(dir.as_deref());
                let result = ToolCommandService::describe(&dir, &self.natives, name)?;
                Ok(format_tool_describe(&result))
            }
            ToolCommands::Invoke { name, args, dir } => {
                let dir = self.tools_dir(dir.as_deref());
                let args = parse_args(args.as_deref())?;
                let result =
                    ToolCommandService::invoke(&dir, &self.natives, name, &args, self.runner.as_ref())
                        .map_err(|e| self.echo_failure(e))?;
                Ok(result.output)
            }
        }
    }

    fn handle_secrets(
        &self,
        project_id: Option<&str>,
        command: &SecretCommands,
    ) -> Result<String, BootstrapError> {
        let project_id = self.settings.resolve_project_id(project_id)?;
        // Payload problems surface before any credentials are requested.
        let payload = match command {
            SecretCommands::AddVersion {
                data, data_file, ..
            } => Some(read_version_data(data.as_deref(), data_file.as_deref())?),
            _ => None,
        };
        let store = self.secret_store()?;
        let store = store.as_ref();

        match command {
            SecretCommands::List => {
                let result = self.block_on(SecretCommandService::list(store, &project_id))??;
                Ok(format_secret_list(&result))
            }
            SecretCommands::Get { id, version } => {
                let result =
                    self.block_on(SecretCommandService::get(store, &project_id, id, version))??;
                Ok(result.value)
            }
            SecretCommands::Create { id } => {
                let result = self.block_on(SecretCommandService::create(store, &project_id, id))??;
                Ok(format!("Created secret: {}", result.name))
            }
            SecretCommands::AddVersion { id, .. } => {
                let data = payload.unwrap_or_default();
                let result = self.block_on(SecretCommandService::add_version(
                    store,
                    &project_id,
                    id,
                    &data,
                ))??;
                Ok(format!("Added secret version: {}", result.name))
            }
            SecretCommands::Fetch { id } => {
                let id = id
                    .clone()
                    .unwrap_or_else(|| self.settings.default_prompt_secret_id.clone());
                let result = self.block_on(SecretCommandService::get(
                    store,
                    &project_id,
                    &id,
                    LATEST_VERSION,
                ))??;
                Ok(result.value)
            }
        }
    }

    fn handle_prompts(
        &self,
        remote: bool,
        project_id: Option<&str>,
        location: Option<&str>,
        command: &PromptCommands,
    ) -> Result<String, BootstrapError> {
        if !remote {
            if let PromptCommands::Get {
                version: Some(_), ..
            } = command
            {
                return Err(BootstrapError::InvalidInput(
                    "--version is only supported with --remote".to_string(),
                ));
            }
        }
        let store = self.prompt_store(remote, project_id, location)?;
        let store = store.as_ref();

        match command {
            PromptCommands::List => {
                let result = self.block_on(PromptCommandService::list(store))??;
                Ok(format_prompt_list(&result, remote))
            }
            PromptCommands::Get { id, version } => {
                let result =
                    self.block_on(PromptCommandService::get(store, id, version.as_deref()))??;
                if remote {
                    Ok(format_prompt(&result.prompt))
                } else {
                    Ok(result.prompt.content.unwrap_or_default())
                }
            }
            PromptCommands::Create { file } => {
                let result = self.block_on(PromptCommandService::create(store, file))??;
                Ok(format_prompt_created(&result))
            }
        }
    }

    fn handle_tokens(&self, command: &TokenCommands) -> Result<String, BootstrapError> {
        let tokenizer = Tokenizer::from_settings(&self.settings, self.runner.as_ref());
        match command {
            TokenCommands::Count { text, file } => {
                let text = read_text(text.as_deref(), file.as_deref())?;
                Ok(tokenizer.count_text_tokens(&text).to_string())
            }
            TokenCommands::Trim {
                max_tokens,
                text,
                file,
            } => {
                let text = read_text(text.as_deref(), file.as_deref())?;
                Ok(tokenizer.trim_text_to_tokens(&text, *max_tokens))
            }
        }
    }
}

/// Text from the positional argument or `--file`; exactly one is required.
fn read_text(text: Option<&str>, file: Option<&Path>) -> Result<String, BootstrapError> {
    match (text, file) {
        (Some(text), None) => Ok(text.to_string()),
        (None, Some(path)) => std::fs::read_to_string(path).map_err(|e| {
            BootstrapError::NotFound(format!("Cannot read '{}': {}", path.display(), e))
        }),
        (Some(_), Some(_)) => Err(BootstrapError::InvalidInput(
            "the text argument and --file are mutually exclusive".to_string(),
        )),
        (None, None) => Err(BootstrapError::InvalidInput(
            "one of the text argument or --file is required".to_string(),
        )),
    }
}
