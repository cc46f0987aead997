//! Project Lifecycle
//!
//! Scaffolding, running, testing, deploying, and cloud setup. Every external
//! step is built as a [`CommandSpec`](crate::process::CommandSpec) and executed
//! through the environment's runner, so the exact command lines are testable.

pub mod deploy;
pub mod gcp;
pub mod init;
pub mod monitoring;
pub mod run;
pub mod test_plan;

use crate::config::Settings;
use crate::console::Console;
use crate::interactive::Prompter;
use crate::process::ProcessRunner;
use std::path::Path;

pub use deploy::{deploy, DeployOptions, DeployOutcome};
pub use gcp::{setup_gcp, SetupGcpOptions, SetupGcpReport, StepOutcome};
pub use init::{init_project, EnvFileOutcome, InitResult};
pub use monitoring::{monitoring_setup, MonitoringReport};
pub use run::{run_adk_ui, serve_web};
pub use test_plan::{run_tests, TestPlan};

/// Everything a lifecycle command needs from its caller.
#[derive(Clone, Copy)]
pub struct CommandEnv<'a> {
    pub settings: &'a Settings,
    pub workspace: &'a Path,
    pub runner: &'a dyn ProcessRunner,
    pub prompter: &'a dyn Prompter,
    pub console: &'a Console,
}
