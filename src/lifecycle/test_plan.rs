//! `test`: run pytest through poetry with optional coverage reports.

use super::CommandEnv;
use crate::console::Console;
use crate::error::BootstrapError;
use crate::process::{require, CommandSpec, ProcessOutput};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

pub const COVERAGE_DATA_DIR: &str = ".coverage_data";
pub const COVERAGE_DATA_FILE: &str = ".coverage";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestPlan {
    pub path: String,
    pub verbose: bool,
    pub coverage: bool,
    pub html: bool,
    pub junit: bool,
    pub output_dir: String,
    pub clean: bool,
}

impl Default for TestPlan {
    fn default() -> Self {
        Self {
            path: "tests".to_string(),
            verbose: false,
            coverage: false,
            html: false,
            junit: false,
            output_dir: ".coverage".to_string(),
            clean: false,
        }
    }
}

impl TestPlan {
    /// Plan used before deploying: coverage on a clean slate.
    pub fn pre_deploy() -> Self {
        Self {
            coverage: true,
            clean: true,
            ..Self::default()
        }
    }

    /// `poetry run pytest <path> [-v] [--cov=. [html] [junit] --cov-report=term]`
    pub fn command(&self) -> CommandSpec {
        let mut spec = CommandSpec::new("poetry").args(["run", "pytest", self.path.as_str()]);
        if self.verbose {
            spec = spec.arg("-v");
        }
        if self.coverage {
            spec = spec.arg("--cov=.");
            if self.html {
                spec = spec.arg(format!("--cov-report=html:{}/html", self.output_dir));
            }
            if self.junit {
                spec = spec.arg(format!("--junitxml={}/junit.xml", self.output_dir));
            }
            spec = spec.arg("--cov-report=term");
        }
        spec
    }

    /// Create coverage directories and remove stale data. Problems are warnings.
    pub fn prepare(&self, workspace: &Path, console: &Console) {
        if !self.coverage {
            return;
        }
        let data_dir = workspace.join(COVERAGE_DATA_DIR);
        if let Err(e) = fs::create_dir_all(&data_dir) {
            console.warning(format!("WARNING: Could not create coverage data directory: {}", e));
        }
        if self.clean {
            console.plain("Cleaning coverage data...");
            let data_file = data_dir.join(COVERAGE_DATA_FILE);
            if data_file.exists() {
                match fs::remove_file(&data_file) {
                    Ok(()) => console.plain("Coverage data file removed."),
                    Err(e) if e.kind() == ErrorKind::PermissionDenied => console.warning(
                        "WARNING: Could not remove coverage data file: Permission denied. \
                         Try closing any processes that might be using it.",
                    ),
                    Err(e) => console
                        .warning(format!("WARNING: Could not remove coverage data file: {}", e)),
                }
            }
        }
        if self.html || self.junit {
            if let Err(e) = fs::create_dir_all(workspace.join(&self.output_dir)) {
                console.warning(format!("WARNING: Could not create output directory: {}", e));
            }
        }
    }
}

/// True when pytest failed on the coverage data file's permissions.
pub fn is_coverage_permission_error(output: &ProcessOutput) -> bool {
    output.stderr.contains("PermissionError") && output.stderr.contains(".coverage")
}

/// Run the plan. A failing run yields `TestsFailed` carrying pytest's exit code.
pub fn run_tests(env: &CommandEnv<'_>, plan: &TestPlan) -> Result<ProcessOutput, BootstrapError> {
    env.console.plain("Running tests...");
    plan.prepare(env.workspace, env.console);
    require(env.runner, "poetry")?;

    let spec = plan.command().current_dir(env.workspace);
    env.console.executing(&spec);
    let output = env.runner.run(&spec)?;
    env.console.process_output(&output);

    if output.success() {
        env.console.success("All tests passed successfully!");
        if plan.coverage && plan.html {
            env.console.plain(format!(
                "HTML coverage report generated in {0}/html\nOpen {0}/html/index.html to view the report",
                plan.output_dir
            ));
        }
        return Ok(output);
    }

    if is_coverage_permission_error(&output) {
        env.console.error(
            "Permission error accessing coverage data file. Try running with --clean flag \
             or manually delete the .coverage_data directory.",
        );
    }
    Err(BootstrapError::TestsFailed {
        exit_code: output.exit_code,
    })
}
