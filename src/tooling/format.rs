//! Human-readable rendering of command results.

use crate::console::color_enabled;
use crate::lifecycle::{EnvFileOutcome, InitResult, MonitoringReport, SetupGcpReport, StepOutcome};
use crate::prompts::{PromptCreateResult, PromptListResult, PromptRecord};
use crate::secrets::SecretListResult;
use crate::tools::{ToolDescribeResult, ToolListResult};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;

/// Bold/underlined heading. Respects NO_COLOR and TTY.
pub fn format_section_heading(title: &str) -> String {
    if color_enabled() {
        format!("{}", title.bold().underline())
    } else {
        title.to_string()
    }
}

fn append_warnings(out: &mut String, warnings: &[String]) {
    if warnings.is_empty() {
        return;
    }
    out.push_str("\nWarnings:\n");
    for warning in warnings {
        out.push_str(&format!("  - {}\n", warning));
    }
}

pub fn format_init_result(result: &InitResult) -> String {
    let mut out = String::new();
    match result.env_file {
        EnvFileOutcome::Created => {
            out.push_str("Created .env from template.env.\n");
            out.push_str("Please update .env with your specific configurations.\n");
        }
        EnvFileOutcome::Overwritten => {
            out.push_str("Replaced existing .env with template.env.\n");
        }
        EnvFileOutcome::AlreadyExists => {
            out.push_str(".env file already exists. No changes made to .env.\n");
        }
        EnvFileOutcome::TemplateMissing => {
            out.push_str("Warning: template.env not found. Could not create .env file.\n");
        }
    }
    for dir in &result.created_dirs {
        out.push_str(&format!("Created directory {}\n", dir.display()));
    }
    if let Some(manifest) = &result.example_manifest {
        out.push_str(&format!("Wrote example tool manifest {}\n", manifest.display()));
    }
    out.push_str("\nNext steps:\n");
    out.push_str("  1. Install dependencies: poetry install\n");
    out.push_str("  2. Install pre-commit hooks: poetry run pre-commit install\n");
    out.push_str("  3. Run 'gen-bootstrap setup-gcp' to prepare your Google Cloud project.");
    out
}

pub fn format_tool_list(result: &ToolListResult) -> String {
    if result.tools.is_empty() {
        let mut out = format!("No tools found in '{}'.\n", result.dir.display());
        append_warnings(&mut out, &result.warnings);
        return out.trim_end().to_string();
    }
    let mut out = format!(
        "{}\n\n",
        format_section_heading(&format!("Available tools in '{}'", result.dir.display()))
    );
    for tool in &result.tools {
        out.push_str(&format!(
            "  {:<24} {:<8} {}\n",
            tool.name,
            tool.handler.kind(),
            tool.description
        ));
    }
    out.push_str(&format!("\nTotal: {} tool(s)\n", result.tools.len()));
    append_warnings(&mut out, &result.warnings);
    out.trim_end().to_string()
}

pub fn format_tool_describe(result: &ToolDescribeResult) -> String {
    let tool = &result.tool;
    let mut out = format!("Tool: {}\n", tool.name);
    out.push_str(&format!("Kind: {}\n", tool.handler.kind()));
    out.push_str(&format!("Description: {}\n", tool.description));
    if let Some(source) = &tool.source {
        out.push_str(&format!("Source: {}\n", source.display()));
    }
    out.push_str("\nParameters:\n");
    if tool.parameters.is_empty() {
        out.push_str("  (none)\n");
    }
    for param in &tool.parameters {
        out.push_str(&format!("  - {}", param));
        if let Some(description) = &param.description {
            out.push_str(&format!("  {}", description));
        }
        out.push('\n');
    }
    if let Some(doc) = result.extended_documentation() {
        out.push_str(&format!("\nDocumentation:\n{}\n", doc));
    }
    append_warnings(&mut out, &result.warnings);
    out.trim_end().to_string()
}

pub fn format_secret_list(result: &SecretListResult) -> String {
    if result.secrets.is_empty() {
        return format!("No secrets found in project '{}'.", result.project_id);
    }
    let mut out = format!("Secrets in project '{}':\n", result.project_id);
    for secret in &result.secrets {
        out.push_str(&format!("  - {}\n", secret));
    }
    out.push_str(&format!("\nTotal: {} secret(s)", result.secrets.len()));
    out
}

/// Local prompts print as file names; registry prompts as a table.
pub fn format_prompt_list(result: &PromptListResult, remote: bool) -> String {
    if result.prompts.is_empty() {
        return format!("No prompts found in {}.", result.source);
    }
    let mut out = format!("{}\n\n", format_section_heading(&format!("Prompts in {}", result.source)));
    if remote {
        let mut table = Table::new();
        table.load_preset(UTF8_BORDERS_ONLY);
        table.set_header(vec!["ID", "Display name", "Model", "Version"]);
        for prompt in &result.prompts {
            table.add_row(vec![
                prompt.id.clone(),
                prompt.display_name.clone(),
                prompt.model.clone().unwrap_or_else(|| "-".to_string()),
                prompt.version.clone().unwrap_or_else(|| "-".to_string()),
            ]);
        }
        out.push_str(&format!("{}\n", table));
    } else {
        for prompt in &result.prompts {
            out.push_str(&format!("  - {}\n", prompt.display_name));
        }
    }
    out.trim_end().to_string()
}

pub fn format_prompt(prompt: &PromptRecord) -> String {
    let mut out = format!("Prompt: {}\n", prompt.display_name);
    if prompt.id != prompt.display_name {
        out.push_str(&format!("ID: {}\n", prompt.id));
    }
    if let Some(model) = &prompt.model {
        out.push_str(&format!("Model: {}\n", model));
    }
    if let Some(version) = &prompt.version {
        out.push_str(&format!("Version: {}\n", version));
    }
    if let Some(content) = &prompt.content {
        out.push_str(&format!("\n{}", content));
    }
    out.trim_end().to_string()
}

pub fn format_prompt_created(result: &PromptCreateResult) -> String {
    format!(
        "Created prompt '{}' (id: {}) in {}.",
        result.prompt.display_name, result.prompt.id, result.source
    )
}

pub fn format_setup_report(report: &SetupGcpReport) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Step", "Result"]);
    for step in &report.steps {
        let (name, status) = match step {
            StepOutcome::Done(name) => (name.as_str(), "done".to_string()),
            StepOutcome::AlreadyExists(name) => (name.as_str(), "already exists".to_string()),
            StepOutcome::Skipped(name) => (name.as_str(), "skipped".to_string()),
            StepOutcome::Failed { step, exit_code } => {
                (step.as_str(), format!("failed (exit code {})", exit_code))
            }
        };
        table.add_row(vec![name.to_string(), status]);
    }
    let mut out = format!(
        "{}\n\n{}\n\n",
        format_section_heading(&format!("GCP setup for project {}", report.project_id)),
        table
    );
    match report.failures() {
        0 => out.push_str("GCP setup process completed."),
        n => out.push_str(&format!(
            "GCP setup process completed with {} failed step(s). Review the messages above.",
            n
        )),
    }
    out.push_str(
        "\nNote: IAM changes can take a few minutes to propagate. Grant roles to other \
         service accounts as needed.",
    );
    out
}

pub fn format_monitoring_report(report: &MonitoringReport) -> String {
    let mut out = if report.enabled {
        format!(
            "Cloud Monitoring API ({}) is enabled for project '{}'.\n",
            report.api, report.project_id
        )
    } else {
        format!(
            "Warning: Cloud Monitoring API ({}) is NOT enabled for project '{}'.\n\
             Run 'gen-bootstrap setup-gcp' or enable it in the Google Cloud Console.\n",
            report.api, report.project_id
        )
    };
    out.push_str("\nNext steps:\n");
    out.push_str("  - Structured JSON logs from the service appear in Cloud Logging.\n");
    out.push_str("  - Create dashboards and alerting policies in Cloud Monitoring.\n");
    out.push_str("  - Add custom metrics with the Cloud Monitoring client libraries if needed.");
    out
}

/// Notice for monitoring subcommands that have no implementation yet.
pub fn format_monitoring_pending(command: &str, purpose: &str) -> String {
    format!(
        "Command 'monitoring {}' is not yet implemented.\nThis command will be used to {}.",
        command, purpose
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{ToolDescriptor, ToolHandler, ToolParameter};
    use std::path::PathBuf;

    #[test]
    fn test_empty_tool_list_message() {
        let result = ToolListResult {
            dir: PathBuf::from("tools"),
            tools: Vec::new(),
            warnings: vec!["Could not load tools from tools/bad.toml: oops".to_string()],
        };
        let out = format_tool_list(&result);
        assert!(out.starts_with("No tools found in 'tools'."));
        assert!(out.contains("bad.toml"));
    }

    #[test]
    fn test_describe_lists_parameters_in_order() {
        let result = ToolDescribeResult {
            tool: ToolDescriptor {
                name: "word_count".to_string(),
                description: "Count words".to_string(),
                documentation: None,
                parameters: vec![
                    ToolParameter::required("text", "str"),
                    ToolParameter::optional("unique", "bool", serde_json::json!(false)),
                ],
                handler: ToolHandler::Command(vec!["python3".to_string()]),
                source: None,
            },
            warnings: Vec::new(),
        };
        let out = format_tool_describe(&result);
        let text = out.find("- text: str").unwrap();
        let unique = out.find("- unique: bool (default: false)").unwrap();
        assert!(text < unique);
    }

    #[test]
    fn test_setup_report_counts_failures() {
        let report = SetupGcpReport {
            project_id: "demo".to_string(),
            service_account: "1-compute@developer.gserviceaccount.com".to_string(),
            steps: vec![
                StepOutcome::Done("enable APIs".to_string()),
                StepOutcome::Failed {
                    step: "grant".to_string(),
                    exit_code: 1,
                },
            ],
        };
        let out = format_setup_report(&report);
        assert!(out.contains("1 failed step(s)"));
        assert!(out.contains("failed (exit code 1)"));
    }
}
