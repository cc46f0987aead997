//! Test doubles for the process runner, secret store, and prompter.
//!
//! Used by unit tests and by the integration tests under `tests/`.

use crate::error::BootstrapError;
use crate::interactive::Prompter;
use crate::process::{CommandSpec, ProcessOutput, ProcessRunner};
use crate::secrets::{secret_name, SecretPayload, SecretStore};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashSet, VecDeque};
use std::sync::Mutex;

/// Runner that records every command and replays queued outputs.
///
/// When the queue is empty, commands succeed with empty output. Every program is
/// available unless removed with [`ScriptedRunner::without_program`].
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    calls: Mutex<Vec<CommandSpec>>,
    outputs: Mutex<VecDeque<ProcessOutput>>,
    missing: HashSet<String>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output(self, output: ProcessOutput) -> Self {
        self.push(output);
        self
    }

    pub fn with_stdout(self, stdout: &str) -> Self {
        self.with_output(ProcessOutput {
            exit_code: 0,
            stdout: stdout.to_string(),
            stderr: String::new(),
        })
    }

    pub fn with_failure(self, exit_code: i32, stderr: &str) -> Self {
        self.with_output(ProcessOutput {
            exit_code,
            stdout: String::new(),
            stderr: stderr.to_string(),
        })
    }

    pub fn without_program(mut self, program: &str) -> Self {
        self.missing.insert(program.to_string());
        self
    }

    pub fn push(&self, output: ProcessOutput) {
        lock(&self.outputs).push_back(output);
    }

    /// Commands run so far, in order.
    pub fn calls(&self) -> Vec<CommandSpec> {
        lock(&self.calls).clone()
    }

    /// Commands run so far, rendered as command lines.
    pub fn command_lines(&self) -> Vec<String> {
        self.calls().iter().map(|c| c.to_string()).collect()
    }

    fn next(&self, spec: &CommandSpec) -> Result<ProcessOutput, BootstrapError> {
        if self.missing.contains(&spec.program) {
            return Err(BootstrapError::tool_not_found(&spec.program));
        }
        lock(&self.calls).push(spec.clone());
        Ok(lock(&self.outputs).pop_front().unwrap_or_default())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl ProcessRunner for ScriptedRunner {
    fn is_available(&self, program: &str) -> bool {
        !self.missing.contains(program)
    }

    fn run(&self, spec: &CommandSpec) -> Result<ProcessOutput, BootstrapError> {
        self.next(spec)
    }

    fn run_attached(&self, spec: &CommandSpec) -> Result<i32, BootstrapError> {
        Ok(self.next(spec)?.exit_code)
    }
}

/// In-memory secret store. Versions are numbered from 1.
#[derive(Debug, Default)]
pub struct MemorySecretStore {
    secrets: Mutex<BTreeMap<String, Vec<Vec<u8>>>>,
    requested: Mutex<Vec<String>>,
    corrupt: bool,
}

impl MemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report a wrong checksum on every access.
    pub fn with_corruption(mut self) -> Self {
        self.corrupt = true;
        self
    }

    /// Version names passed to `access_secret_version`, in order.
    pub fn requested(&self) -> Vec<String> {
        lock(&self.requested).clone()
    }
}

#[async_trait]
impl SecretStore for MemorySecretStore {
    async fn list_secrets(&self, project_id: &str) -> Result<Vec<String>, BootstrapError> {
        let prefix = format!("projects/{}/secrets/", project_id);
        Ok(lock(&self.secrets)
            .keys()
            .filter(|name| name.starts_with(&prefix))
            .cloned()
            .collect())
    }

    async fn access_secret_version(&self, name: &str) -> Result<SecretPayload, BootstrapError> {
        lock(&self.requested).push(name.to_string());
        let (secret, version) = name
            .rsplit_once("/versions/")
            .ok_or_else(|| BootstrapError::InvalidInput(format!("bad version name '{}'", name)))?;
        let secrets = lock(&self.secrets);
        let versions = secrets
            .get(secret)
            .ok_or_else(|| BootstrapError::NotFound(format!("Secret '{}' not found.", secret)))?;
        let data = if version == crate::secrets::LATEST_VERSION {
            versions.last()
        } else {
            version
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|index| versions.get(index))
        }
        .ok_or_else(|| BootstrapError::NotFound(format!("Version '{}' not found.", name)))?;

        let mut payload = SecretPayload::new(data.clone());
        if self.corrupt {
            payload.data_crc32c = payload.data_crc32c.map(|c| c.wrapping_add(1));
        }
        Ok(payload)
    }

    async fn create_secret(&self, project_id: &str, secret_id: &str) -> Result<String, BootstrapError> {
        let name = secret_name(project_id, secret_id);
        let mut secrets = lock(&self.secrets);
        if secrets.contains_key(&name) {
            return Err(BootstrapError::RemoteApi {
                status: 409,
                message: format!("Secret [{}] already exists.", name),
            });
        }
        secrets.insert(name.clone(), Vec::new());
        Ok(name)
    }

    async fn add_secret_version(&self, secret: &str, data: &[u8]) -> Result<String, BootstrapError> {
        let mut secrets = lock(&self.secrets);
        let versions = secrets
            .get_mut(secret)
            .ok_or_else(|| BootstrapError::NotFound(format!("Secret '{}' not found.", secret)))?;
        versions.push(data.to_vec());
        Ok(format!("{}/versions/{}", secret, versions.len()))
    }
}

/// Prompter answering from queued responses.
///
/// Questions are recorded. With nothing queued, `confirm` answers its default and
/// `input` answers its default or fails.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    confirms: Mutex<VecDeque<bool>>,
    inputs: Mutex<VecDeque<String>>,
    questions: Mutex<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_confirms(self, answers: &[bool]) -> Self {
        lock(&self.confirms).extend(answers.iter().copied());
        self
    }

    pub fn with_inputs(self, answers: &[&str]) -> Self {
        lock(&self.inputs).extend(answers.iter().map(|a| a.to_string()));
        self
    }

    pub fn questions(&self) -> Vec<String> {
        lock(&self.questions).clone()
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&self, question: &str, default: bool) -> Result<bool, BootstrapError> {
        lock(&self.questions).push(question.to_string());
        Ok(lock(&self.confirms).pop_front().unwrap_or(default))
    }

    fn input(&self, question: &str, default: Option<&str>) -> Result<String, BootstrapError> {
        lock(&self.questions).push(question.to_string());
        match lock(&self.inputs).pop_front() {
            Some(answer) if !answer.is_empty() => Ok(answer),
            _ => default.map(str::to_string).ok_or_else(|| {
                BootstrapError::ConfigError(format!("No scripted answer for '{}'", question))
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_runner_records_and_replays() {
        let runner = ScriptedRunner::new().with_stdout("first").without_program("poetry");
        let out = runner.run(&CommandSpec::new("gcloud").arg("version")).unwrap();
        assert_eq!(out.stdout, "first");
        let out = runner.run(&CommandSpec::new("gcloud").arg("version")).unwrap();
        assert!(out.success());
        assert!(!runner.is_available("poetry"));
        assert!(runner.run(&CommandSpec::new("poetry")).is_err());
        assert_eq!(runner.command_lines(), vec!["gcloud version", "gcloud version"]);
    }

    #[test]
    fn test_scripted_prompter_falls_back_to_defaults() {
        let prompter = ScriptedPrompter::new().with_confirms(&[false]).with_inputs(&["svc"]);
        assert!(!prompter.confirm("a?", true).unwrap());
        assert!(prompter.confirm("b?", true).unwrap());
        assert_eq!(prompter.input("name", None).unwrap(), "svc");
        assert_eq!(prompter.input("region", Some("us-central1")).unwrap(), "us-central1");
        assert_eq!(prompter.questions().len(), 4);
    }
}
