//! Token counting and trimming through the tokenizer CLI.
//!
//! Text is written to the tokenizer's stdin: `ttok -m <model>` prints a count,
//! `ttok -m <model> -t <n>` prints the first `n` tokens. Failures are logged and
//! reported as `0` / empty text.

use crate::config::Settings;
use crate::process::{CommandSpec, ProcessRunner};
use tracing::{error, warn};

pub struct Tokenizer<'a> {
    runner: &'a dyn ProcessRunner,
    command: String,
    model: String,
}

impl<'a> Tokenizer<'a> {
    pub fn new(runner: &'a dyn ProcessRunner, command: &str, model: &str) -> Self {
        Self {
            runner,
            command: command.to_string(),
            model: model.to_string(),
        }
    }

    pub fn from_settings(settings: &Settings, runner: &'a dyn ProcessRunner) -> Self {
        Self::new(runner, &settings.tokenizer_command, &settings.tokenizer_model)
    }

    fn spec(&self, text: &str) -> CommandSpec {
        CommandSpec::new(self.command.clone())
            .args(["-m", self.model.as_str()])
            .stdin(text)
    }

    fn run(&self, spec: &CommandSpec) -> Option<String> {
        match self.runner.run(spec) {
            Ok(output) if output.success() => Some(output.stdout),
            Ok(output) => {
                warn!(
                    command = %spec,
                    exit_code = output.exit_code,
                    stderr = %output.stderr.trim(),
                    "Tokenizer failed"
                );
                None
            }
            Err(e) => {
                error!(command = %spec, error = %e, "Tokenizer could not run");
                None
            }
        }
    }

    /// Number of tokens in `text`.
    pub fn count_text_tokens(&self, text: &str) -> usize {
        if text.is_empty() {
            return 0;
        }
        let spec = self.spec(text);
        let Some(stdout) = self.run(&spec) else {
            return 0;
        };
        stdout.trim().parse().unwrap_or_else(|_| {
            warn!(output = %stdout.trim(), "Tokenizer returned a non-numeric count");
            0
        })
    }

    /// Prefix of `text` holding at most `max_tokens` tokens.
    pub fn trim_text_to_tokens(&self, text: &str, max_tokens: usize) -> String {
        if text.is_empty() || max_tokens == 0 {
            return String::new();
        }
        let spec = self.spec(text).args(["-t".to_string(), max_tokens.to_string()]);
        match self.run(&spec) {
            Some(stdout) => strip_newline(stdout),
            None => String::new(),
        }
    }
}

/// Drop the single newline the tokenizer appends.
fn strip_newline(mut out: String) -> String {
    if out.ends_with('\n') {
        out.pop();
        if out.ends_with('\r') {
            out.pop();
        }
    }
    out
}
