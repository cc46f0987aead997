//! Status output for long-running commands.
//!
//! Interactive commands print progress as it happens, between prompts. A captured
//! console records the same lines without printing them.

use crate::process::{CommandSpec, ProcessOutput};
use owo_colors::OwoColorize;
use std::io::IsTerminal;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Heading,
    Success,
    Warning,
    Error,
}

/// Color only on a TTY with NO_COLOR unset.
pub fn color_enabled() -> bool {
    std::io::stdout().is_terminal()
        && std::io::stderr().is_terminal()
        && std::env::var_os("NO_COLOR").is_none()
}

#[derive(Debug)]
pub struct Console {
    echo: bool,
    color: bool,
    lines: Mutex<Vec<(Tone, String)>>,
}

impl Console {
    /// Prints to the terminal as lines are emitted.
    pub fn terminal() -> Self {
        Self {
            echo: true,
            color: color_enabled(),
            lines: Mutex::new(Vec::new()),
        }
    }

    /// Records lines only.
    pub fn captured() -> Self {
        Self {
            echo: false,
            color: false,
            lines: Mutex::new(Vec::new()),
        }
    }

    fn emit(&self, tone: Tone, text: String) {
        if self.echo {
            let rendered = if self.color {
                render(tone, &text)
            } else {
                text.clone()
            };
            match tone {
                Tone::Error => eprintln!("{}", rendered),
                _ => println!("{}", rendered),
            }
        }
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push((tone, text));
    }

    pub fn plain(&self, text: impl Into<String>) {
        self.emit(Tone::Plain, text.into());
    }

    pub fn heading(&self, text: impl Into<String>) {
        self.emit(Tone::Heading, text.into());
    }

    pub fn success(&self, text: impl Into<String>) {
        self.emit(Tone::Success, text.into());
    }

    pub fn warning(&self, text: impl Into<String>) {
        self.emit(Tone::Warning, text.into());
    }

    pub fn error(&self, text: impl Into<String>) {
        self.emit(Tone::Error, text.into());
    }

    /// `Executing: <command line>`
    pub fn executing(&self, spec: &CommandSpec) {
        self.plain(format!("Executing: {}", spec));
    }

    /// Echo captured streams; stderr is shown as an error when the command failed.
    pub fn process_output(&self, output: &ProcessOutput) {
        if !output.stdout.trim().is_empty() {
            self.plain(output.stdout.trim_end().to_string());
        }
        if !output.stderr.trim().is_empty() {
            let stderr = output.stderr.trim_end().to_string();
            if output.success() {
                self.warning(stderr);
            } else {
                self.error(stderr);
            }
        }
    }

    pub fn lines(&self) -> Vec<(Tone, String)> {
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Every emitted line joined with newlines.
    pub fn text(&self) -> String {
        self.lines()
            .into_iter()
            .map(|(_, line)| line)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Colorize one line for a terminal.
pub fn render(tone: Tone, text: &str) -> String {
    match tone {
        Tone::Plain => text.to_string(),
        Tone::Heading => format!("{}", text.bold()),
        Tone::Success => format!("{}", text.green()),
        Tone::Warning => format!("{}", text.yellow()),
        Tone::Error => format!("{}", text.red()),
    }
}

/// [`render`] when colors are enabled, the bare text otherwise.
pub fn paint(tone: Tone, text: &str) -> String {
    if color_enabled() {
        render(tone, text)
    } else {
        text.to_string()
    }
}
