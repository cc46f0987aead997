//! gen-bootstrap CLI Binary

use clap::Parser;
use gen_bootstrap::config::ConfigLoader;
use gen_bootstrap::console::{paint, Console, Tone};
use gen_bootstrap::interactive::stdin_prompter;
use gen_bootstrap::logging::{init_logging, LoggingConfig};
use gen_bootstrap::process::SystemRunner;
use gen_bootstrap::tooling::cli::{Cli, CliContext};
use std::process;
use std::sync::Arc;
use std::time::Duration;

fn main() {
    let cli = Cli::parse();

    let mut logging = LoggingConfig::default();
    if let Some(level) = &cli.log_level {
        logging.level = level.clone();
    }
    if let Some(format) = &cli.log_format {
        logging.format = format.clone();
    }
    if let Err(e) = init_logging(&logging) {
        eprintln!("{}", paint(Tone::Error, &format!("Error initializing logging: {}", e)));
        process::exit(1);
    }

    let settings = match ConfigLoader::load(&cli.workspace) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{}", paint(Tone::Error, &format!("Error loading configuration: {}", e)));
            process::exit(1);
        }
    };

    let runner = SystemRunner::new(settings.command_timeout_secs.map(Duration::from_secs));
    let context = CliContext::new(
        cli.workspace.clone(),
        settings,
        Arc::new(runner),
        stdin_prompter(),
        Console::terminal(),
    );

    match context.execute(&cli.command) {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
        }
        Err(e) => {
            eprintln!("{}", paint(Tone::Error, &format!("Error: {}", e)));
            process::exit(e.exit_code());
        }
    }
}
