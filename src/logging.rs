//! Logging System
//!
//! Structured logging on top of `tracing`. The default format renders each event
//! as one Cloud Logging compatible JSON line:
//!
//! ```json
//! {"message":"...","severity":"INFO","timestamp":"...","sourceLocation":{"file":"...","line":1,"function":"..."}}
//! ```
//!
//! plus any caller-supplied fields (`info!(secret_id = "x", "...")`) that do not
//! collide with the standard keys.

use crate::error::BootstrapError;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{fmt as fmt_layer, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Keys owned by the standard record shape; extra fields never override them.
const RESERVED_KEYS: [&str; 4] = ["message", "severity", "timestamp", "sourceLocation"];

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Whether logging is enabled (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log level: trace, debug, info, warn, error, off
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: json, text (default: json)
    #[serde(default = "default_format")]
    pub format: String,

    /// Output destination: stdout, stderr (default: stderr)
    #[serde(default = "default_output")]
    pub output: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "json".to_string()
}

fn default_output() -> String {
    "stderr".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            level: default_log_level(),
            format: default_format(),
            output: default_output(),
        }
    }
}

/// Initialize the logging system.
///
/// Priority order (highest to lowest):
/// 1. Environment variables (GEN_BOOTSTRAP_LOG, GEN_BOOTSTRAP_LOG_FORMAT, GEN_BOOTSTRAP_LOG_OUTPUT)
/// 2. The passed configuration
/// 3. Defaults
///
/// Returns `Ok(false)` when a global subscriber is already installed; repeated
/// calls never register a second one.
pub fn init_logging(config: &LoggingConfig) -> Result<bool, BootstrapError> {
    if !config.enabled {
        return Ok(Registry::default()
            .with(EnvFilter::new("off"))
            .try_init()
            .is_ok());
    }

    let filter = build_env_filter(config)?;
    let format = determine_format(config)?;
    let writer = determine_writer(config)?;

    let base = Registry::default().with(filter);
    let installed = if format == "json" {
        base.with(
            fmt_layer::layer()
                .event_format(CloudLoggingFormat)
                .with_writer(writer),
        )
        .try_init()
    } else {
        base.with(
            fmt_layer::layer()
                .with_target(true)
                .with_timer(ChronoUtc::rfc_3339())
                .with_writer(writer),
        )
        .try_init()
    };

    Ok(installed.is_ok())
}

fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter, BootstrapError> {
    if let Ok(filter) = EnvFilter::try_from_env("GEN_BOOTSTRAP_LOG") {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.level)
        .map_err(|e| BootstrapError::ConfigError(format!("Invalid log level '{}': {}", config.level, e)))
}

fn determine_format(config: &LoggingConfig) -> Result<String, BootstrapError> {
    if let Ok(format) = std::env::var("GEN_BOOTSTRAP_LOG_FORMAT") {
        if format == "json" || format == "text" {
            return Ok(format);
        }
    }
    match config.format.as_str() {
        "json" | "text" => Ok(config.format.clone()),
        other => Err(BootstrapError::ConfigError(format!(
            "Invalid log format: {} (must be 'json' or 'text')",
            other
        ))),
    }
}

fn determine_writer(config: &LoggingConfig) -> Result<BoxMakeWriter, BootstrapError> {
    let output = std::env::var("GEN_BOOTSTRAP_LOG_OUTPUT").unwrap_or_else(|_| config.output.clone());
    match output.as_str() {
        "stdout" => Ok(BoxMakeWriter::new(std::io::stdout)),
        "stderr" => Ok(BoxMakeWriter::new(std::io::stderr)),
        other => Err(BootstrapError::ConfigError(format!(
            "Invalid log output: {} (must be 'stdout' or 'stderr')",
            other
        ))),
    }
}

/// Cloud Logging severity name for a tracing level.
pub fn severity(level: &Level) -> &'static str {
    match *level {
        Level::TRACE | Level::DEBUG => "DEBUG",
        Level::INFO => "INFO",
        Level::WARN => "WARNING",
        Level::ERROR => "ERROR",
    }
}

/// Source location of a log record.
#[derive(Debug, Clone, Default)]
pub struct SourceLocation<'a> {
    pub file: Option<&'a str>,
    pub line: Option<u32>,
    pub function: Option<&'a str>,
}

/// Build one structured log entry.
pub fn build_log_entry(
    message: &str,
    level: &Level,
    timestamp: chrono::DateTime<Utc>,
    location: SourceLocation<'_>,
    extra: Map<String, Value>,
) -> Value {
    let mut entry = Map::new();
    entry.insert("message".to_string(), Value::String(message.to_string()));
    entry.insert("severity".to_string(), Value::String(severity(level).to_string()));
    entry.insert(
        "timestamp".to_string(),
        Value::String(timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)),
    );
    entry.insert(
        "sourceLocation".to_string(),
        json!({
            "file": location.file,
            "line": location.line,
            "function": location.function,
        }),
    );
    for (key, value) in extra {
        if !RESERVED_KEYS.contains(&key.as_str()) {
            entry.insert(key, value);
        }
    }
    Value::Object(entry)
}

/// Event formatter producing Cloud Logging JSON lines.
pub struct CloudLoggingFormat;

impl<S, N> FormatEvent<S, N> for CloudLoggingFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let metadata = event.metadata();
        let mut visitor = FieldCollector::default();
        event.record(&mut visitor);

        let entry = build_log_entry(
            &visitor.message,
            metadata.level(),
            Utc::now(),
            SourceLocation {
                file: metadata.file(),
                line: metadata.line(),
                function: metadata.module_path().or(Some(metadata.target())),
            },
            visitor.fields,
        );
        let line = serde_json::to_string(&entry).map_err(|_| fmt::Error)?;
        writeln!(writer, "{}", line)
    }
}

/// Collects the `message` field and every other field as JSON values.
#[derive(Default)]
struct FieldCollector {
    message: String,
    fields: Map<String, Value>,
}

impl FieldCollector {
    fn insert(&mut self, field: &Field, value: Value) {
        if field.name() == "message" {
            self.message = match value {
                Value::String(s) => s,
                other => other.to_string(),
            };
        } else {
            self.fields.insert(field.name().to_string(), value);
        }
    }
}

impl Visit for FieldCollector {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.insert(field, Value::String(format!("{:?}", value)));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.insert(field, Value::String(value.to_string()));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, json!(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, json!(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.insert(field, json!(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, json!(value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn capture<F: FnOnce()>(f: F) -> Vec<Value> {
        let buffer = SharedBuffer::default();
        let writer = buffer.clone();
        let subscriber = Registry::default().with(
            fmt_layer::layer()
                .event_format(CloudLoggingFormat)
                .with_writer(move || writer.clone()),
        );
        tracing::subscriber::with_default(subscriber, f);
        let bytes = buffer.0.lock().unwrap().clone();
        String::from_utf8(bytes)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_default_logging_config() {
        let config = LoggingConfig::default();
        assert!(config.enabled);
        assert_eq!(config.level, "info");
        assert_eq!(config.format, "json");
        assert_eq!(config.output, "stderr");
    }

    #[test]
    fn test_event_renders_single_json_line() {
        let entries = capture(|| {
            tracing::warn!(secret_id = "api-key", attempt = 2, "checksum verification failed");
        });
        assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        assert_eq!(entry["message"], "checksum verification failed");
        assert_eq!(entry["severity"], "WARNING");
        assert_eq!(entry["secret_id"], "api-key");
        assert_eq!(entry["attempt"], 2);
        assert!(entry["timestamp"].as_str().unwrap().ends_with('Z'));
        assert!(entry["sourceLocation"]["file"]
            .as_str()
            .unwrap()
            .ends_with("logging.rs"));
        assert!(entry["sourceLocation"]["line"].as_u64().is_some());
    }

    #[test]
    fn test_extra_fields_do_not_override_standard_keys() {
        let mut extra = Map::new();
        extra.insert("severity".to_string(), json!("BOGUS"));
        extra.insert("request_id".to_string(), json!("abc"));
        let entry = build_log_entry(
            "hello",
            &Level::ERROR,
            Utc::now(),
            SourceLocation::default(),
            extra,
        );
        assert_eq!(entry["severity"], "ERROR");
        assert_eq!(entry["request_id"], "abc");
    }

    #[test]
    fn test_severity_mapping() {
        assert_eq!(severity(&Level::TRACE), "DEBUG");
        assert_eq!(severity(&Level::INFO), "INFO");
        assert_eq!(severity(&Level::WARN), "WARNING");
    }

    #[test]
    fn test_invalid_format_rejected() {
        let config = LoggingConfig {
            format: "xml".to_string(),
            ..LoggingConfig::default()
        };
        if std::env::var("GEN_BOOTSTRAP_LOG_FORMAT").is_err() {
            assert!(determine_format(&config).is_err());
        }
    }
}
