//! Current-time lookup tool.

use super::descriptor::ToolParameter;
use super::native::NativeRegistration;
use chrono::{DateTime, FixedOffset, Utc};
use serde_json::{json, Value};
use tracing::info;

/// Binding and tool name.
pub const BINDING: &str = "get_current_time";

const DOCUMENTATION: &str = "Gets the current time in a specified timezone.
If no timezone is specified, defaults to UTC.

Args:
    timezone: 'UTC' or a fixed UTC offset such as '+05:30' or 'UTC-08:00'.
              Named zones (e.g. 'America/New_York') are answered with UTC.
Returns:
    The current time as an RFC 3339 string, or an explanatory message.";

pub fn registration() -> NativeRegistration {
    NativeRegistration {
        binding: BINDING.to_string(),
        function: get_current_time,
        documentation: DOCUMENTATION.to_string(),
        parameters: vec![ToolParameter::optional("timezone", "str", json!("UTC"))
            .with_description("Timezone name or UTC offset")],
    }
}

/// Native entry point: `{"timezone": "..."}`.
pub fn get_current_time(args: &Value) -> anyhow::Result<String> {
    let timezone = args
        .get("timezone")
        .and_then(Value::as_str)
        .unwrap_or("UTC");
    info!(timezone, "Tool 'get_current_time' called");
    let result = current_time_at(timezone, Utc::now());
    info!(result = %result, "Returning time");
    Ok(result)
}

/// Render `now` in the requested timezone.
pub fn current_time_at(timezone: &str, now: DateTime<Utc>) -> String {
    let trimmed = timezone.trim();
    if trimmed.eq_ignore_ascii_case("UTC") || trimmed.is_empty() {
        return now.to_rfc3339();
    }
    match parse_offset(trimmed) {
        Some(offset) => now.with_timezone(&offset).to_rfc3339(),
        None => format!(
            "Timezone '{}' support is illustrative. Current UTC time: {}",
            timezone,
            now.to_rfc3339()
        ),
    }
}

/// Parse `+HH:MM`, `-HHMM`, `UTC+HH:MM` style offsets.
fn parse_offset(input: &str) -> Option<FixedOffset> {
    let rest = input
        .strip_prefix("UTC")
        .or_else(|| input.strip_prefix("utc"))
        .unwrap_or(input);
    let (sign, digits) = match rest.chars().next()? {
        '+' => (1, &rest[1..]),
        '-' => (-1, &rest[1..]),
        _ => return None,
    };
    let digits: String = digits.chars().filter(|c| *c != ':').collect();
    if digits.is_empty() || digits.len() > 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let (hours, minutes) = if digits.len() <= 2 {
        (digits.parse::<i32>().ok()?, 0)
    } else {
        let split = digits.len() - 2;
        (
            digits[..split].parse::<i32>().ok()?,
            digits[split..].parse::<i32>().ok()?,
        )
    };
    if hours > 14 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}
