pub mod catalog;
pub mod config;
pub mod doctor;
pub mod smoke;

use serde::Serialize;

/// Exit code used when configuration fails to load or validate.
pub const EXIT_CONFIG: u8 = 2;
/// Exit code used when the catalog cannot be loaded.
pub const EXIT_CATALOG: u8 = 3;
/// Exit code used when smoke or doctor checks fail.
pub const EXIT_CHECKS_FAILED: u8 = 6;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome<'a> {
    command: &'a str,
    status: &'static str,
    error_class: &'a str,
    message: String,
}

impl CommandResult {
    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let outcome = CommandOutcome {
            command,
            status: "error",
            error_class,
            message: message.into(),
        };
        Self { exit_code, output: to_json(command, &outcome, false) }
    }
}

/// Serializes a report, degrading to a minimal hand-built error object so the
/// command still prints valid JSON.
pub(crate) fn to_json<T: Serialize>(command: &str, payload: &T, pretty: bool) -> String {
    let rendered =
        if pretty { serde_json::to_string_pretty(payload) } else { serde_json::to_string(payload) };

    rendered.unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"{}\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            escape_json(command),
            escape_json(&error.to_string())
        )
    })
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
