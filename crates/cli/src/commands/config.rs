use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use primavent_core::config::{AppConfig, LoadOptions};
use secrecy::ExposeSecret;
use toml::Value;

use crate::commands::{CommandResult, EXIT_CONFIG};

struct Field {
    key: &'static str,
    value: String,
    env_keys: &'static [&'static str],
}

impl Field {
    fn new(key: &'static str, value: impl Into<String>, env_keys: &'static [&'static str]) -> Self {
        Self { key, value: value.into(), env_keys }
    }
}

pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult {
                exit_code: EXIT_CONFIG,
                output: format!("config validation failed: {error}"),
            }
        }
    };

    let file_path = detect_config_path();
    let file_doc = file_path.as_deref().and_then(load_config_file_doc);

    let mut lines =
        vec!["effective config (source precedence: env > file > default):".to_string()];
    lines.extend(fields(&config).into_iter().map(|field| {
        let source = field_source(&field, file_doc.as_ref(), file_path.as_deref());
        format!("- {} = {} (source: {source})", field.key, field.value)
    }));

    CommandResult { exit_code: 0, output: lines.join("\n") }
}

fn fields(config: &AppConfig) -> Vec<Field> {
    vec![
        Field::new(
            "telegram.bot_token",
            redact_token(config.telegram.bot_token.expose_secret()),
            &["PRIMAVENT_TELEGRAM_BOT_TOKEN", "API_TOKEN"],
        ),
        Field::new(
            "telegram.api_base_url",
            config.telegram.api_base_url.clone(),
            &["PRIMAVENT_TELEGRAM_API_BASE_URL"],
        ),
        Field::new(
            "telegram.poll_timeout_secs",
            config.telegram.poll_timeout_secs.to_string(),
            &["PRIMAVENT_TELEGRAM_POLL_TIMEOUT_SECS"],
        ),
        Field::new(
            "telegram.request_timeout_secs",
            config.telegram.request_timeout_secs.to_string(),
            &["PRIMAVENT_TELEGRAM_REQUEST_TIMEOUT_SECS"],
        ),
        Field::new(
            "bot.reply_to_unrecognized",
            config.bot.reply_to_unrecognized.to_string(),
            &["PRIMAVENT_BOT_REPLY_TO_UNRECOGNIZED"],
        ),
        Field::new(
            "catalog.path",
            config
                .catalog
                .path
                .as_ref()
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "<builtin>".to_string()),
            &["PRIMAVENT_CATALOG_PATH"],
        ),
        Field::new(
            "server.bind_address",
            config.server.bind_address.clone(),
            &["PRIMAVENT_SERVER_BIND_ADDRESS"],
        ),
        Field::new(
            "server.health_check_port",
            config.server.health_check_port.to_string(),
            &["PRIMAVENT_SERVER_HEALTH_CHECK_PORT"],
        ),
        Field::new(
            "server.health_enabled",
            config.server.health_enabled.to_string(),
            &["PRIMAVENT_SERVER_HEALTH_ENABLED"],
        ),
        Field::new(
            "logging.level",
            config.logging.level.clone(),
            &["PRIMAVENT_LOGGING_LEVEL", "PRIMAVENT_LOG_LEVEL"],
        ),
        Field::new(
            "logging.format",
            format!("{:?}", config.logging.format),
            &["PRIMAVENT_LOGGING_FORMAT", "PRIMAVENT_LOG_FORMAT"],
        ),
    ]
}

fn detect_config_path() -> Option<PathBuf> {
    [PathBuf::from("primavent.toml"), PathBuf::from("config/primavent.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn load_config_file_doc(path: &Path) -> Option<Value> {
    fs::read_to_string(path).ok()?.parse::<Value>().ok()
}

fn field_source(field: &Field, file_doc: Option<&Value>, file_path: Option<&Path>) -> String {
    if let Some(env_key) = field.env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    let in_file = file_doc.is_some_and(|doc| {
        field.key.split('.').try_fold(doc, |current, key| current.get(key)).is_some()
    });
    if in_file {
        let file_path = file_path
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "config file".to_string());
        return format!("file ({file_path})");
    }

    "default".to_string()
}

/// Keeps the public bot id and hides the secret half of the token.
pub fn redact_token(token: &str) -> String {
    let trimmed = token.trim();
    if trimmed.is_empty() {
        return "<empty>".to_string();
    }

    match trimmed.split_once(':') {
        Some((bot_id, _)) if !bot_id.is_empty() => format!("{bot_id}:***"),
        _ => "<redacted>".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::redact_token;

    #[test]
    fn redaction_keeps_only_bot_id() {
        assert_eq!(redact_token("123456:AAE-secret"), "123456:***");
        assert_eq!(redact_token("   "), "<empty>");
        assert_eq!(redact_token("opaque"), "<redacted>");
    }
}
