use std::env;
use std::io::Write;
use std::sync::{Mutex, OnceLock};

use primavent_cli::commands::{catalog, config, doctor, smoke};
use serde_json::Value;

const VALID_TOKEN: (&str, &str) = ("PRIMAVENT_TELEGRAM_BOT_TOKEN", "123456:smoke-secret");

#[test]
fn smoke_returns_success_report_with_valid_env() {
    with_env(&[VALID_TOKEN], || {
        let result = smoke::run();
        assert_eq!(result.exit_code, 0, "expected successful smoke report: {}", result.output);

        let payload = parse_payload(last_line(&result.output));
        assert_eq!(payload["command"], "smoke");
        assert_eq!(payload["status"], "pass");
        assert_eq!(payload["checks"][2]["name"], "dialogue_checkout");
        assert_eq!(payload["checks"][2]["status"], "pass");
    });
}

#[test]
fn smoke_returns_failure_when_config_invalid() {
    with_env(&[], || {
        let result = smoke::run();
        assert_eq!(result.exit_code, 6, "expected smoke failure code");

        let payload = parse_payload(last_line(&result.output));
        assert_eq!(payload["command"], "smoke");
        assert_eq!(payload["status"], "fail");
        assert_eq!(payload["checks"][1]["status"], "skipped");
    });
}

#[test]
fn smoke_fails_when_catalog_has_nothing_to_order() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(file, "[[categories]]\nkey = \"heating\"\nlabel = \"Опалення\"\n").expect("write");
    let path = file.path().display().to_string();

    with_env(&[VALID_TOKEN, ("PRIMAVENT_CATALOG_PATH", path.as_str())], || {
        let result = smoke::run();
        assert_eq!(result.exit_code, 6);

        let payload = parse_payload(last_line(&result.output));
        assert_eq!(payload["checks"][1]["name"], "catalog_load");
        assert_eq!(payload["checks"][1]["status"], "fail");
    });
}

#[test]
fn doctor_reports_all_checks_passing_as_json() {
    with_env(&[VALID_TOKEN], || {
        let result = doctor::run(true);
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["overall_status"], "pass");
        assert_eq!(payload["checks"].as_array().map(Vec::len), Some(3));
    });
}

#[test]
fn doctor_skips_dependent_checks_without_token() {
    with_env(&[], || {
        let result = doctor::run(false);
        assert_eq!(result.exit_code, 6);
        assert!(result.output.contains("- [fail] config_validation"));
        assert!(result.output.contains("- [skip] catalog_readiness"));
    });
}

#[test]
fn config_redacts_token_and_attributes_alias_source() {
    with_env(&[("API_TOKEN", "987654:very-secret")], || {
        let result = config::run();
        assert_eq!(result.exit_code, 0);

        let output = result.output;
        assert!(output.contains("- telegram.bot_token = 987654:*** (source: env (API_TOKEN))"));
        assert!(output.contains("- catalog.path = <builtin> (source: default)"));
        assert!(!output.contains("very-secret"));
    });
}

#[test]
fn config_exits_with_config_code_when_token_missing() {
    with_env(&[], || {
        let result = config::run();

        assert_eq!(result.exit_code, 2);
        assert!(result.output.starts_with("config validation failed"));
    });
}

#[test]
fn catalog_dumps_builtin_categories() {
    let result = catalog::run(None);
    assert_eq!(result.exit_code, 0);

    let payload = parse_payload(&result.output);
    assert_eq!(payload["source"], "builtin");
    assert_eq!(payload["categories"][0]["key"], "air_conditioners");
    assert_eq!(payload["categories"][1]["products"][0]["id"], "vents_vut300");
}

#[test]
fn catalog_reports_missing_file() {
    let result = catalog::run(Some(std::path::Path::new("/nonexistent/catalog.toml")));
    assert_eq!(result.exit_code, 3);

    let payload = parse_payload(&result.output);
    assert_eq!(payload["status"], "error");
    assert_eq!(payload["error_class"], "catalog_load");
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn last_line(output: &str) -> &str {
    output.lines().last().unwrap_or_default()
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "API_TOKEN",
        "PRIMAVENT_TELEGRAM_BOT_TOKEN",
        "PRIMAVENT_TELEGRAM_API_BASE_URL",
        "PRIMAVENT_TELEGRAM_POLL_TIMEOUT_SECS",
        "PRIMAVENT_TELEGRAM_REQUEST_TIMEOUT_SECS",
        "PRIMAVENT_BOT_REPLY_TO_UNRECOGNIZED",
        "PRIMAVENT_CATALOG_PATH",
        "PRIMAVENT_SERVER_BIND_ADDRESS",
        "PRIMAVENT_SERVER_HEALTH_CHECK_PORT",
        "PRIMAVENT_SERVER_HEALTH_ENABLED",
        "PRIMAVENT_LOGGING_LEVEL",
        "PRIMAVENT_LOGGING_FORMAT",
        "PRIMAVENT_LOG_LEVEL",
        "PRIMAVENT_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
