use primavent_core::config::{is_well_formed_bot_token, AppConfig, LoadOptions};
use primavent_core::Catalog;
use secrecy::ExposeSecret;
use serde::Serialize;

use crate::commands::{to_json, CommandResult, EXIT_CHECKS_FAILED};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

impl DoctorCheck {
    fn pass(name: &'static str, details: impl Into<String>) -> Self {
        Self { name, status: CheckStatus::Pass, details: details.into() }
    }

    fn fail(name: &'static str, details: impl Into<String>) -> Self {
        Self { name, status: CheckStatus::Fail, details: details.into() }
    }

    fn skipped(name: &'static str) -> Self {
        Self {
            name,
            status: CheckStatus::Skipped,
            details: "skipped because configuration did not load".to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(json_output: bool) -> CommandResult {
    let report = build_report();
    let exit_code = if report.overall_status == CheckStatus::Pass { 0 } else { EXIT_CHECKS_FAILED };

    let output =
        if json_output { to_json("doctor", &report, true) } else { render_human(&report) };
    CommandResult { exit_code, output }
}

fn build_report() -> DoctorReport {
    let checks = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => vec![
            DoctorCheck::pass("config_validation", "configuration loaded and validated"),
            check_bot_token(&config),
            check_catalog(&config),
        ],
        Err(error) => vec![
            DoctorCheck::fail("config_validation", error.to_string()),
            DoctorCheck::skipped("telegram_token_shape"),
            DoctorCheck::skipped("catalog_readiness"),
        ],
    };

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    DoctorReport {
        overall_status: if all_pass { CheckStatus::Pass } else { CheckStatus::Fail },
        summary: if all_pass {
            "doctor: all readiness checks passed".to_string()
        } else {
            "doctor: one or more readiness checks failed".to_string()
        },
        checks,
    }
}

fn check_bot_token(config: &AppConfig) -> DoctorCheck {
    if is_well_formed_bot_token(config.telegram.bot_token.expose_secret()) {
        DoctorCheck::pass("telegram_token_shape", "token has the `<bot id>:<secret>` shape")
    } else {
        DoctorCheck::fail("telegram_token_shape", "token does not look like a Bot API token")
    }
}

fn check_catalog(config: &AppConfig) -> DoctorCheck {
    let (loaded, source) = match &config.catalog.path {
        Some(path) => (Catalog::load(path), path.display().to_string()),
        None => (Ok(Catalog::builtin()), "builtin".to_string()),
    };

    match loaded {
        Ok(catalog) if catalog.product_count() == 0 => DoctorCheck::fail(
            "catalog_readiness",
            format!("catalog `{source}` has no orderable products"),
        ),
        Ok(catalog) => DoctorCheck::pass(
            "catalog_readiness",
            format!(
                "catalog `{source}` has {} categories and {} products",
                catalog.list_categories().len(),
                catalog.product_count()
            ),
        ),
        Err(error) => DoctorCheck::fail("catalog_readiness", error.to_string()),
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = vec![report.summary.clone()];

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}
