use std::sync::Arc;
use std::time::Instant;

use primavent_core::config::{AppConfig, LoadOptions};
use primavent_core::{
    CartStore, Catalog, ConversationState, ConversationStore, InMemoryCartStore,
    InMemoryConversationStore, Product, UserId,
};
use primavent_telegram::callbacks::CallbackAction;
use primavent_telegram::events::{EventContext, EventKind, InboundEvent, OutboundAction};
use primavent_telegram::menus::MenuLabel;
use primavent_telegram::router::{DialogueRouter, RouterSettings};
use serde::Serialize;

use crate::commands::{to_json, CommandResult, EXIT_CHECKS_FAILED};

const SMOKE_USER: UserId = UserId(1);
const SMOKE_CONTACT: &str = "+380991234567";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum SmokeStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct SmokeCheck {
    name: &'static str,
    status: SmokeStatus,
    elapsed_ms: u64,
    message: String,
}

#[derive(Debug, Serialize)]
struct SmokeReport {
    command: &'static str,
    status: SmokeStatus,
    summary: String,
    total_elapsed_ms: u64,
    checks: Vec<SmokeCheck>,
}

pub fn run() -> CommandResult {
    let started = Instant::now();
    let mut checks = Vec::new();

    let config = match timed_check(|| AppConfig::load(LoadOptions::default())) {
        Ok((elapsed_ms, config)) => {
            checks.push(passed("config_validation", elapsed_ms, "configuration loaded and validated"));
            config
        }
        Err((elapsed_ms, error)) => {
            checks.push(failed("config_validation", elapsed_ms, error.to_string()));
            checks.push(skipped("catalog_load"));
            checks.push(skipped("dialogue_checkout"));
            return finalize_report(checks, elapsed_since(started));
        }
    };

    let orderable = match timed_check(|| load_orderable_catalog(&config)) {
        Ok((elapsed_ms, (catalog, product))) => {
            checks.push(passed(
                "catalog_load",
                elapsed_ms,
                format!("{} products available", catalog.product_count()),
            ));
            (catalog, product)
        }
        Err((elapsed_ms, message)) => {
            checks.push(failed("catalog_load", elapsed_ms, message));
            checks.push(skipped("dialogue_checkout"));
            return finalize_report(checks, elapsed_since(started));
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            checks.push(failed(
                "dialogue_checkout",
                0,
                format!("failed to initialize async runtime: {error}"),
            ));
            return finalize_report(checks, elapsed_since(started));
        }
    };

    let (catalog, product) = orderable;
    let dialogue_started = Instant::now();
    let outcome = runtime.block_on(scripted_checkout(catalog, product));
    checks.push(match outcome {
        Ok(message) => passed("dialogue_checkout", elapsed_since(dialogue_started), message),
        Err(message) => failed("dialogue_checkout", elapsed_since(dialogue_started), message),
    });

    finalize_report(checks, elapsed_since(started))
}

fn load_orderable_catalog(config: &AppConfig) -> Result<(Catalog, Product), String> {
    let catalog = match &config.catalog.path {
        Some(path) => Catalog::load(path).map_err(|error| error.to_string())?,
        None => Catalog::builtin(),
    };

    let product = catalog
        .list_categories()
        .iter()
        .find_map(|category| category.products.first())
        .cloned()
        .ok_or_else(|| "catalog has no orderable products".to_string())?;

    Ok((catalog, product))
}

/// Walks one user from greeting to confirmed order against in-memory stores.
async fn scripted_checkout(catalog: Catalog, product: Product) -> Result<String, String> {
    let carts = Arc::new(InMemoryCartStore::default());
    let conversations = Arc::new(InMemoryConversationStore::default());
    let router = DialogueRouter::new(
        Arc::new(catalog),
        carts.clone(),
        conversations.clone(),
        RouterSettings::default(),
    );

    let script = [
        EventKind::Command { name: "start".to_string(), args: String::new() },
        EventKind::TextMessage { body: MenuLabel::Catalog.text().to_string() },
        callback(CallbackAction::AddProduct(product.id.clone())),
        EventKind::TextMessage { body: MenuLabel::Cart.text().to_string() },
        EventKind::TextMessage { body: MenuLabel::Checkout.text().to_string() },
        EventKind::TextMessage { body: SMOKE_CONTACT.to_string() },
        callback(CallbackAction::Confirm),
    ];

    let steps = script.len();
    let mut last_actions = Vec::new();
    for (step, kind) in script.into_iter().enumerate() {
        let update_id = step as i64 + 1;
        let event = InboundEvent { update_id, user_id: SMOKE_USER, kind };
        let actions =
            router.dispatch(&event, &EventContext::for_update(update_id)).await.into_actions();
        if actions.is_empty() {
            return Err(format!("step {update_id} produced no reply"));
        }
        last_actions = actions;
    }

    let confirmed = last_actions.iter().any(|action| {
        matches!(action, OutboundAction::SendText { body, .. } if body.contains(SMOKE_CONTACT))
    });
    if !confirmed {
        return Err("confirmation reply did not echo the contact details".to_string());
    }
    if !carts.get(SMOKE_USER).await.is_empty() {
        return Err("cart was not cleared after confirmation".to_string());
    }
    if conversations.get(SMOKE_USER).await != ConversationState::Idle {
        return Err("conversation did not return to idle".to_string());
    }

    Ok(format!("ordered `{}` and confirmed checkout in {steps} steps", product.name))
}

fn callback(action: CallbackAction) -> EventKind {
    EventKind::ButtonCallback { callback_id: "smoke".to_string(), token: action.token() }
}

fn timed_check<T, E>(check: impl FnOnce() -> Result<T, E>) -> Result<(u64, T), (u64, E)> {
    let started = Instant::now();
    match check() {
        Ok(value) => Ok((elapsed_since(started), value)),
        Err(error) => Err((elapsed_since(started), error)),
    }
}

fn elapsed_since(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

fn passed(name: &'static str, elapsed_ms: u64, message: impl Into<String>) -> SmokeCheck {
    SmokeCheck { name, status: SmokeStatus::Pass, elapsed_ms, message: message.into() }
}

fn failed(name: &'static str, elapsed_ms: u64, message: impl Into<String>) -> SmokeCheck {
    SmokeCheck { name, status: SmokeStatus::Fail, elapsed_ms, message: message.into() }
}

fn skipped(name: &'static str) -> SmokeCheck {
    SmokeCheck {
        name,
        status: SmokeStatus::Skipped,
        elapsed_ms: 0,
        message: "skipped due to previous failure".to_string(),
    }
}

fn finalize_report(checks: Vec<SmokeCheck>, total_elapsed_ms: u64) -> CommandResult {
    let passed = checks.iter().filter(|check| check.status == SmokeStatus::Pass).count();
    let total = checks.len();
    let failed = checks.iter().any(|check| check.status == SmokeStatus::Fail);

    let report = SmokeReport {
        command: "smoke",
        status: if failed { SmokeStatus::Fail } else { SmokeStatus::Pass },
        summary: format!("smoke: {passed}/{total} checks passed in {total_elapsed_ms}ms"),
        total_elapsed_ms,
        checks,
    };

    let human = report.summary.clone();
    let machine = to_json("smoke", &report, false);

    CommandResult {
        exit_code: if failed { EXIT_CHECKS_FAILED } else { 0 },
        output: format!("{human}\n{machine}"),
    }
}
