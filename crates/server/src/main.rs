mod bootstrap;
mod health;

use anyhow::Result;
use primavent_core::config::{AppConfig, LoadOptions};

fn init_logging(config: &AppConfig) {
    use primavent_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    run().await
}

pub async fn run() -> Result<()> {
    let config = AppConfig::load(LoadOptions::default())?;
    init_logging(&config);

    let app = bootstrap::bootstrap_with_config(config)?;

    if app.config.server.health_enabled {
        health::spawn(
            &app.config.server.bind_address,
            app.config.server.health_check_port,
            health::HealthState::new(
                app.catalog.clone(),
                app.carts.clone(),
                app.conversations.clone(),
            ),
        )
        .await?;
    }

    tracing::info!(
        event_name = "system.server.started",
        correlation_id = "bootstrap",
        categories = app.catalog.list_categories().len(),
        "primavent-server started"
    );

    tokio::select! {
        result = app.runner.start() => {
            result?;
            tracing::warn!(
                event_name = "system.server.runner_stopped",
                correlation_id = "bootstrap",
                "telegram runner stopped; waiting for shutdown signal"
            );
            wait_for_shutdown().await?;
        }
        result = wait_for_shutdown() => result?,
    }

    tracing::info!(
        event_name = "system.server.stopping",
        correlation_id = "shutdown",
        "primavent-server stopping"
    );

    Ok(())
}

async fn wait_for_shutdown() -> Result<()> {
    tokio::signal::ctrl_c().await?;
    Ok(())
}
