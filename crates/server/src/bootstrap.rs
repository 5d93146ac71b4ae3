use std::sync::Arc;

use primavent_core::config::{AppConfig, ConfigError};
use primavent_core::{Catalog, CatalogError, InMemoryCartStore, InMemoryConversationStore};
use primavent_telegram::polling::{BotTransport, PollingRunner, ReconnectPolicy, TransportError};
use primavent_telegram::router::{DialogueRouter, RouterSettings};
use primavent_telegram::transport::TelegramTransport;
use thiserror::Error;
use tracing::info;

pub struct Application {
    pub config: AppConfig,
    pub catalog: Arc<Catalog>,
    pub carts: Arc<InMemoryCartStore>,
    pub conversations: Arc<InMemoryConversationStore>,
    pub router: Arc<DialogueRouter>,
    pub runner: PollingRunner,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("catalog load failed: {0}")]
    Catalog(#[from] CatalogError),
    #[error("telegram client setup failed: {0}")]
    Transport(#[from] TransportError),
}

pub fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );
    let transport = Arc::new(TelegramTransport::new(&config.telegram)?);
    assemble(config, transport)
}

pub fn load_catalog(config: &AppConfig) -> Result<Catalog, CatalogError> {
    match &config.catalog.path {
        Some(path) => Catalog::load(path),
        None => Ok(Catalog::builtin()),
    }
}

pub(crate) fn assemble(
    config: AppConfig,
    transport: Arc<dyn BotTransport>,
) -> Result<Application, BootstrapError> {
    let catalog = Arc::new(load_catalog(&config)?);
    info!(
        event_name = "system.bootstrap.catalog_loaded",
        correlation_id = "bootstrap",
        source = if config.catalog.path.is_some() { "file" } else { "builtin" },
        categories = catalog.list_categories().len(),
        products = catalog.product_count(),
        "catalog loaded"
    );

    let carts = Arc::new(InMemoryCartStore::default());
    let conversations = Arc::new(InMemoryConversationStore::default());
    let router = Arc::new(DialogueRouter::new(
        catalog.clone(),
        carts.clone(),
        conversations.clone(),
        RouterSettings { reply_to_unrecognized: config.bot.reply_to_unrecognized },
    ));
    let runner = PollingRunner::new(transport, router.clone(), ReconnectPolicy::default());

    Ok(Application { config, catalog, carts, conversations, router, runner })
}
