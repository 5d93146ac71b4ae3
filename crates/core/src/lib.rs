//! Storefront core for the Prima Vent bot.
//!
//! Holds everything the dialogue layer needs that is independent of the chat
//! platform: the product catalog, per-user cart and conversation stores, the
//! checkout flow engine, configuration, and the domain error taxonomy.

pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;
pub mod flows;
pub mod store;

pub use catalog::{Catalog, CatalogError, Category};
pub use domain::cart::CartEntry;
pub use domain::product::{Product, ProductId};
pub use domain::user::UserId;
pub use errors::DomainError;
pub use flows::{
    CheckoutAction, CheckoutEvent, CheckoutFlow, ConversationState, FlowContext, FlowEngine,
    FlowTransitionError, TransitionOutcome,
};
pub use store::{CartStore, ConversationStore, InMemoryCartStore, InMemoryConversationStore};
