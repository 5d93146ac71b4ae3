//! Telegram Integration - long-polling storefront bot
//!
//! This crate provides the chat interface for the Prima Vent shop:
//! - **Events** (`events`) - Inbound commands, texts and button presses; outbound replies
//! - **Callbacks** (`callbacks`) - Typed button tokens (`category_*`, `add_*`, `confirm_order`, ...)
//! - **Menus** (`menus`) - Reply keyboards and inline button grids
//! - **Replies** (`replies`) - Message texts for every dialogue step
//! - **Router** (`router`) - Dispatches events against the catalog, cart and checkout flow
//! - **Polling** (`polling`) - Event loop with reconnection logic
//! - **Transport** (`transport`, `api`) - Bot API client over HTTPS
//!
//! # Architecture
//!
//! ```text
//! Bot API updates → PollingRunner → DialogueRouter → Catalog / CartStore / FlowEngine
//!                        ↓
//!               sendMessage / answerCallbackQuery ← OutboundAction
//! ```

pub mod api;
pub mod callbacks;
pub mod events;
pub mod menus;
pub mod polling;
pub mod replies;
pub mod router;
pub mod transport;
