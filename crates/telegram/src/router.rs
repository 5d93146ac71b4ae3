use std::sync::Arc;

use primavent_core::{
    CartStore, Catalog, CheckoutAction, CheckoutEvent, CheckoutFlow, ConversationState,
    ConversationStore, DomainError, FlowContext, FlowEngine, ProductId, UserId,
};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::callbacks::{BackTarget, CallbackAction};
use crate::events::{EventContext, EventKind, HandlerResult, InboundEvent, OutboundAction};
use crate::menus::MenuLabel;
use crate::replies::{self, Reply};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RouterSettings {
    pub reply_to_unrecognized: bool,
}

impl Default for RouterSettings {
    fn default() -> Self {
        Self { reply_to_unrecognized: true }
    }
}

/// Handler selected for an inbound event. Selection depends only on the event
/// shape and the sender's conversation state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    Start,
    Home,
    ShowCatalog,
    ShowCart,
    InfoPage(MenuLabel),
    Checkout(CheckoutEvent),
    Callback(CallbackAction),
    Unrecognized,
}

impl Route {
    pub fn select(kind: &EventKind, state: &ConversationState) -> Self {
        match kind {
            EventKind::Command { name, .. } => match name.as_str() {
                "start" => Self::Start,
                "help" => Self::InfoPage(MenuLabel::Help),
                "catalog" => Self::ShowCatalog,
                "cart" => Self::ShowCart,
                _ => Self::Unrecognized,
            },
            EventKind::TextMessage { body } => {
                if let Some(label) = MenuLabel::from_text(body) {
                    return Self::for_label(label);
                }
                match state {
                    ConversationState::AwaitingContactInfo => {
                        Self::Checkout(CheckoutEvent::ContactInfoReceived(body.clone()))
                    }
                    _ => Self::Unrecognized,
                }
            }
            EventKind::ButtonCallback { token, .. } => match CallbackAction::parse(token) {
                Some(CallbackAction::Confirm) => Self::Checkout(CheckoutEvent::ConfirmRequested),
                Some(CallbackAction::Cancel) => Self::Checkout(CheckoutEvent::CancelRequested),
                Some(CallbackAction::Back(BackTarget::Main)) => Self::Home,
                Some(CallbackAction::Back(BackTarget::Catalog)) => Self::ShowCatalog,
                Some(action) => Self::Callback(action),
                None => Self::Unrecognized,
            },
        }
    }

    fn for_label(label: MenuLabel) -> Self {
        match label {
            MenuLabel::Home => Self::Home,
            MenuLabel::Catalog => Self::ShowCatalog,
            MenuLabel::Cart => Self::ShowCart,
            MenuLabel::Checkout => Self::Checkout(CheckoutEvent::CheckoutRequested),
            info => Self::InfoPage(info),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Home => "home",
            Self::ShowCatalog => "catalog",
            Self::ShowCart => "cart",
            Self::InfoPage(_) => "info_page",
            Self::Checkout(_) => "checkout",
            Self::Callback(action) => action.kind(),
            Self::Unrecognized => "unrecognized",
        }
    }
}

/// Maps inbound events to replies, mutating the cart and conversation stores
/// along the way. Dispatch is serialized so the two stores change together.
pub struct DialogueRouter {
    catalog: Arc<Catalog>,
    carts: Arc<dyn CartStore>,
    conversations: Arc<dyn ConversationStore>,
    engine: FlowEngine<CheckoutFlow>,
    settings: RouterSettings,
    dispatch_lock: Mutex<()>,
}

impl DialogueRouter {
    pub fn new(
        catalog: Arc<Catalog>,
        carts: Arc<dyn CartStore>,
        conversations: Arc<dyn ConversationStore>,
        settings: RouterSettings,
    ) -> Self {
        Self {
            catalog,
            carts,
            conversations,
            engine: FlowEngine::default(),
            settings,
            dispatch_lock: Mutex::new(()),
        }
    }

    pub async fn dispatch(&self, event: &InboundEvent, ctx: &EventContext) -> HandlerResult {
        let _guard = self.dispatch_lock.lock().await;
        let user_id = event.user_id;
        let state = self.conversations.get(user_id).await;
        let route = Route::select(&event.kind, &state);

        debug!(
            event_name = "router.dispatch",
            correlation_id = %ctx.correlation_id,
            user_id = %user_id,
            event_type = event.kind.event_type().as_str(),
            route = route.name(),
            state = state.label(),
            "dispatching inbound event"
        );

        match route {
            Route::Start => respond(user_id, replies::welcome()),
            Route::Home => respond(user_id, replies::home()),
            Route::ShowCatalog => respond(user_id, replies::catalog_prompt(&self.catalog)),
            Route::ShowCart => {
                let entries = self.carts.get(user_id).await;
                respond(user_id, replies::cart_summary(&entries))
            }
            Route::InfoPage(label) => match replies::info_page(label) {
                Some(reply) => respond(user_id, reply),
                None => self.unrecognized(user_id),
            },
            Route::Checkout(checkout_event) => {
                self.checkout(user_id, &state, checkout_event, ctx).await
            }
            Route::Callback(CallbackAction::Category(key)) => {
                respond(user_id, replies::product_list(&self.catalog, &key))
            }
            Route::Callback(CallbackAction::AddProduct(product_id)) => {
                self.add_product(event, &product_id, ctx).await
            }
            Route::Callback(_) | Route::Unrecognized => self.unrecognized(user_id),
        }
    }

    async fn add_product(
        &self,
        event: &InboundEvent,
        product_id: &ProductId,
        ctx: &EventContext,
    ) -> HandlerResult {
        let Some(callback_id) = event.kind.callback_id() else {
            return HandlerResult::Ignored;
        };

        let toast = match self.catalog.find_product(product_id) {
            Some(product) => {
                self.carts.add(event.user_id, product.clone()).await;
                info!(
                    event_name = "cart.product_added",
                    correlation_id = %ctx.correlation_id,
                    user_id = %event.user_id,
                    product_id = %product_id,
                    "product added to cart"
                );
                replies::added_to_cart(product)
            }
            None => {
                warn!(
                    event_name = "cart.unknown_product",
                    correlation_id = %ctx.correlation_id,
                    user_id = %event.user_id,
                    product_id = %product_id,
                    "callback referenced a product outside the catalog"
                );
                replies::product_not_found(product_id.as_str())
            }
        };

        HandlerResult::Responded(vec![OutboundAction::AnswerCallback {
            callback_id: callback_id.to_owned(),
            text: Some(toast),
        }])
    }

    async fn checkout(
        &self,
        user_id: UserId,
        state: &ConversationState,
        checkout_event: CheckoutEvent,
        ctx: &EventContext,
    ) -> HandlerResult {
        let entries = self.carts.get(user_id).await;
        let context = FlowContext::with_cart_size(entries.len());

        let outcome = match self.engine.apply(state, &checkout_event, &context) {
            Ok(outcome) => outcome,
            Err(error) => {
                let error = DomainError::from(error);
                debug!(
                    event_name = "checkout.transition_ignored",
                    correlation_id = %ctx.correlation_id,
                    user_id = %user_id,
                    error = %error,
                    "checkout event not valid in current state"
                );
                return HandlerResult::Ignored;
            }
        };

        if outcome.state_changed() {
            info!(
                event_name = "checkout.transition",
                correlation_id = %ctx.correlation_id,
                user_id = %user_id,
                from = outcome.from.label(),
                to = outcome.to.label(),
                "checkout state changed"
            );
        }
        self.conversations.set(user_id, outcome.to.clone()).await;

        let mut actions = Vec::new();
        for action in outcome.actions {
            match action {
                CheckoutAction::NotifyCartEmpty => {
                    actions.push(replies::cart_empty().to(user_id));
                }
                CheckoutAction::PromptForContactInfo => {
                    actions.push(replies::checkout_prompt(&entries).to(user_id));
                }
                CheckoutAction::PromptForConfirmation => {
                    actions.push(replies::confirmation_prompt().to(user_id));
                }
                CheckoutAction::ConfirmOrder { contact_info } => {
                    info!(
                        event_name = "checkout.order_confirmed",
                        correlation_id = %ctx.correlation_id,
                        user_id = %user_id,
                        items = entries.len(),
                        "order confirmed"
                    );
                    actions.push(replies::order_confirmed(&contact_info).to(user_id));
                }
                CheckoutAction::ClearCart => self.carts.clear(user_id).await,
                CheckoutAction::AcknowledgeCancellation => {
                    actions.push(replies::order_cancelled().to(user_id));
                }
            }
        }

        HandlerResult::Responded(actions)
    }

    fn unrecognized(&self, user_id: UserId) -> HandlerResult {
        if self.settings.reply_to_unrecognized {
            respond(user_id, replies::unrecognized())
        } else {
            HandlerResult::Ignored
        }
    }
}

fn respond(user_id: UserId, reply: Reply) -> HandlerResult {
    HandlerResult::Responded(vec![reply.to(user_id)])
}
