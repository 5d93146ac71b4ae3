use serde::{Deserialize, Serialize};

/// Per-user checkout progress. Contact details exist only while the order
/// waits for confirmation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConversationState {
    #[default]
    Idle,
    AwaitingContactInfo,
    AwaitingConfirmation {
        contact_info: String,
    },
}

impl ConversationState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn contact_info(&self) -> Option<&str> {
        match self {
            Self::AwaitingConfirmation { contact_info } => Some(contact_info),
            Self::Idle | Self::AwaitingContactInfo => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::AwaitingContactInfo => "awaiting_contact_info",
            Self::AwaitingConfirmation { .. } => "awaiting_confirmation",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckoutEvent {
    CheckoutRequested,
    ContactInfoReceived(String),
    ConfirmRequested,
    CancelRequested,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct FlowContext {
    pub cart_size: usize,
}

impl FlowContext {
    pub fn with_cart_size(cart_size: usize) -> Self {
        Self { cart_size }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckoutAction {
    NotifyCartEmpty,
    PromptForContactInfo,
    PromptForConfirmation,
    ConfirmOrder { contact_info: String },
    ClearCart,
    AcknowledgeCancellation,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionOutcome {
    pub from: ConversationState,
    pub to: ConversationState,
    pub event: CheckoutEvent,
    pub actions: Vec<CheckoutAction>,
}

impl TransitionOutcome {
    pub fn state_changed(&self) -> bool {
        self.from != self.to
    }
}
