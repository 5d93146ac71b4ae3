use primavent_core::UserId;

use crate::menus::Menu;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InboundEvent {
    pub update_id: i64,
    pub user_id: UserId,
    pub kind: EventKind,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EventKind {
    Command { name: String, args: String },
    TextMessage { body: String },
    ButtonCallback { callback_id: String, token: String },
}

impl EventKind {
    pub fn event_type(&self) -> EventType {
        match self {
            Self::Command { .. } => EventType::Command,
            Self::TextMessage { .. } => EventType::TextMessage,
            Self::ButtonCallback { .. } => EventType::ButtonCallback,
        }
    }

    pub fn callback_id(&self) -> Option<&str> {
        match self {
            Self::ButtonCallback { callback_id, .. } => Some(callback_id),
            Self::Command { .. } | Self::TextMessage { .. } => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventType {
    Command,
    TextMessage,
    ButtonCallback,
}

impl EventType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Command => "command",
            Self::TextMessage => "text_message",
            Self::ButtonCallback => "button_callback",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutboundAction {
    SendText { user_id: UserId, body: String, menu: Option<Menu> },
    AnswerCallback { callback_id: String, text: Option<String> },
}

impl OutboundAction {
    pub fn answers_callback(&self, callback_id: &str) -> bool {
        matches!(self, Self::AnswerCallback { callback_id: id, .. } if id == callback_id)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventContext {
    pub correlation_id: String,
}

impl EventContext {
    pub fn for_update(update_id: i64) -> Self {
        Self { correlation_id: format!("update-{update_id}") }
    }
}

impl Default for EventContext {
    fn default() -> Self {
        Self { correlation_id: "unknown-correlation-id".to_owned() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HandlerResult {
    Responded(Vec<OutboundAction>),
    Ignored,
}

impl HandlerResult {
    pub fn into_actions(self) -> Vec<OutboundAction> {
        match self {
            Self::Responded(actions) => actions,
            Self::Ignored => Vec::new(),
        }
    }
}
