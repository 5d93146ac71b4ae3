//! Bot API wire types and their mapping onto the platform-neutral event model.

use primavent_core::UserId;
use serde::{Deserialize, Serialize};

use crate::events::{EventKind, InboundEvent, OutboundAction};
use crate::menus::Menu;

#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
    pub error_code: Option<i64>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub is_bot: bool,
    #[serde(default)]
    pub first_name: String,
    pub username: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub from: Option<User>,
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: User,
    pub data: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
    pub callback_query: Option<CallbackQuery>,
}

impl Update {
    /// Text messages and button presses become events; everything else
    /// (stickers, edits, joins) yields `None`.
    pub fn into_event(self) -> Option<InboundEvent> {
        let update_id = self.update_id;

        if let Some(query) = self.callback_query {
            let token = query.data?;
            return Some(InboundEvent {
                update_id,
                user_id: UserId(query.from.id),
                kind: EventKind::ButtonCallback { callback_id: query.id, token },
            });
        }

        let message = self.message?;
        let text = message.text?;
        let user_id = message.from.map(|user| user.id).unwrap_or(message.chat.id);

        Some(InboundEvent { update_id, user_id: UserId(user_id), kind: classify_text(text) })
    }
}

fn classify_text(text: String) -> EventKind {
    let Some(command_line) = text.trim_start().strip_prefix('/') else {
        return EventKind::TextMessage { body: text };
    };

    let (head, args) = match command_line.split_once(char::is_whitespace) {
        Some((head, args)) => (head, args.trim()),
        None => (command_line, ""),
    };
    let name = head.split('@').next().unwrap_or_default();
    if name.is_empty() {
        return EventKind::TextMessage { body: text };
    }

    EventKind::Command { name: name.to_ascii_lowercase(), args: args.to_owned() }
}

#[derive(Debug, Serialize)]
pub struct GetUpdatesRequest {
    pub offset: Option<i64>,
    pub timeout: u64,
    pub allowed_updates: Vec<&'static str>,
}

impl GetUpdatesRequest {
    pub fn new(offset: Option<i64>, timeout: u64) -> Self {
        Self { offset, timeout, allowed_updates: vec!["message", "callback_query"] }
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct KeyboardButton {
    pub text: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct InlineKeyboardButton {
    pub text: String,
    pub callback_data: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ReplyMarkup {
    Keyboard { keyboard: Vec<Vec<KeyboardButton>>, resize_keyboard: bool },
    Inline { inline_keyboard: Vec<Vec<InlineKeyboardButton>> },
}

impl From<&Menu> for ReplyMarkup {
    fn from(menu: &Menu) -> Self {
        match menu {
            Menu::Reply(keyboard) => Self::Keyboard {
                keyboard: keyboard
                    .rows
                    .iter()
                    .map(|row| row.iter().map(|text| KeyboardButton { text: text.clone() }).collect())
                    .collect(),
                resize_keyboard: true,
            },
            Menu::Inline(keyboard) => Self::Inline {
                inline_keyboard: keyboard
                    .rows
                    .iter()
                    .map(|row| {
                        row.iter()
                            .map(|button| InlineKeyboardButton {
                                text: button.label.clone(),
                                callback_data: button.action.token(),
                            })
                            .collect()
                    })
                    .collect(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SendMessageRequest {
    pub chat_id: i64,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<ReplyMarkup>,
}

#[derive(Debug, Serialize)]
pub struct AnswerCallbackQueryRequest {
    pub callback_query_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Bot API call for one outbound action: method name plus JSON body.
pub enum ApiCall {
    SendMessage(SendMessageRequest),
    AnswerCallbackQuery(AnswerCallbackQueryRequest),
}

impl ApiCall {
    pub fn method(&self) -> &'static str {
        match self {
            Self::SendMessage(_) => "sendMessage",
            Self::AnswerCallbackQuery(_) => "answerCallbackQuery",
        }
    }
}

impl From<&OutboundAction> for ApiCall {
    fn from(action: &OutboundAction) -> Self {
        match action {
            OutboundAction::SendText { user_id, body, menu } => Self::SendMessage(SendMessageRequest {
                chat_id: user_id.0,
                text: body.clone(),
                reply_markup: menu.as_ref().map(ReplyMarkup::from),
            }),
            OutboundAction::AnswerCallback { callback_id, text } => {
                Self::AnswerCallbackQuery(AnswerCallbackQueryRequest {
                    callback_query_id: callback_id.clone(),
                    text: text.clone(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use primavent_core::UserId;
    use serde_json::json;

    use super::{ApiCall, ApiResponse, Update};
    use crate::events::{EventKind, OutboundAction};
    use crate::menus::{confirmation_menu, main_menu};

    fn parse_update(value: serde_json::Value) -> Update {
        serde_json::from_value(value).expect("update")
    }

    #[test]
    fn commands_strip_bot_mention_and_keep_args() {
        let update = parse_update(json!({
            "update_id": 7,
            "message": {
                "message_id": 1,
                "from": { "id": 42, "is_bot": false, "first_name": "Olena" },
                "chat": { "id": 42, "type": "private" },
                "text": "/start@PrimaVentBot promo spring"
            }
        }));

        let event = update.into_event().expect("event");

        assert_eq!(event.update_id, 7);
        assert_eq!(event.user_id, UserId(42));
        assert_eq!(
            event.kind,
            EventKind::Command { name: "start".to_owned(), args: "promo spring".to_owned() }
        );
    }

    #[test]
    fn plain_text_and_bare_slash_are_messages() {
        let text = parse_update(json!({
            "update_id": 8,
            "message": {
                "message_id": 2,
                "from": { "id": 42, "first_name": "Olena" },
                "chat": { "id": 42 },
                "text": "📦 Кошик"
            }
        }));
        let slash = parse_update(json!({
            "update_id": 9,
            "message": { "message_id": 3, "chat": { "id": 42 }, "text": "/" }
        }));

        assert_eq!(
            text.into_event().map(|event| event.kind),
            Some(EventKind::TextMessage { body: "📦 Кошик".to_owned() })
        );
        assert_eq!(
            slash.into_event().map(|event| event.kind),
            Some(EventKind::TextMessage { body: "/".to_owned() })
        );
    }

    #[test]
    fn callback_queries_carry_id_and_token() {
        let update = parse_update(json!({
            "update_id": 10,
            "callback_query": {
                "id": "4382",
                "from": { "id": 42, "is_bot": false, "first_name": "Olena" },
                "data": "add_lg_pc09sq"
            }
        }));

        assert_eq!(
            update.into_event().map(|event| event.kind),
            Some(EventKind::ButtonCallback {
                callback_id: "4382".to_owned(),
                token: "add_lg_pc09sq".to_owned()
            })
        );
    }

    #[test]
    fn updates_without_text_or_data_are_skipped() {
        let sticker = parse_update(json!({
            "update_id": 11,
            "message": { "message_id": 4, "chat": { "id": 42 } }
        }));
        let edited = parse_update(json!({ "update_id": 12, "edited_message": {} }));

        assert!(sticker.into_event().is_none());
        assert!(edited.into_event().is_none());
    }

    #[test]
    fn reply_keyboard_serializes_with_resize_flag() {
        let action = OutboundAction::SendText {
            user_id: UserId(42),
            body: "hi".to_owned(),
            menu: Some(main_menu()),
        };
        let ApiCall::SendMessage(request) = ApiCall::from(&action) else {
            panic!("expected sendMessage");
        };

        let body = serde_json::to_value(&request).expect("json");
        assert_eq!(body["chat_id"], 42);
        assert_eq!(body["reply_markup"]["resize_keyboard"], true);
        assert_eq!(body["reply_markup"]["keyboard"][0][0]["text"], "🏠 Головна");
    }

    #[test]
    fn inline_keyboard_serializes_callback_tokens() {
        let action = OutboundAction::SendText {
            user_id: UserId(42),
            body: "confirm?".to_owned(),
            menu: Some(confirmation_menu()),
        };
        let call = ApiCall::from(&action);
        assert_eq!(call.method(), "sendMessage");
        let ApiCall::SendMessage(request) = call else {
            panic!("expected sendMessage");
        };

        let body = serde_json::to_value(&request).expect("json");
        assert_eq!(body["reply_markup"]["inline_keyboard"][0][1]["callback_data"], "cancel_order");
    }

    #[test]
    fn empty_callback_answer_omits_text() {
        let action =
            OutboundAction::AnswerCallback { callback_id: "4382".to_owned(), text: None };
        let ApiCall::AnswerCallbackQuery(request) = ApiCall::from(&action) else {
            panic!("expected answerCallbackQuery");
        };

        assert_eq!(serde_json::to_value(&request).expect("json"), json!({ "callback_query_id": "4382" }));
    }

    #[test]
    fn error_envelopes_decode_description() {
        let response: ApiResponse<Vec<Update>> = serde_json::from_value(json!({
            "ok": false,
            "error_code": 401,
            "description": "Unauthorized"
        }))
        .expect("response");

        assert!(!response.ok);
        assert_eq!(response.error_code, Some(401));
        assert!(response.result.is_none());
    }
}
