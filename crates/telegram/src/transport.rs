use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use primavent_core::config::TelegramConfig;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::api::{ApiCall, ApiResponse, GetUpdatesRequest, Update, User};
use crate::events::{InboundEvent, OutboundAction};
use crate::polling::{BotTransport, TransportError};

#[derive(Default)]
struct PollState {
    offset: Option<i64>,
    buffered: VecDeque<InboundEvent>,
}

/// Bot API client speaking long polling over HTTPS.
pub struct TelegramTransport {
    client: Client,
    endpoint: String,
    poll_timeout_secs: u64,
    state: Mutex<PollState>,
}

impl TelegramTransport {
    pub fn new(config: &TelegramConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.poll_timeout_secs + config.request_timeout_secs))
            .build()
            .map_err(|error| TransportError::Connect(error.without_url().to_string()))?;

        Ok(Self {
            client,
            endpoint: format!(
                "{}/bot{}",
                config.api_base_url.trim_end_matches('/'),
                config.bot_token.expose_secret()
            ),
            poll_timeout_secs: config.poll_timeout_secs,
            state: Mutex::new(PollState::default()),
        })
    }

    async fn call<B, T>(&self, method: &str, body: &B) -> Result<T, String>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        // Errors are stripped of the URL because it embeds the bot token.
        let response = self
            .client
            .post(format!("{}/{method}", self.endpoint))
            .json(body)
            .send()
            .await
            .map_err(|error| format!("{method} request failed: {}", error.without_url()))?;

        let status = response.status();
        let envelope: ApiResponse<T> = response.json().await.map_err(|error| {
            format!("{method} returned undecodable body ({status}): {}", error.without_url())
        })?;

        if !envelope.ok {
            return Err(format!(
                "{method} rejected ({}): {}",
                envelope.error_code.unwrap_or_else(|| i64::from(status.as_u16())),
                envelope.description.unwrap_or_else(|| "no description".to_owned())
            ));
        }

        envelope.result.ok_or_else(|| format!("{method} returned no result"))
    }
}

#[async_trait]
impl BotTransport for TelegramTransport {
    async fn connect(&self) -> Result<(), TransportError> {
        let me: User =
            self.call("getMe", &serde_json::json!({})).await.map_err(TransportError::Connect)?;
        info!(
            event_name = "telegram.connected",
            bot_id = me.id,
            bot_username = me.username.as_deref().unwrap_or("unknown"),
            "telegram credentials accepted"
        );
        Ok(())
    }

    async fn next_event(&self) -> Result<Option<InboundEvent>, TransportError> {
        let mut state = self.state.lock().await;
        loop {
            if let Some(event) = state.buffered.pop_front() {
                return Ok(Some(event));
            }

            let request = GetUpdatesRequest::new(state.offset, self.poll_timeout_secs);
            let updates: Vec<Update> =
                self.call("getUpdates", &request).await.map_err(TransportError::Receive)?;
            debug!(
                event_name = "telegram.updates_polled",
                count = updates.len(),
                offset = state.offset.unwrap_or_default(),
                "polled telegram updates"
            );

            for update in updates {
                state.offset = Some(update.update_id + 1);
                let update_id = update.update_id;
                match update.into_event() {
                    Some(event) => state.buffered.push_back(event),
                    None => debug!(update_id, "skipping update without text or callback data"),
                }
            }
        }
    }

    async fn deliver(&self, action: &OutboundAction) -> Result<(), TransportError> {
        let call = ApiCall::from(action);
        let method = call.method();
        let result: Result<serde_json::Value, String> = match &call {
            ApiCall::SendMessage(request) => self.call(method, request).await,
            ApiCall::AnswerCallbackQuery(request) => self.call(method, request).await,
        };
        result.map(|_| ()).map_err(TransportError::Deliver)
    }

    async fn disconnect(&self) -> Result<(), TransportError> {
        let mut state = self.state.lock().await;
        state.buffered.clear();
        Ok(())
    }
}
