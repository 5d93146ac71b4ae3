use std::{sync::Arc, time::Duration};

use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::events::{EventContext, InboundEvent, OutboundAction};
use crate::router::DialogueRouter;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("transport failed to connect: {0}")]
    Connect(String),
    #[error("transport read failed: {0}")]
    Receive(String),
    #[error("transport delivery failed: {0}")]
    Deliver(String),
    #[error("transport disconnect failed: {0}")]
    Disconnect(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self { max_retries: 5, base_delay_ms: 250, max_delay_ms: 5_000 }
    }
}

impl ReconnectPolicy {
    fn backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.min(16);
        let multiplier = 1_u64 << exponent;
        let delay_ms = self.base_delay_ms.saturating_mul(multiplier).min(self.max_delay_ms);
        Duration::from_millis(delay_ms)
    }
}

/// Source of inbound events and sink for replies. `next_event` returning
/// `None` means the stream ended cleanly.
#[async_trait]
pub trait BotTransport: Send + Sync {
    async fn connect(&self) -> Result<(), TransportError>;
    async fn next_event(&self) -> Result<Option<InboundEvent>, TransportError>;
    async fn deliver(&self, action: &OutboundAction) -> Result<(), TransportError>;
    async fn disconnect(&self) -> Result<(), TransportError>;
}

#[derive(Default)]
pub struct NoopTransport;

#[async_trait]
impl BotTransport for NoopTransport {
    async fn connect(&self) -> Result<(), TransportError> {
        Ok(())
    }

    async fn next_event(&self) -> Result<Option<InboundEvent>, TransportError> {
        Ok(None)
    }

    async fn deliver(&self, _action: &OutboundAction) -> Result<(), TransportError> {
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), TransportError> {
        Ok(())
    }
}

pub struct PollingRunner {
    transport: Arc<dyn BotTransport>,
    router: Arc<DialogueRouter>,
    reconnect_policy: ReconnectPolicy,
}

impl PollingRunner {
    pub fn new(
        transport: Arc<dyn BotTransport>,
        router: Arc<DialogueRouter>,
        reconnect_policy: ReconnectPolicy,
    ) -> Self {
        Self { transport, router, reconnect_policy }
    }

    pub async fn start(&self) -> Result<()> {
        let mut attempt = 0;
        loop {
            let mut processed = 0_u64;
            match self.connect_and_pump(attempt, &mut processed).await {
                Ok(()) => return Ok(()),
                Err(transport_error) => {
                    warn!(
                        attempt,
                        max_retries = self.reconnect_policy.max_retries,
                        processed,
                        error = %transport_error,
                        "telegram transport failed"
                    );

                    // A session that made progress earns a fresh retry budget.
                    if processed > 0 {
                        attempt = 0;
                    } else if attempt >= self.reconnect_policy.max_retries {
                        warn!(
                            max_retries = self.reconnect_policy.max_retries,
                            "telegram transport retries exhausted; continuing process without crash"
                        );
                        return Ok(());
                    }

                    let delay = self.reconnect_policy.backoff(attempt);
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    attempt += 1;
                }
            }
        }
    }

    async fn connect_and_pump(&self, attempt: u32, processed: &mut u64) -> Result<(), TransportError> {
        info!(attempt, "opening telegram transport connection");
        self.transport.connect().await?;
        info!(attempt, "telegram transport connected");

        loop {
            let Some(event) = self.transport.next_event().await? else {
                info!(attempt, "telegram update stream closed");
                self.transport.disconnect().await?;
                return Ok(());
            };
            *processed += 1;

            let context = EventContext::for_update(event.update_id);
            info!(
                event_name = "ingress.telegram.update_received",
                update_id = event.update_id,
                event_type = event.kind.event_type().as_str(),
                correlation_id = %context.correlation_id,
                user_id = %event.user_id,
                "received telegram update"
            );

            let mut actions = self.router.dispatch(&event, &context).await.into_actions();
            if let Some(callback_id) = event.kind.callback_id() {
                if !actions.iter().any(|action| action.answers_callback(callback_id)) {
                    actions.push(OutboundAction::AnswerCallback {
                        callback_id: callback_id.to_owned(),
                        text: None,
                    });
                }
            }

            for action in &actions {
                self.deliver(action, &context).await;
            }
        }
    }

    async fn deliver(&self, action: &OutboundAction, context: &EventContext) {
        match self.transport.deliver(action).await {
            Ok(()) => debug!(
                event_name = "egress.telegram.delivered",
                correlation_id = %context.correlation_id,
                action = action_name(action),
                "delivered outbound action"
            ),
            Err(error) => warn!(
                event_name = "egress.telegram.delivery_failed",
                correlation_id = %context.correlation_id,
                action = action_name(action),
                error = %error,
                "failed to deliver outbound action; dropping it"
            ),
        }
    }
}

fn action_name(action: &OutboundAction) -> &'static str {
    match action {
        OutboundAction::SendText { .. } => "send_text",
        OutboundAction::AnswerCallback { .. } => "answer_callback",
    }
}
