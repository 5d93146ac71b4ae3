use thiserror::Error;

use crate::flows::states::{
    CheckoutAction, CheckoutEvent, ConversationState, FlowContext, TransitionOutcome,
};

pub trait FlowDefinition {
    fn transition(
        &self,
        current: &ConversationState,
        event: &CheckoutEvent,
        context: &FlowContext,
    ) -> Result<TransitionOutcome, FlowTransitionError>;
}

#[derive(Clone, Debug, Default)]
pub struct CheckoutFlow;

impl FlowDefinition for CheckoutFlow {
    fn transition(
        &self,
        current: &ConversationState,
        event: &CheckoutEvent,
        context: &FlowContext,
    ) -> Result<TransitionOutcome, FlowTransitionError> {
        transition_checkout(current, event, context)
    }
}

pub struct FlowEngine<F> {
    flow: F,
}

impl<F> FlowEngine<F>
where
    F: FlowDefinition,
{
    pub fn new(flow: F) -> Self {
        Self { flow }
    }

    pub fn apply(
        &self,
        current: &ConversationState,
        event: &CheckoutEvent,
        context: &FlowContext,
    ) -> Result<TransitionOutcome, FlowTransitionError> {
        self.flow.transition(current, event, context)
    }
}

impl Default for FlowEngine<CheckoutFlow> {
    fn default() -> Self {
        Self::new(CheckoutFlow)
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FlowTransitionError {
    #[error("invalid transition from {state:?} using event {event:?}")]
    InvalidTransition { state: ConversationState, event: CheckoutEvent },
}

fn transition_checkout(
    current: &ConversationState,
    event: &CheckoutEvent,
    context: &FlowContext,
) -> Result<TransitionOutcome, FlowTransitionError> {
    use CheckoutAction::{
        AcknowledgeCancellation, ClearCart, ConfirmOrder, NotifyCartEmpty, PromptForConfirmation,
        PromptForContactInfo,
    };
    use CheckoutEvent::{CancelRequested, CheckoutRequested, ConfirmRequested, ContactInfoReceived};
    use ConversationState::{AwaitingConfirmation, AwaitingContactInfo, Idle};

    let (to, actions) = match (current, event) {
        (Idle, CheckoutRequested) if context.cart_size == 0 => (Idle, vec![NotifyCartEmpty]),
        (Idle, CheckoutRequested) => (AwaitingContactInfo, vec![PromptForContactInfo]),
        (AwaitingContactInfo, ContactInfoReceived(text)) => {
            (AwaitingConfirmation { contact_info: text.clone() }, vec![PromptForConfirmation])
        }
        (AwaitingConfirmation { contact_info }, ConfirmRequested) => {
            (Idle, vec![ConfirmOrder { contact_info: contact_info.clone() }, ClearCart])
        }
        (AwaitingConfirmation { .. }, CancelRequested) => (Idle, vec![AcknowledgeCancellation]),
        _ => {
            return Err(FlowTransitionError::InvalidTransition {
                state: current.clone(),
                event: event.clone(),
            });
        }
    };

    Ok(TransitionOutcome { from: current.clone(), to, event: event.clone(), actions })
}

#[cfg(test)]
mod tests {
    use crate::flows::engine::{CheckoutFlow, FlowEngine, FlowTransitionError};
    use crate::flows::states::{
        CheckoutAction, CheckoutEvent, ConversationState, FlowContext,
    };

    #[test]
    fn checkout_happy_path_ends_idle_with_cart_cleared() {
        let engine = FlowEngine::new(CheckoutFlow);
        let mut state = ConversationState::Idle;

        state = engine
            .apply(&state, &CheckoutEvent::CheckoutRequested, &FlowContext::with_cart_size(2))
            .expect("idle -> awaiting contact info")
            .to;
        assert_eq!(state, ConversationState::AwaitingContactInfo);

        state = engine
            .apply(
                &state,
                &CheckoutEvent::ContactInfoReceived("+380991234567".to_owned()),
                &FlowContext::with_cart_size(2),
            )
            .expect("awaiting contact info -> awaiting confirmation")
            .to;
        assert_eq!(state.contact_info(), Some("+380991234567"));

        let confirmed = engine
            .apply(&state, &CheckoutEvent::ConfirmRequested, &FlowContext::with_cart_size(2))
            .expect("awaiting confirmation -> idle");
        assert_eq!(confirmed.to, ConversationState::Idle);
        assert_eq!(
            confirmed.actions,
            vec![
                CheckoutAction::ConfirmOrder { contact_info: "+380991234567".to_owned() },
                CheckoutAction::ClearCart,
            ]
        );
    }

    #[test]
    fn checkout_with_empty_cart_stays_idle() {
        let engine = FlowEngine::default();
        let outcome = engine
            .apply(&ConversationState::Idle, &CheckoutEvent::CheckoutRequested, &FlowContext::default())
            .expect("empty cart is a handled outcome");

        assert_eq!(outcome.to, ConversationState::Idle);
        assert!(!outcome.state_changed());
        assert_eq!(outcome.actions, vec![CheckoutAction::NotifyCartEmpty]);
    }

    #[test]
    fn cancel_returns_to_idle_without_clearing_cart() {
        let engine = FlowEngine::default();
        let outcome = engine
            .apply(
                &ConversationState::AwaitingConfirmation { contact_info: "mail@example.com".into() },
                &CheckoutEvent::CancelRequested,
                &FlowContext::with_cart_size(1),
            )
            .expect("cancel is allowed while awaiting confirmation");

        assert_eq!(outcome.to, ConversationState::Idle);
        assert!(outcome.to.contact_info().is_none());
        assert!(!outcome.actions.contains(&CheckoutAction::ClearCart));
    }

    #[test]
    fn undefined_transitions_are_rejected() {
        let engine = FlowEngine::default();
        let cases = [
            (ConversationState::Idle, CheckoutEvent::ConfirmRequested),
            (ConversationState::Idle, CheckoutEvent::CancelRequested),
            (ConversationState::Idle, CheckoutEvent::ContactInfoReceived("x".into())),
            (ConversationState::AwaitingContactInfo, CheckoutEvent::ConfirmRequested),
            (ConversationState::AwaitingContactInfo, CheckoutEvent::CheckoutRequested),
            (
                ConversationState::AwaitingConfirmation { contact_info: "x".into() },
                CheckoutEvent::ContactInfoReceived("y".into()),
            ),
        ];

        for (state, event) in cases {
            let error = engine
                .apply(&state, &event, &FlowContext::with_cart_size(1))
                .expect_err("transition must be rejected");
            assert_eq!(error, FlowTransitionError::InvalidTransition { state, event });
        }
    }

    #[test]
    fn replay_is_deterministic_for_same_event_sequence() {
        let engine = FlowEngine::default();
        let events = [
            CheckoutEvent::CheckoutRequested,
            CheckoutEvent::ContactInfoReceived("call me".to_owned()),
            CheckoutEvent::CancelRequested,
            CheckoutEvent::CheckoutRequested,
        ];

        let run = |engine: &FlowEngine<CheckoutFlow>| {
            let mut state = ConversationState::Idle;
            let mut actions = Vec::new();
            for event in &events {
                let outcome = engine
                    .apply(&state, event, &FlowContext::with_cart_size(1))
                    .expect("deterministic run");
                actions.push(outcome.actions);
                state = outcome.to;
            }
            (state, actions)
        };

        let first = run(&engine);
        let second = run(&engine);

        assert_eq!(first, second);
        assert_eq!(first.0, ConversationState::AwaitingContactInfo);
    }
}
