use thiserror::Error;

use crate::flows::FlowTransitionError;

/// Lookup misses and rejected checkout steps. None of these are faults: the
/// dialogue layer substitutes a user-facing notice or drops the event.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("unknown catalog category `{0}`")]
    UnknownCategory(String),
    #[error("unknown product `{0}`")]
    UnknownProduct(String),
    #[error("cart is empty")]
    EmptyCart,
    #[error(transparent)]
    FlowTransition(#[from] FlowTransitionError),
}

impl DomainError {
    /// Notice shown to the user in place of the failed lookup. Rejected
    /// transitions have none and are ignored.
    pub fn user_message(&self) -> Option<&'static str> {
        match self {
            Self::UnknownCategory(_) => Some("Товари в цій категорії відсутні."),
            Self::UnknownProduct(_) => Some("Товар не знайдено."),
            Self::EmptyCart => Some("Ваш кошик порожній."),
            Self::FlowTransition(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DomainError;
    use crate::flows::{CheckoutEvent, ConversationState, FlowTransitionError};

    #[test]
    fn not_found_errors_carry_user_messages() {
        assert_eq!(
            DomainError::UnknownProduct("x".into()).user_message(),
            Some("Товар не знайдено.")
        );
        assert_eq!(DomainError::EmptyCart.user_message(), Some("Ваш кошик порожній."));
    }

    #[test]
    fn rejected_transitions_are_silent() {
        let error = DomainError::from(FlowTransitionError::InvalidTransition {
            state: ConversationState::Idle,
            event: CheckoutEvent::ConfirmRequested,
        });

        assert!(error.user_message().is_none());
    }
}
