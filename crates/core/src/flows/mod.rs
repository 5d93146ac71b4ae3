pub mod engine;
pub mod states;

pub use engine::{CheckoutFlow, FlowDefinition, FlowEngine, FlowTransitionError};
pub use states::{CheckoutAction, CheckoutEvent, ConversationState, FlowContext, TransitionOutcome};
