use async_trait::async_trait;

use crate::domain::cart::CartEntry;
use crate::domain::product::Product;
use crate::domain::user::UserId;
use crate::flows::states::ConversationState;

pub mod memory;

pub use memory::{InMemoryCartStore, InMemoryConversationStore};

/// Per-user ordered cart. Every operation succeeds; an unknown user has an
/// empty cart.
#[async_trait]
pub trait CartStore: Send + Sync {
    async fn add(&self, user_id: UserId, product: Product);
    async fn get(&self, user_id: UserId) -> Vec<CartEntry>;
    async fn clear(&self, user_id: UserId);
    async fn active_carts(&self) -> usize;
}

/// Per-user checkout progress. An unknown user is `Idle`.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    async fn get(&self, user_id: UserId) -> ConversationState;
    async fn set(&self, user_id: UserId, state: ConversationState);
    async fn reset(&self, user_id: UserId);
    async fn pending_checkouts(&self) -> usize;
}
