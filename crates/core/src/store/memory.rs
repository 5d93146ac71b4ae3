use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::domain::cart::CartEntry;
use crate::domain::product::Product;
use crate::domain::user::UserId;
use crate::flows::states::ConversationState;

use super::{CartStore, ConversationStore};

#[derive(Default)]
pub struct InMemoryCartStore {
    carts: RwLock<HashMap<UserId, Vec<CartEntry>>>,
}

#[async_trait::async_trait]
impl CartStore for InMemoryCartStore {
    async fn add(&self, user_id: UserId, product: Product) {
        let mut carts = self.carts.write().await;
        carts.entry(user_id).or_default().push(CartEntry::from(product));
    }

    async fn get(&self, user_id: UserId) -> Vec<CartEntry> {
        let carts = self.carts.read().await;
        carts.get(&user_id).cloned().unwrap_or_default()
    }

    async fn clear(&self, user_id: UserId) {
        let mut carts = self.carts.write().await;
        carts.remove(&user_id);
    }

    async fn active_carts(&self) -> usize {
        let carts = self.carts.read().await;
        carts.values().filter(|entries| !entries.is_empty()).count()
    }
}

#[derive(Default)]
pub struct InMemoryConversationStore {
    states: RwLock<HashMap<UserId, ConversationState>>,
}

#[async_trait::async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn get(&self, user_id: UserId) -> ConversationState {
        let states = self.states.read().await;
        states.get(&user_id).cloned().unwrap_or_default()
    }

    async fn set(&self, user_id: UserId, state: ConversationState) {
        let mut states = self.states.write().await;
        if state.is_idle() {
            states.remove(&user_id);
        } else {
            states.insert(user_id, state);
        }
    }

    async fn reset(&self, user_id: UserId) {
        let mut states = self.states.write().await;
        states.remove(&user_id);
    }

    async fn pending_checkouts(&self) -> usize {
        let states = self.states.read().await;
        states.len()
    }
}
