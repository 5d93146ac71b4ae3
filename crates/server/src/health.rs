use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use primavent_core::{CartStore, Catalog, ConversationStore};
use serde::Serialize;
use tracing::{error, info};

#[derive(Clone)]
pub struct HealthState {
    catalog: Arc<Catalog>,
    carts: Arc<dyn CartStore>,
    conversations: Arc<dyn ConversationStore>,
}

impl HealthState {
    pub fn new(
        catalog: Arc<Catalog>,
        carts: Arc<dyn CartStore>,
        conversations: Arc<dyn ConversationStore>,
    ) -> Self {
        Self { catalog, carts, conversations }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    pub categories: usize,
    pub products: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub active_carts: usize,
    pub pending_checkouts: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub catalog: CatalogStats,
    pub sessions: SessionStats,
    pub checked_at: String,
}

pub fn router(state: HealthState) -> Router {
    Router::new().route("/health", get(health)).with_state(state)
}

pub async fn spawn(bind_address: &str, port: u16, state: HealthState) -> std::io::Result<()> {
    let address = format!("{bind_address}:{port}");
    let listener = tokio::net::TcpListener::bind(&address).await?;

    info!(
        event_name = "system.health.start",
        correlation_id = "bootstrap",
        bind_address = %address,
        "health endpoint started"
    );

    tokio::spawn(async move {
        if let Err(error) = axum::serve(listener, router(state)).await {
            error!(
                event_name = "system.health.error",
                correlation_id = "bootstrap",
                error = %error,
                "health endpoint server terminated unexpectedly"
            );
        }
    });

    Ok(())
}

pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let catalog = CatalogStats {
        categories: state.catalog.list_categories().len(),
        products: state.catalog.product_count(),
    };
    let sessions = SessionStats {
        active_carts: state.carts.active_carts().await,
        pending_checkouts: state.conversations.pending_checkouts().await,
    };
    // An empty catalog still serves navigation but nothing can be ordered.
    let ready = catalog.products > 0;

    let payload = HealthResponse {
        status: if ready { "ready" } else { "degraded" },
        service: HealthCheck {
            status: "ready",
            detail: "primavent-server runtime initialized".to_string(),
        },
        catalog,
        sessions,
        checked_at: Utc::now().to_rfc3339(),
    };

    (StatusCode::OK, Json(payload))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        extract::State,
        http::{Request, StatusCode},
        Json,
    };
    use primavent_core::{
        CartStore, Catalog, ConversationState, ConversationStore, InMemoryCartStore,
        InMemoryConversationStore, Product, UserId,
    };
    use tower::ServiceExt;

    use crate::health::{health, router, HealthState};

    fn state(catalog: Catalog) -> (HealthState, Arc<InMemoryCartStore>, Arc<InMemoryConversationStore>) {
        let carts = Arc::new(InMemoryCartStore::default());
        let conversations = Arc::new(InMemoryConversationStore::default());
        (
            HealthState::new(Arc::new(catalog), carts.clone(), conversations.clone()),
            carts,
            conversations,
        )
    }

    #[tokio::test]
    async fn health_reports_catalog_and_session_counts() {
        let (state, carts, conversations) = state(Catalog::builtin());
        carts.add(UserId(1), Product::new("lg_pc09sq", "LG", "15 000 грн")).await;
        carts.add(UserId(2), Product::new("lg_pc09sq", "LG", "15 000 грн")).await;
        conversations.set(UserId(2), ConversationState::AwaitingContactInfo).await;

        let (status, Json(payload)) = health(State(state)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload.status, "ready");
        assert_eq!(payload.catalog.categories, 4);
        assert_eq!(payload.catalog.products, 5);
        assert_eq!(payload.sessions.active_carts, 2);
        assert_eq!(payload.sessions.pending_checkouts, 1);
    }

    #[tokio::test]
    async fn empty_catalog_is_degraded() {
        let (state, _, _) = state(Catalog::default());

        let (_, Json(payload)) = health(State(state)).await;

        assert_eq!(payload.status, "degraded");
        assert_eq!(payload.service.status, "ready");
    }

    #[tokio::test]
    async fn health_route_serves_json() {
        let (state, _, _) = state(Catalog::builtin());

        let response = router(state)
            .oneshot(Request::builder().uri("/health").body(Body::empty()).expect("request"))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        let payload: serde_json::Value = serde_json::from_slice(&bytes).expect("json");
        assert_eq!(payload["sessions"]["pending_checkouts"], 0);
        assert!(payload["checked_at"].is_string());
    }
}
