use axum::{
    Router,
    routing::{delete, get, patch, post},
};

use std::sync::Arc;

use crate::{expenses, groups, members, settlement, store::MemoryStore};

#[derive(Clone)]
pub struct ServerState {
    pub store: Arc<MemoryStore>,
}

impl ServerState {
    pub fn new(store: MemoryStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/groups", get(groups::list).post(groups::group_new))
        .route(
            "/groups/{group_id}/members",
            get(members::list).post(members::member_new),
        )
        .route(
            "/groups/{group_id}/members/{member_id}",
            delete(members::remove),
        )
        .route(
            "/groups/{group_id}/members/{member_id}/settle",
            post(settlement::settle),
        )
        .route(
            "/groups/{group_id}/expenses",
            get(expenses::list).post(expenses::expense_new),
        )
        .route(
            "/groups/{group_id}/expenses/{expense_id}",
            patch(expenses::update).delete(expenses::remove),
        )
        .route(
            "/groups/{group_id}/expenses/{expense_id}/payments/{member_id}",
            patch(expenses::set_payment),
        )
        .route("/groups/{group_id}/settlement", get(settlement::get))
        .with_state(state)
}

pub async fn run_with_listener(
    store: MemoryStore,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(ServerState::new(store))).await
}
