use crate::{
    handlers::{diagnostics, health_check, ready_check, room_get, room_list},
    relay::Relay,
};
use axum::{routing::get, Router};
use std::sync::Arc;

/// Create API routes
pub fn create_api_routes(relay: Arc<Relay>) -> Router {
    Router::<Arc<Relay>>::new()
        .route("/health", get(health_check))
        .route("/ready", get(ready_check))
        .route("/v1/diagnostics", get(diagnostics))
        .route("/v1/rooms", get(room_list))
        .route("/v1/rooms/:room_id", get(room_get))
        .with_state(relay)
}
