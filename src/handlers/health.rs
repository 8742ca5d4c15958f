use axum::{extract::State, Json};
use std::sync::Arc;
use crate::models::HealthResponse;
use crate::relay::Relay;
use tracing::debug;

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    debug!("Health check requested");
    Json(HealthResponse {
        status: "ok".to_string(),
        message: "Server is running".to_string(),
    })
}

/// Readiness check endpoint
pub async fn ready_check(State(relay): State<Arc<Relay>>) -> Json<HealthResponse> {
    debug!("Readiness check requested");
    // Taking the relay lock proves the event loop is not wedged.
    let stats = relay.stats().await;
    Json(HealthResponse {
        status: "ok".to_string(),
        message: format!("Relay is ready ({} rooms, {} connections)", stats.rooms, stats.connections),
    })
}
