//! Real-time collaboration relay.
//!
//! Clients connect over a websocket, join a named room and share one live
//! document, a language tag, and ephemeral typing/chat/drawing signals.
//! The [`relay`] module owns rooms and sessions; [`websocket`] adapts axum
//! sockets onto it; the HTTP API under `/api` exposes health and room
//! inspection.

pub mod config;
pub mod docs;
pub mod handlers;
pub mod models;
pub mod relay;
pub mod routes;
pub mod websocket;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use config::Config;
use docs::ApiDoc;
use relay::Relay;
use routes::create_api_routes;
use websocket::websocket_handler;

/// Build the full application router around a shared relay.
pub fn build_router(relay: Arc<Relay>, config: &Config) -> Router {
    let mut app_routes = Router::new()
        // Relay socket
        .route("/socket", get(websocket_handler))
        .with_state(relay.clone())
        // Mount API routes
        .nest("/api", create_api_routes(relay));

    if config.is_development() {
        // Mount Swagger UI
        app_routes = app_routes
            .merge(SwaggerUi::new("/swagger").url("/api-docs/openapi.json", ApiDoc::openapi()));
    }

    app_routes
        .layer(config.cors_layer())
        // Add tracing layer
        .layer(TraceLayer::new_for_http())
}
