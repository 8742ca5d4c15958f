//! HTTP API tests driven through the router with `tower::ServiceExt`.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use colabri_relay::{
    build_router,
    config::Config,
    models::{CodeChangeMessage, JoinMessage, ReceivedMessage},
    relay::Relay,
};
use serde_json::{json, Value};
use tokio::sync::mpsc::unbounded_channel;
use tower::ServiceExt;

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

/// A relay with alice in "r1" and a document already written.
async fn populated_relay() -> Arc<Relay> {
    let relay = Arc::new(Relay::new());
    let (tx, _rx) = unbounded_channel();
    relay.connect("c1", tx).await;
    relay
        .handle("c1", ReceivedMessage::Join(JoinMessage { room_id: "r1".into(), user_name: "alice".into() }))
        .await;
    relay
        .handle("c1", ReceivedMessage::CodeChange(CodeChangeMessage { room_id: "r1".into(), code: "fn main() {}".into() }))
        .await;
    relay
}

#[tokio::test]
async fn health_and_ready() {
    let relay = Arc::new(Relay::new());
    let app = build_router(relay, &Config::default());

    let (status, body) = get(app.clone(), "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = get(app, "/api/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn room_inspection_reflects_live_state() {
    let relay = populated_relay().await;
    let app = build_router(relay, &Config::default());

    let (status, body) = get(app.clone(), "/api/v1/rooms").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"rooms": [{"roomId": "r1", "memberCount": 1}]}));

    let (status, body) = get(app, "/api/v1/rooms/r1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"roomId": "r1", "members": ["alice"], "document": "fn main() {}", "language": "javascript"})
    );
}

#[tokio::test]
async fn missing_room_is_404() {
    let app = build_router(Arc::new(Relay::new()), &Config::default());
    let (status, body) = get(app, "/api/v1/rooms/ghost").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 404);
}

#[tokio::test]
async fn diagnostics_counts_connections() {
    let relay = populated_relay().await;
    let app = build_router(relay, &Config::default());

    let (status, body) = get(app, "/api/v1/diagnostics").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["n_conn"], 1);
    assert_eq!(body["n_rooms"], 1);
    assert_eq!(body["n_members"], 1);
}

#[tokio::test]
async fn swagger_is_only_mounted_in_development() {
    let prod = Config {
        environment: "production".to_string(),
        ..Config::default()
    };
    let app = build_router(Arc::new(Relay::new()), &prod);
    let (status, _) = get(app, "/api-docs/openapi.json").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let app = build_router(Arc::new(Relay::new()), &Config::default());
    let (status, body) = get(app, "/api-docs/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"].get("/api/v1/rooms/{room_id}").is_some());
}
