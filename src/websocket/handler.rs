use std::sync::Arc;
use axum::{
    extract::{State, ws::{Message, WebSocket, WebSocketUpgrade}},
    response::Response,
};
use tokio::sync::mpsc;
use tracing::{info, error, warn, debug};
use futures_util::{StreamExt, SinkExt};
use uuid::Uuid;

use crate::models::{ReceivedMessage, SendMessage};
use crate::relay::Relay;
use crate::websocket::msg_ping_handler::handle_ping_message;


/// WebSocket handler
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(relay): State<Arc<Relay>>,
) -> Response {
    info!("New WebSocket connection attempt");
    ws.on_upgrade(move |socket| handle_socket(socket, relay))
}

/// Handle WebSocket connection
async fn handle_socket(socket: WebSocket, relay: Arc<Relay>) {

    // Generate unique connection ID to identify this client
    let connection_id = Uuid::new_v4().to_string();
    info!("WebSocket connection established with connection_id: {}", connection_id);

    // Split the socket into sender and receiver
    let (mut sender, mut receiver) = socket.split();

    // Everything addressed to this connection is queued here by the relay
    let (outbox, mut outbox_rx) = mpsc::unbounded_channel::<SendMessage>();
    relay.connect(&connection_id, outbox.clone()).await;

    // Drain the outbox into the socket
    let send_connection_id = connection_id.clone();
    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = outbox_rx.recv().await {
            let text = match serde_json::to_string(&msg) {
                Ok(text) => text,
                Err(e) => {
                    error!("Failed to serialize message for connection {}: {}", send_connection_id, e);
                    continue;
                }
            };
            if sender.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
    });

    // Read frames from the socket and feed them to the relay
    let recv_connection_id = connection_id.clone();
    let recv_relay = relay.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(frame) = receiver.next().await {
            let text = match frame {
                Ok(Message::Text(text)) => text,
                Ok(Message::Close(_)) => break,
                // Binary and control frames carry no relay events
                Ok(_) => continue,
                Err(e) => {
                    debug!("WebSocket read error on connection {}: {}", recv_connection_id, e);
                    break;
                }
            };

            // Malformed events are dropped, the connection stays up
            let msg = match ReceivedMessage::parse(&text) {
                Ok(msg) => {
                    debug!("Received {} on connection {}", msg.kind(), recv_connection_id);
                    msg
                }
                Err(e) => {
                    warn!("Dropping event on connection {}: {}", recv_connection_id, e);
                    continue;
                }
            };

            match msg {
                ReceivedMessage::Ping => handle_ping_message(&recv_connection_id, &outbox),
                msg => recv_relay.handle(&recv_connection_id, msg).await,
            }
        }
    });

    // Wait for either task to finish (and finish the other)
    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    relay.disconnect(&connection_id).await;
    info!("WebSocket connection {} terminated", connection_id);
}
