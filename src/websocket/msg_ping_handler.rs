use tracing::{debug, error};
use chrono::Utc;
use crate::models::{PongMessage, SendMessage};
use crate::relay::Outbox;

/// Handle a ping - reply with a pong to the sender only.
pub fn handle_ping_message(connection_id: &str, outbox: &Outbox) {
    debug!("Ping message received on connection {}", connection_id);

    let pong = SendMessage::Pong(PongMessage { date: Utc::now().to_rfc3339() });
    if outbox.send(pong).is_err() {
        error!("Failed to queue Pong message for connection {}", connection_id);
    }
}
