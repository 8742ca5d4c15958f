use std::collections::{HashMap, HashSet};
use tokio::sync::{mpsc::UnboundedSender, Mutex};
use tracing::{debug, info, warn};

use crate::models::{
    ChatMessage, CodeChangeMessage, DrawMessage, LanguageChangeMessage, LanguageUpdate,
    ReceivedMessage, SendMessage, TypingMessage, TypingUpdate,
};
use super::room::Room;
use super::session::ConnectionSession;
use super::store::RoomStore;

/// Opaque per-connection identifier assigned by the transport.
pub type ConnectionId = String;

/// Queue feeding a single connection's socket writer.
pub type Outbox = UnboundedSender<SendMessage>;

/// Registry entry for a live connection.
#[derive(Debug)]
pub(super) struct Connection {
    pub(super) outbox: Outbox,
    pub(super) session: ConnectionSession,
}

/// Who in a room receives a broadcast.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Scope {
    Everyone,
    ExceptSender,
}

/// Counters reported by the diagnostics endpoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RelayStats {
    pub connections: usize,
    pub joined_connections: usize,
    pub rooms: usize,
    pub members: usize,
}

/// Everything the relay mutates: rooms, connection sessions, and the
/// connection groups used as broadcast targets.
///
/// All methods run to completion without awaiting. Outbound events are
/// pushed onto unbounded outboxes, so a caller holding the state exclusively
/// applies a mutation and its fan-out as one step.
#[derive(Debug, Default)]
pub struct RelayState {
    pub(super) rooms: RoomStore,
    pub(super) connections: HashMap<ConnectionId, Connection>,
    pub(super) groups: HashMap<String, HashSet<ConnectionId>>,
}

impl RelayState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new connection in the unjoined state.
    pub fn connect(&mut self, connection_id: &str, outbox: Outbox) {
        self.connections.insert(
            connection_id.to_string(),
            Connection {
                outbox,
                session: ConnectionSession::new(),
            },
        );
    }

    /// Apply one inbound event from `connection_id`.
    pub fn dispatch(&mut self, connection_id: &str, msg: ReceivedMessage) {
        if !self.connections.contains_key(connection_id) {
            warn!("Dropping {} from unknown connection {}", msg.kind(), connection_id);
            return;
        }

        match msg {
            ReceivedMessage::Join(m) => self.join(connection_id, &m.room_id, &m.user_name),
            ReceivedMessage::LeaveRoom(m) => self.leave(connection_id, &m.room_id, &m.user_name),
            ReceivedMessage::CodeChange(m) => self.code_change(connection_id, m),
            ReceivedMessage::LanguageChange(m) => self.language_change(connection_id, m),
            ReceivedMessage::SendMessage(m) => self.send_chat(connection_id, m),
            ReceivedMessage::Typing(m) => self.typing(connection_id, m),
            ReceivedMessage::Draw(m) => self.draw(connection_id, m),
            // Answered by the transport without touching room state.
            ReceivedMessage::Ping => {}
        }
    }

    fn code_change(&mut self, connection_id: &str, msg: CodeChangeMessage) {
        let Some(room) = self.rooms.get_mut(&msg.room_id) else {
            debug!("codeChange for missing room {} ignored", msg.room_id);
            return;
        };
        room.set_document(msg.code.clone());
        self.broadcast(&msg.room_id, connection_id, Scope::ExceptSender, SendMessage::CodeUpdate(msg.code));
    }

    fn language_change(&mut self, connection_id: &str, msg: LanguageChangeMessage) {
        let Some(room) = self.rooms.get_mut(&msg.room_id) else {
            debug!("languageChange for missing room {} ignored", msg.room_id);
            return;
        };
        room.set_language(msg.language.clone());
        self.broadcast(
            &msg.room_id,
            connection_id,
            Scope::ExceptSender,
            SendMessage::LanguageUpdated(LanguageUpdate { language: msg.language }),
        );
    }

    fn send_chat(&mut self, connection_id: &str, msg: ChatMessage) {
        let room_id = msg.room_id.clone();
        self.broadcast(&room_id, connection_id, Scope::Everyone, SendMessage::ChatMessage(msg));
    }

    fn typing(&mut self, connection_id: &str, msg: TypingMessage) {
        self.broadcast(
            &msg.room_id,
            connection_id,
            Scope::ExceptSender,
            SendMessage::UserTyping(TypingUpdate { user: msg.user }),
        );
    }

    fn draw(&mut self, connection_id: &str, msg: DrawMessage) {
        self.broadcast(&msg.room_id, connection_id, Scope::ExceptSender, SendMessage::DrawUpdate(msg.draw_data));
    }

    /// Push an event to one connection.
    pub(super) fn send_to(&self, connection_id: &str, msg: SendMessage) {
        if let Some(conn) = self.connections.get(connection_id) {
            if conn.outbox.send(msg).is_err() {
                debug!("Outbox closed for connection {}", connection_id);
            }
        }
    }

    /// Push an event to every connection attached to `room_id`.
    pub(super) fn broadcast(&self, room_id: &str, sender_id: &str, scope: Scope, msg: SendMessage) {
        let Some(group) = self.groups.get(room_id) else {
            return;
        };
        for connection_id in group {
            if scope == Scope::ExceptSender && connection_id == sender_id {
                continue;
            }
            self.send_to(connection_id, msg.clone());
        }
    }

    pub(super) fn attach(&mut self, room_id: &str, connection_id: &str) {
        self.groups
            .entry(room_id.to_string())
            .or_default()
            .insert(connection_id.to_string());
    }

    pub(super) fn detach(&mut self, room_id: &str, connection_id: &str) {
        if let Some(group) = self.groups.get_mut(room_id) {
            group.remove(connection_id);
            if group.is_empty() {
                self.groups.remove(room_id);
            }
        }
    }

    pub fn session(&self, connection_id: &str) -> Option<&ConnectionSession> {
        self.connections.get(connection_id).map(|conn| &conn.session)
    }

    pub fn room(&self, room_id: &str) -> Option<&Room> {
        self.rooms.get(room_id)
    }

    pub fn rooms(&self) -> &RoomStore {
        &self.rooms
    }

    pub fn stats(&self) -> RelayStats {
        RelayStats {
            connections: self.connections.len(),
            joined_connections: self
                .connections
                .values()
                .filter(|conn| conn.session.room().is_some())
                .count(),
            rooms: self.rooms.len(),
            members: self.rooms.iter().map(Room::member_count).sum(),
        }
    }
}

/// Shared handle to the relay state, one per server.
#[derive(Debug, Default)]
pub struct Relay {
    state: Mutex<RelayState>,
}

impl Relay {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn connect(&self, connection_id: &str, outbox: Outbox) {
        self.state.lock().await.connect(connection_id, outbox);
        info!("Connection {} registered", connection_id);
    }

    pub async fn handle(&self, connection_id: &str, msg: ReceivedMessage) {
        self.state.lock().await.dispatch(connection_id, msg);
    }

    pub async fn disconnect(&self, connection_id: &str) {
        self.state.lock().await.disconnect(connection_id);
        info!("Connection {} removed", connection_id);
    }

    pub async fn stats(&self) -> RelayStats {
        self.state.lock().await.stats()
    }

    /// Copy of a room's current state, if it exists.
    pub async fn room(&self, room_id: &str) -> Option<Room> {
        self.state.lock().await.room(room_id).cloned()
    }

    /// Ids and member counts of all live rooms.
    pub async fn room_list(&self) -> Vec<(String, usize)> {
        let state = self.state.lock().await;
        let mut list: Vec<(String, usize)> = state
            .rooms()
            .iter()
            .map(|room| (room.id().to_string(), room.member_count()))
            .collect();
        list.sort();
        list
    }
}
