use std::collections::HashMap;
use tracing::debug;

use super::room::Room;

/// All live rooms, keyed by room id.
///
/// A room is present only while it has at least one member. Callers create
/// rooms through [`RoomStore::get_or_create`] and drop them through
/// [`RoomStore::remove_if_empty`]; nothing else inserts or deletes entries.
#[derive(Debug, Default)]
pub struct RoomStore {
    rooms: HashMap<String, Room>,
}

impl RoomStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, room_id: &str) -> Option<&Room> {
        self.rooms.get(room_id)
    }

    pub fn get_mut(&mut self, room_id: &str) -> Option<&mut Room> {
        self.rooms.get_mut(room_id)
    }

    pub fn contains(&self, room_id: &str) -> bool {
        self.rooms.contains_key(room_id)
    }

    /// Get the room, creating a fresh one if it does not exist.
    pub fn get_or_create(&mut self, room_id: &str) -> &mut Room {
        self.rooms.entry(room_id.to_string()).or_insert_with(|| {
            debug!("Creating room {}", room_id);
            Room::new(room_id)
        })
    }

    /// Delete the room if its member set is empty. Returns true if deleted.
    pub fn remove_if_empty(&mut self, room_id: &str) -> bool {
        match self.rooms.get(room_id) {
            Some(room) if room.is_empty() => {
                self.rooms.remove(room_id);
                debug!("Deleted empty room {}", room_id);
                true
            }
            _ => false,
        }
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Room> {
        self.rooms.values()
    }
}
