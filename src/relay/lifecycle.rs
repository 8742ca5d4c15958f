//! Join, leave and disconnect.
//!
//! Every path that takes a member out of a room goes through
//! [`RelayState::remove_member`]: the implicit leave inside a join, an
//! explicit `leaveRoom`, and a dropped connection.

use tracing::{debug, info, warn};

use crate::models::SendMessage;
use super::engine::{RelayState, Scope};

impl RelayState {
    pub(super) fn join(&mut self, connection_id: &str, room_id: &str, user: &str) {
        let Some(conn) = self.connections.get(connection_id) else {
            warn!("Join from unknown connection {}", connection_id);
            return;
        };
        let previous = conn.session.snapshot();

        // Tear down the previous pair first. Repeating the exact pair is a
        // refresh, not a leave.
        if let (Some(prev_room), Some(prev_user)) = previous {
            if prev_room != room_id || prev_user != user {
                self.remove_member(connection_id, &prev_room, &prev_user);
            }
        }

        let room = self.rooms.get_or_create(room_id);
        if !room.add_member(user) {
            debug!("{} already a member of room {}", user, room_id);
        }
        let document = room.document().to_string();
        let members = room.members();

        if let Some(conn) = self.connections.get_mut(connection_id) {
            conn.session.set(room_id, user);
        }
        self.attach(room_id, connection_id);
        info!("{} joined room {} on connection {}", user, room_id, connection_id);

        self.send_to(connection_id, SendMessage::CodeUpdate(document));
        self.broadcast(room_id, connection_id, Scope::Everyone, SendMessage::UserJoined(members));
    }

    pub(super) fn leave(&mut self, connection_id: &str, room_id: &str, user: &str) {
        self.remove_member(connection_id, room_id, user);
    }

    /// Tear down a connection, leaving whatever room its session holds.
    pub fn disconnect(&mut self, connection_id: &str) {
        let Some(conn) = self.connections.get(connection_id) else {
            return;
        };
        if let (Some(room_id), Some(user)) = conn.session.snapshot() {
            self.remove_member(connection_id, &room_id, &user);
        }
        self.connections.remove(connection_id);
    }

    /// Remove `user` from `room_id` on behalf of `connection_id`.
    ///
    /// The connection's session is cleared (and the connection detached from
    /// the room's broadcast group) only if it holds exactly this pair. The
    /// room is deleted once its member set is empty.
    ///
    /// Membership is by name: if several connections share `user` in this
    /// room, the first one to leave removes the name for all of them, and
    /// the others stay attached to a room that may no longer exist.
    pub(super) fn remove_member(&mut self, connection_id: &str, room_id: &str, user: &str) {
        let owns_pair = match self.connections.get_mut(connection_id) {
            Some(conn) if conn.session.matches(room_id, user) => {
                conn.session.clear();
                true
            }
            _ => false,
        };
        if owns_pair {
            self.detach(room_id, connection_id);
        }

        let Some(room) = self.rooms.get_mut(room_id) else {
            debug!("Leave for missing room {} ignored", room_id);
            return;
        };
        room.remove_member(user);
        let members = room.members();
        info!("{} left room {}", user, room_id);

        self.broadcast(room_id, connection_id, Scope::Everyone, SendMessage::UserJoined(members));
        self.rooms.remove_if_empty(room_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relay::engine::tests::{code, connect, drain, join, leave};
    use crate::relay::room::DEFAULT_LANGUAGE;

    fn members(names: &[&str]) -> SendMessage {
        SendMessage::UserJoined(names.iter().map(|n| n.to_string()).collect())
    }

    #[test]
    fn repeated_joins_keep_one_membership() {
        let mut state = RelayState::new();
        let mut c1 = connect(&mut state, "c1");
        let _c2 = connect(&mut state, "c2");

        for _ in 0..3 {
            join(&mut state, "c1", "r1", "alice");
        }
        join(&mut state, "c2", "r1", "alice");

        let room = state.room("r1").unwrap();
        assert_eq!(room.members(), vec!["alice".to_string()]);
        // Every duplicate join still refreshes the joiner.
        let received = drain(&mut c1);
        assert_eq!(received.iter().filter(|m| **m == members(&["alice"])).count(), 4);
    }

    #[test]
    fn disconnect_cleanup() {
        let mut state = RelayState::new();
        let _c1 = connect(&mut state, "c1");
        let mut c2 = connect(&mut state, "c2");
        join(&mut state, "c1", "r1", "alice");
        join(&mut state, "c2", "r1", "bob");
        drain(&mut c2);

        state.disconnect("c1");
        assert_eq!(drain(&mut c2), vec![members(&["bob"])]);
        assert!(state.room("r1").is_some());
        assert!(state.session("c1").is_none());

        leave(&mut state, "c2", "r1", "bob");
        assert!(state.room("r1").is_none());
        assert_eq!(state.session("c2").map(|s| s.snapshot()), Some((None, None)));
    }

    #[test]
    fn room_is_recreated_fresh_after_gc() {
        let mut state = RelayState::new();
        let mut c1 = connect(&mut state, "c1");
        join(&mut state, "c1", "r1", "alice");
        code(&mut state, "c1", "r1", "old");
        leave(&mut state, "c1", "r1", "alice");
        assert!(state.room("r1").is_none());
        drain(&mut c1);

        join(&mut state, "c1", "r1", "alice");
        assert_eq!(drain(&mut c1)[0], SendMessage::CodeUpdate(String::new()));
        assert_eq!(state.room("r1").map(|r| r.language()), Some(DEFAULT_LANGUAGE));
    }

    #[test]
    fn leaver_stops_receiving_room_events() {
        let mut state = RelayState::new();
        let mut c1 = connect(&mut state, "c1");
        let mut c2 = connect(&mut state, "c2");
        join(&mut state, "c1", "r1", "alice");
        join(&mut state, "c2", "r1", "bob");
        leave(&mut state, "c1", "r1", "alice");
        drain(&mut c1);
        assert_eq!(drain(&mut c2).last(), Some(&members(&["bob"])));

        code(&mut state, "c2", "r1", "after");
        assert!(drain(&mut c1).is_empty());
    }

    #[test]
    fn switching_rooms_leaves_the_old_one() {
        let mut state = RelayState::new();
        let mut c1 = connect(&mut state, "c1");
        let mut c2 = connect(&mut state, "c2");
        join(&mut state, "c1", "r1", "alice");
        join(&mut state, "c2", "r1", "bob");
        drain(&mut c1);
        drain(&mut c2);

        join(&mut state, "c1", "r2", "alice");
        assert_eq!(drain(&mut c2), vec![members(&["bob"])]);
        assert_eq!(
            drain(&mut c1),
            vec![SendMessage::CodeUpdate(String::new()), members(&["alice"])]
        );
        assert_eq!(
            state.session("c1").map(|s| s.snapshot()),
            Some((Some("r2".to_string()), Some("alice".to_string())))
        );

        // Old room keeps its remaining member; the sole member's room goes away on switch.
        join(&mut state, "c2", "r3", "bob");
        assert!(state.room("r1").is_none());
        assert!(state.room("r3").is_some());
    }

    #[test]
    fn sole_member_rename_resets_room() {
        let mut state = RelayState::new();
        let mut c1 = connect(&mut state, "c1");
        join(&mut state, "c1", "r1", "alice");
        code(&mut state, "c1", "r1", "old text");
        drain(&mut c1);

        join(&mut state, "c1", "r1", "alicia");
        assert_eq!(
            drain(&mut c1),
            vec![SendMessage::CodeUpdate(String::new()), members(&["alicia"])]
        );
        assert_eq!(state.room("r1").map(|r| r.members()), Some(vec!["alicia".to_string()]));
    }

    #[test]
    fn rename_shows_peers_the_leave_before_the_join() {
        let mut state = RelayState::new();
        let mut c1 = connect(&mut state, "c1");
        let mut c2 = connect(&mut state, "c2");
        join(&mut state, "c1", "r1", "alice");
        join(&mut state, "c2", "r1", "bob");
        code(&mut state, "c2", "r1", "shared");
        drain(&mut c1);
        drain(&mut c2);

        join(&mut state, "c1", "r1", "alicia");
        assert_eq!(drain(&mut c2), vec![members(&["bob"]), members(&["bob", "alicia"])]);
        assert_eq!(
            drain(&mut c1),
            vec![SendMessage::CodeUpdate("shared".into()), members(&["bob", "alicia"])]
        );
    }

    #[test]
    fn shared_name_leave_orphans_the_other_connection() {
        let mut state = RelayState::new();
        let mut c1 = connect(&mut state, "c1");
        let mut c2 = connect(&mut state, "c2");
        join(&mut state, "c1", "r1", "alice");
        join(&mut state, "c2", "r1", "alice");
        drain(&mut c1);
        drain(&mut c2);

        // One name in the set: the first leave empties and deletes the room.
        leave(&mut state, "c1", "r1", "alice");
        assert!(state.room("r1").is_none());
        assert_eq!(drain(&mut c2), vec![members(&[])]);
        assert!(state.session("c2").unwrap().matches("r1", "alice"));

        // The remaining connection edits a room that no longer exists.
        code(&mut state, "c2", "r1", "lost");
        assert!(state.room("r1").is_none());
        assert!(drain(&mut c1).is_empty());
    }

    #[test]
    fn leave_for_missing_room_is_silent() {
        let mut state = RelayState::new();
        let mut c1 = connect(&mut state, "c1");
        leave(&mut state, "c1", "ghost", "alice");
        assert!(drain(&mut c1).is_empty());
        assert!(state.rooms().is_empty());
    }

    #[test]
    fn leave_for_missing_room_still_clears_matching_session() {
        let mut state = RelayState::new();
        let mut c1 = connect(&mut state, "c1");
        let _c2 = connect(&mut state, "c2");
        join(&mut state, "c1", "r1", "alice");
        join(&mut state, "c2", "r1", "alice");
        leave(&mut state, "c2", "r1", "alice");
        assert!(state.room("r1").is_none());
        drain(&mut c1);

        leave(&mut state, "c1", "r1", "alice");
        assert!(drain(&mut c1).is_empty());
        assert_eq!(state.session("c1").map(|s| s.snapshot()), Some((None, None)));
        assert_eq!(state.stats().joined_connections, 0);
    }

    #[test]
    fn leave_naming_another_user_keeps_own_session() {
        let mut state = RelayState::new();
        let mut c1 = connect(&mut state, "c1");
        let _c2 = connect(&mut state, "c2");
        join(&mut state, "c1", "r1", "alice");
        join(&mut state, "c2", "r1", "bob");
        drain(&mut c1);

        leave(&mut state, "c1", "r1", "bob");
        assert_eq!(drain(&mut c1), vec![members(&["alice"])]);
        assert!(state.session("c1").unwrap().matches("r1", "alice"));
    }

    #[test]
    fn disconnect_of_unjoined_connection_is_quiet() {
        let mut state = RelayState::new();
        let _c1 = connect(&mut state, "c1");
        state.disconnect("c1");
        state.disconnect("c1");
        assert_eq!(state.stats().connections, 0);
    }
}
