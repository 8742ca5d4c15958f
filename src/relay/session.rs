/// Which room and display name a connection currently occupies.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConnectionSession {
    current: Option<(String, String)>,
}

impl ConnectionSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, room_id: &str, user: &str) {
        self.current = Some((room_id.to_string(), user.to_string()));
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    /// `(current_room, current_user)`; both are set or both are absent.
    pub fn snapshot(&self) -> (Option<String>, Option<String>) {
        match &self.current {
            Some((room, user)) => (Some(room.clone()), Some(user.clone())),
            None => (None, None),
        }
    }

    pub fn room(&self) -> Option<&str> {
        self.current.as_ref().map(|(room, _)| room.as_str())
    }

    pub fn is_in(&self, room_id: &str) -> bool {
        self.room() == Some(room_id)
    }

    pub fn matches(&self, room_id: &str, user: &str) -> bool {
        matches!(&self.current, Some((r, u)) if r == room_id && u == user)
    }
}
