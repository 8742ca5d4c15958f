use indexmap::IndexSet;

/// Language tag a freshly created room starts with.
pub const DEFAULT_LANGUAGE: &str = "javascript";

/// Shared state of a single collaboration room.
#[derive(Clone, Debug)]
pub struct Room {
    id: String,
    members: IndexSet<String>,
    document: String,
    language: String,
}

impl Room {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            members: IndexSet::new(),
            document: String::new(),
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Add a member. Returns false if the name was already present.
    pub fn add_member(&mut self, user: &str) -> bool {
        self.members.insert(user.to_string())
    }

    /// Remove a member. Returns false if the name was not present.
    pub fn remove_member(&mut self, user: &str) -> bool {
        // shift_remove keeps the remaining names in join order
        self.members.shift_remove(user)
    }

    pub fn has_member(&self, user: &str) -> bool {
        self.members.contains(user)
    }

    /// Member names in join order.
    pub fn members(&self) -> Vec<String> {
        self.members.iter().cloned().collect()
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn document(&self) -> &str {
        &self.document
    }

    /// Replace the document wholesale. Last write wins.
    pub fn set_document(&mut self, code: String) {
        self.document = code;
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn set_language(&mut self, language: String) {
        self.language = language;
    }
}
