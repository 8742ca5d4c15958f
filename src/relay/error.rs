/// Reasons an inbound frame is rejected before it reaches the relay.
#[derive(Debug)]
pub enum RelayError {
    /// Not JSON, unknown event type, or a missing/mistyped field.
    Decode(serde_json::Error),
    /// A required identifier was present but blank.
    BlankField(&'static str),
}

impl std::fmt::Display for RelayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RelayError::Decode(e) => write!(f, "Malformed event: {}", e),
            RelayError::BlankField(field) => write!(f, "Field '{}' must not be blank", field),
        }
    }
}

impl std::error::Error for RelayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RelayError::Decode(e) => Some(e),
            RelayError::BlankField(_) => None,
        }
    }
}

impl From<serde_json::Error> for RelayError {
    fn from(e: serde_json::Error) -> Self {
        RelayError::Decode(e)
    }
}
