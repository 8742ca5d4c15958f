pub mod engine;
pub mod error;
pub mod lifecycle;
pub mod room;
pub mod session;
pub mod store;

pub use engine::{ConnectionId, Outbox, Relay, RelayState, RelayStats};
pub use error::RelayError;
pub use room::{Room, DEFAULT_LANGUAGE};
pub use session::ConnectionSession;
pub use store::RoomStore;
