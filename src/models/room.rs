use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::relay::Room;

/// Live state of a single room
#[derive(Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoomResponse {
    pub room_id: String,
    pub members: Vec<String>,
    pub document: String,
    pub language: String,
}

impl From<Room> for RoomResponse {
    fn from(room: Room) -> Self {
        Self {
            room_id: room.id().to_string(),
            members: room.members(),
            document: room.document().to_string(),
            language: room.language().to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummary {
    pub room_id: String,
    pub member_count: u32,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct RoomListResponse {
    pub rooms: Vec<RoomSummary>,
}
