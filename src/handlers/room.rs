use crate::{
    handlers::diagnostics::saturating_u32,
    models::{ErrorResponse, RoomListResponse, RoomResponse, RoomSummary},
    relay::Relay,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::debug;

/// List live rooms with their member counts
pub async fn room_list(State(relay): State<Arc<Relay>>) -> Json<RoomListResponse> {
    let rooms = relay
        .room_list()
        .await
        .into_iter()
        .map(|(room_id, member_count)| RoomSummary {
            room_id,
            member_count: saturating_u32(member_count),
        })
        .collect();
    Json(RoomListResponse { rooms })
}

/// Get the current members, document and language of a room
pub async fn room_get(
    State(relay): State<Arc<Relay>>,
    Path(room_id): Path<String>,
) -> Result<(StatusCode, Json<RoomResponse>), (StatusCode, Json<ErrorResponse>)> {
    match relay.room(&room_id).await {
        Some(room) => Ok((StatusCode::OK, Json(RoomResponse::from(room)))),
        None => {
            debug!("Room '{}' requested but not live", room_id);
            Err(ErrorResponse::reply(
                StatusCode::NOT_FOUND,
                format!("Room '{}' not found", room_id),
            ))
        }
    }
}
