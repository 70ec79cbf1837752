//! Room HTTP handlers

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use crate::application::AvailabilityService;
use crate::domain::{BookingKind, RepositoryProvider};
use crate::interfaces::http::common::{error_response, parse_datetime, ApiResponse};

use super::dto::{AvailabilityQuery, RoomDto};

/// Application state for room handlers
#[derive(Clone)]
pub struct RoomAppState {
    pub repos: Arc<dyn RepositoryProvider>,
    pub availability: Arc<AvailabilityService>,
}

#[utoipa::path(
    get,
    path = "/api/v1/rooms",
    tag = "Rooms",
    responses(
        (status = 200, description = "All active rooms, name-ordered", body = ApiResponse<Vec<RoomDto>>)
    )
)]
pub async fn list_rooms(
    State(state): State<RoomAppState>,
) -> Result<Json<ApiResponse<Vec<RoomDto>>>, (StatusCode, Json<ApiResponse<Vec<RoomDto>>>)> {
    let rooms = state
        .repos
        .rooms()
        .list_active()
        .await
        .map_err(|e| error_response(&e))?;

    let dtos: Vec<RoomDto> = rooms.into_iter().map(RoomDto::from).collect();
    Ok(Json(ApiResponse::success(dtos)))
}

#[utoipa::path(
    get,
    path = "/api/v1/rooms/{room_id}",
    tag = "Rooms",
    params(("room_id" = i32, Path, description = "Room ID")),
    responses(
        (status = 200, description = "Room details", body = ApiResponse<RoomDto>),
        (status = 404, description = "Room not found or inactive")
    )
)]
pub async fn get_room(
    State(state): State<RoomAppState>,
    Path(room_id): Path<i32>,
) -> Result<Json<ApiResponse<RoomDto>>, (StatusCode, Json<ApiResponse<RoomDto>>)> {
    let room = state
        .repos
        .rooms()
        .find_by_id(room_id)
        .await
        .map_err(|e| error_response(&e))?
        .filter(|r| r.is_active);

    let Some(room) = room else {
        return Err((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error(format!("Room {room_id} not found"))),
        ));
    };

    Ok(Json(ApiResponse::success(RoomDto::from(room))))
}

#[utoipa::path(
    get,
    path = "/api/v1/rooms/available",
    tag = "Rooms",
    params(AvailabilityQuery),
    responses(
        (status = 200, description = "Rooms free for the whole window", body = ApiResponse<Vec<RoomDto>>),
        (status = 400, description = "Invalid window or kind")
    )
)]
pub async fn search_available(
    State(state): State<RoomAppState>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<ApiResponse<Vec<RoomDto>>>, (StatusCode, Json<ApiResponse<Vec<RoomDto>>>)> {
    let start = parse_datetime(&query.start_time, "start_time")
        .map_err(|msg| (StatusCode::BAD_REQUEST, Json(ApiResponse::error(msg))))?;
    let end = parse_datetime(&query.end_time, "end_time")
        .map_err(|msg| (StatusCode::BAD_REQUEST, Json(ApiResponse::error(msg))))?;
    let Some(kind) = BookingKind::from_str(&query.kind) else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(format!(
                "Unsupported kind: {}",
                query.kind
            ))),
        ));
    };

    let rooms = state
        .availability
        .search_available_rooms(start, end, kind)
        .await
        .map_err(|e| error_response(&e))?;

    let dtos: Vec<RoomDto> = rooms.into_iter().map(RoomDto::from).collect();
    Ok(Json(ApiResponse::success(dtos)))
}
