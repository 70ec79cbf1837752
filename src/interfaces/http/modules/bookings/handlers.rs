//! Booking HTTP handlers
//!
//! All routes are owner-scoped: the authenticated user id comes from the
//! auth middleware and foreign bookings answer 404.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};

use crate::application::BookingService;
use crate::domain::BookingKind;
use crate::interfaces::http::common::{
    error_response, parse_datetime, ApiResponse, ValidatedJson,
};
use crate::interfaces::http::middleware::AuthenticatedUser;

use super::dto::{BookingDto, CreateBookingRequest};

/// Application state for booking handlers
#[derive(Clone)]
pub struct BookingAppState {
    pub bookings: Arc<BookingService>,
}

#[utoipa::path(
    get,
    path = "/api/v1/bookings",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Own bookings, newest start first", body = ApiResponse<Vec<BookingDto>>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_my_bookings(
    State(state): State<BookingAppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<Vec<BookingDto>>>, (StatusCode, Json<ApiResponse<Vec<BookingDto>>>)>
{
    let bookings = state
        .bookings
        .list_for_user(&auth.user_id)
        .await
        .map_err(|e| error_response(&e))?;

    let dtos: Vec<BookingDto> = bookings.into_iter().map(BookingDto::from).collect();
    Ok(Json(ApiResponse::success(dtos)))
}

#[utoipa::path(
    post,
    path = "/api/v1/bookings",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Booking created", body = ApiResponse<BookingDto>),
        (status = 400, description = "Invalid window, kind or duration"),
        (status = 404, description = "Room not found or inactive"),
        (status = 409, description = "Room already booked for the window")
    )
)]
pub async fn create_booking(
    State(state): State<BookingAppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<CreateBookingRequest>,
) -> Result<(StatusCode, Json<ApiResponse<BookingDto>>), (StatusCode, Json<ApiResponse<BookingDto>>)>
{
    let start = parse_datetime(&request.start_time, "start_time")
        .map_err(|msg| (StatusCode::BAD_REQUEST, Json(ApiResponse::error(msg))))?;
    let end = parse_datetime(&request.end_time, "end_time")
        .map_err(|msg| (StatusCode::BAD_REQUEST, Json(ApiResponse::error(msg))))?;
    let Some(kind) = BookingKind::from_str(&request.kind) else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(format!(
                "Unsupported kind: {}",
                request.kind
            ))),
        ));
    };

    let booking = state
        .bookings
        .create_booking(&auth.user_id, request.room_id, start, end, kind)
        .await
        .map_err(|e| error_response(&e))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(BookingDto::from(booking))),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/bookings/{booking_id}",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(("booking_id" = i32, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking details", body = ApiResponse<BookingDto>),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn get_booking(
    State(state): State<BookingAppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(booking_id): Path<i32>,
) -> Result<Json<ApiResponse<BookingDto>>, (StatusCode, Json<ApiResponse<BookingDto>>)> {
    let booking = state
        .bookings
        .get_for_user(&auth.user_id, booking_id)
        .await
        .map_err(|e| error_response(&e))?;

    Ok(Json(ApiResponse::success(BookingDto::from(booking))))
}

#[utoipa::path(
    post,
    path = "/api/v1/bookings/{booking_id}/check-in",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(("booking_id" = i32, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Checked in", body = ApiResponse<BookingDto>),
        (status = 400, description = "Outside the check-in window"),
        (status = 404, description = "Booking not found"),
        (status = 409, description = "Status does not permit check-in")
    )
)]
pub async fn check_in(
    State(state): State<BookingAppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(booking_id): Path<i32>,
) -> Result<Json<ApiResponse<BookingDto>>, (StatusCode, Json<ApiResponse<BookingDto>>)> {
    let booking = state
        .bookings
        .check_in(&auth.user_id, booking_id)
        .await
        .map_err(|e| error_response(&e))?;

    Ok(Json(ApiResponse::success(BookingDto::from(booking))))
}

#[utoipa::path(
    post,
    path = "/api/v1/bookings/{booking_id}/check-out",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(("booking_id" = i32, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Checked out", body = ApiResponse<BookingDto>),
        (status = 404, description = "Booking not found"),
        (status = 409, description = "Status does not permit check-out")
    )
)]
pub async fn check_out(
    State(state): State<BookingAppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(booking_id): Path<i32>,
) -> Result<Json<ApiResponse<BookingDto>>, (StatusCode, Json<ApiResponse<BookingDto>>)> {
    let booking = state
        .bookings
        .check_out(&auth.user_id, booking_id)
        .await
        .map_err(|e| error_response(&e))?;

    Ok(Json(ApiResponse::success(BookingDto::from(booking))))
}

#[utoipa::path(
    post,
    path = "/api/v1/bookings/{booking_id}/cancel",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(("booking_id" = i32, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Canceled", body = ApiResponse<BookingDto>),
        (status = 400, description = "Booking has already started"),
        (status = 404, description = "Booking not found"),
        (status = 409, description = "Booking is already terminal")
    )
)]
pub async fn cancel(
    State(state): State<BookingAppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(booking_id): Path<i32>,
) -> Result<Json<ApiResponse<BookingDto>>, (StatusCode, Json<ApiResponse<BookingDto>>)> {
    let booking = state
        .bookings
        .cancel(&auth.user_id, booking_id)
        .await
        .map_err(|e| error_response(&e))?;

    Ok(Json(ApiResponse::success(BookingDto::from(booking))))
}
