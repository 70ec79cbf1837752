//! Booking DTOs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::Booking;

/// Request to create a new booking
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBookingRequest {
    #[validate(range(min = 1, message = "must be a valid room id"))]
    pub room_id: i32,
    /// HOURLY or DAILY
    pub kind: String,
    /// Window start (RFC 3339)
    pub start_time: String,
    /// Window end (RFC 3339), excluded from the window
    pub end_time: String,
}

/// Booking details in API responses
#[derive(Debug, Serialize, ToSchema)]
pub struct BookingDto {
    pub id: i32,
    pub room_id: i32,
    pub kind: String,
    pub start_time: String,
    pub end_time: String,
    pub status: String,
    /// Fixed at creation time
    pub total_price: Decimal,
    pub created_at: String,
}

impl From<Booking> for BookingDto {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.id,
            room_id: booking.room_id,
            kind: booking.kind.as_str().to_string(),
            start_time: booking.start_time.to_rfc3339(),
            end_time: booking.end_time.to_rfc3339(),
            status: booking.status.as_str().to_string(),
            total_price: booking.total_price,
            created_at: booking.created_at.to_rfc3339(),
        }
    }
}
