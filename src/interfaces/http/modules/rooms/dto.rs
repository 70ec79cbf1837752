//! Room DTOs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::Room;

/// Room details in API responses
#[derive(Debug, Serialize, ToSchema)]
pub struct RoomDto {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub capacity: u32,
    /// Base price for one started hour
    pub hourly_rate: Decimal,
    /// Base price for one started day
    pub daily_rate: Decimal,
}

impl From<Room> for RoomDto {
    fn from(room: Room) -> Self {
        Self {
            id: room.id,
            name: room.name,
            description: room.description,
            capacity: room.capacity,
            hourly_rate: room.hourly_rate,
            daily_rate: room.daily_rate,
        }
    }
}

/// Query parameters for the availability search
#[derive(Debug, Deserialize, ToSchema, IntoParams)]
pub struct AvailabilityQuery {
    /// Window start (RFC 3339)
    pub start_time: String,
    /// Window end (RFC 3339), excluded from the window
    pub end_time: String,
    /// Intended booking kind: HOURLY or DAILY
    pub kind: String,
}
