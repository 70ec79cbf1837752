//! Room domain entity

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// A bookable hotel room.
///
/// Rooms carry two base rates so the booking service can price either
/// billing granularity. Rates are read at booking time only; changing
/// them later never reprices existing bookings.
#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    pub id: i32,
    /// Unique display name
    pub name: String,
    pub description: Option<String>,
    pub capacity: u32,
    /// Base price for one started hour
    pub hourly_rate: Decimal,
    /// Base price for one started day
    pub daily_rate: Decimal,
    /// Inactive rooms are hidden from search and cannot be booked
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
