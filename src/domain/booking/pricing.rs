//! Price calculation for bookings
//!
//! Pure decimal arithmetic; any partial billing unit is charged as a
//! full unit (1h10m bills as 2 hours). Never touches binary floats.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::model::BookingKind;
use crate::domain::room::Room;
use crate::domain::{DomainError, DomainResult};

const SECONDS_PER_HOUR: i64 = 3_600;
const SECONDS_PER_DAY: i64 = 86_400;

/// Total price for booking `room` over `[start, end)` at the given
/// granularity.
///
/// Hourly: `ceil(duration / 1h) * hourly_rate`
/// Daily:  `ceil(duration / 1d) * daily_rate`
pub fn calculate_price(
    room: &Room,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    kind: BookingKind,
) -> DomainResult<Decimal> {
    if start >= end {
        return Err(DomainError::InvalidArgument(
            "start_time must be before end_time".to_string(),
        ));
    }

    let total_seconds = Decimal::from((end - start).num_seconds());
    let (unit_seconds, rate) = match kind {
        BookingKind::Hourly => (Decimal::from(SECONDS_PER_HOUR), room.hourly_rate),
        BookingKind::Daily => (Decimal::from(SECONDS_PER_DAY), room.daily_rate),
    };

    let units = (total_seconds / unit_seconds).ceil();
    Ok(units * rate)
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn sample_room() -> Room {
        Room {
            id: 1,
            name: "Suite 101".into(),
            description: None,
            capacity: 2,
            hourly_rate: Decimal::new(10_000, 2), // 100.00
            daily_rate: Decimal::new(50_000, 2),  // 500.00
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap()
    }

    #[test]
    fn hourly_exact_hours() {
        let room = sample_room();
        let price =
            calculate_price(&room, start(), start() + Duration::hours(2), BookingKind::Hourly)
                .unwrap();
        assert_eq!(price, Decimal::new(20_000, 2)); // 2 * 100.00
    }

    #[test]
    fn hourly_partial_hour_bills_as_full() {
        let room = sample_room();
        // 1h10m → ceil(70min / 60min) = 2 hours
        let price = calculate_price(
            &room,
            start(),
            start() + Duration::minutes(70),
            BookingKind::Hourly,
        )
        .unwrap();
        assert_eq!(price, Decimal::new(20_000, 2));
    }

    #[test]
    fn daily_partial_day_bills_as_full() {
        let room = sample_room();
        // 1d1h → ceil(25h / 24h) = 2 days
        let price = calculate_price(
            &room,
            start(),
            start() + Duration::hours(25),
            BookingKind::Daily,
        )
        .unwrap();
        assert_eq!(price, Decimal::new(100_000, 2)); // 2 * 500.00
    }

    #[test]
    fn daily_exact_day() {
        let room = sample_room();
        let price =
            calculate_price(&room, start(), start() + Duration::days(1), BookingKind::Daily)
                .unwrap();
        assert_eq!(price, Decimal::new(50_000, 2));
    }

    #[test]
    fn fractional_rates_stay_exact() {
        let mut room = sample_room();
        room.hourly_rate = Decimal::new(9_999, 2); // 99.99
        let price =
            calculate_price(&room, start(), start() + Duration::hours(3), BookingKind::Hourly)
                .unwrap();
        assert_eq!(price, Decimal::new(29_997, 2)); // 299.97, no penny drift
    }

    #[test]
    fn reversed_range_is_invalid() {
        let room = sample_room();
        let err = calculate_price(&room, start(), start() - Duration::hours(1), BookingKind::Hourly);
        assert!(matches!(err, Err(DomainError::InvalidArgument(_))));
    }
}
