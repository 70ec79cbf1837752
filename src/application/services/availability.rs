//! Availability search over rooms
//!
//! Read-only advisory view: takes no locks, so searches never contend
//! with bookings in flight. The authoritative overlap check happens
//! again under locks inside booking creation.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::{Booking, BookingKind, DomainError, DomainResult, RepositoryProvider, Room};

pub struct AvailabilityService {
    repos: Arc<dyn RepositoryProvider>,
}

impl AvailabilityService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// Active rooms free for the whole half-open window `[start, end)`.
    ///
    /// With zero active bookings every active room is returned. The
    /// requested kind does not narrow the search; it is carried so the
    /// request mirrors what the caller will submit at booking time.
    pub async fn search_available_rooms(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        _kind: BookingKind,
    ) -> DomainResult<Vec<Room>> {
        if start >= end {
            return Err(DomainError::InvalidArgument(
                "start_time must be before end_time".to_string(),
            ));
        }

        let rooms = self.repos.rooms().list_active().await?;
        let busy = self.repos.bookings().list_booked_room_ids(start, end).await?;

        Ok(rooms
            .into_iter()
            .filter(|room| !busy.contains(&room.id))
            .collect())
    }

    /// Active bookings of one room intersecting `[start, end)`, without
    /// locks.
    pub async fn find_active_overlaps(
        &self,
        room_id: i32,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Vec<Booking>> {
        self.repos
            .bookings()
            .list_active_overlaps(room_id, start, end)
            .await
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal::Decimal;

    use crate::application::services::BookingService;
    use crate::infrastructure::storage::InMemoryRepositoryProvider;
    use crate::shared::FixedClock;

    fn t(hour: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, hour, min, 0).unwrap()
    }

    fn room(id: i32, active: bool) -> Room {
        Room {
            id,
            name: format!("Room {id}"),
            description: None,
            capacity: 2,
            hourly_rate: Decimal::new(10_000, 2),
            daily_rate: Decimal::new(50_000, 2),
            is_active: active,
            created_at: t(0, 0),
            updated_at: t(0, 0),
        }
    }

    fn setup() -> (Arc<InMemoryRepositoryProvider>, BookingService, AvailabilityService) {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        repos.seed_room(room(1, true));
        repos.seed_room(room(2, true));
        repos.seed_room(room(3, false));
        let clock = Arc::new(FixedClock::at(t(8, 0)));
        let bookings = BookingService::new(repos.clone(), clock);
        let availability = AvailabilityService::new(repos.clone());
        (repos, bookings, availability)
    }

    #[tokio::test]
    async fn all_active_rooms_when_nothing_is_booked() {
        let (_, _, availability) = setup();
        let rooms = availability
            .search_available_rooms(t(10, 0), t(12, 0), BookingKind::Hourly)
            .await
            .unwrap();
        let ids: Vec<i32> = rooms.iter().map(|r| r.id).collect();
        // room 3 is inactive and never shows up
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn booked_room_is_excluded_for_the_window() {
        let (_, bookings, availability) = setup();
        bookings
            .create_booking("user-1", 1, t(10, 0), t(12, 0), BookingKind::Hourly)
            .await
            .unwrap();

        let ids: Vec<i32> = availability
            .search_available_rooms(t(11, 0), t(13, 0), BookingKind::Hourly)
            .await
            .unwrap()
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![2]);

        // disjoint window: the room is free again
        let ids: Vec<i32> = availability
            .search_available_rooms(t(12, 0), t(14, 0), BookingKind::Hourly)
            .await
            .unwrap()
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn canceled_bookings_do_not_block() {
        let (_, bookings, availability) = setup();
        let booking = bookings
            .create_booking("user-1", 1, t(10, 0), t(12, 0), BookingKind::Hourly)
            .await
            .unwrap();
        bookings.cancel("user-1", booking.id).await.unwrap();

        let ids: Vec<i32> = availability
            .search_available_rooms(t(10, 0), t(12, 0), BookingKind::Hourly)
            .await
            .unwrap()
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn reversed_window_is_invalid() {
        let (_, _, availability) = setup();
        let err = availability
            .search_available_rooms(t(12, 0), t(10, 0), BookingKind::Hourly)
            .await;
        assert!(matches!(err, Err(DomainError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn find_active_overlaps_is_room_scoped() {
        let (_, bookings, availability) = setup();
        bookings
            .create_booking("user-1", 1, t(10, 0), t(12, 0), BookingKind::Hourly)
            .await
            .unwrap();
        bookings
            .create_booking("user-2", 2, t(10, 0), t(12, 0), BookingKind::Hourly)
            .await
            .unwrap();

        let overlaps = availability
            .find_active_overlaps(1, t(11, 0), t(13, 0))
            .await
            .unwrap();
        assert_eq!(overlaps.len(), 1);
        assert_eq!(overlaps[0].room_id, 1);

        // boundary touch is not an overlap
        let overlaps = availability
            .find_active_overlaps(1, t(12, 0), t(13, 0))
            .await
            .unwrap();
        assert!(overlaps.is_empty());
    }
}
