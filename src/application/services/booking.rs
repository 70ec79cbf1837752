//! Booking service: creation orchestration and lifecycle transitions
//!
//! The only writer of booking rows. Creation runs as one unit of work
//! that locks conflicting rows before deciding; lifecycle transitions
//! are atomic row-locked read-modify-writes.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::domain::booking::pricing;
use crate::domain::{
    Booking, BookingKind, BookingStatus, BookingUnitOfWork, DomainError, DomainResult, NewBooking,
    RepositoryProvider, Room,
};
use crate::shared::Clock;

pub struct BookingService {
    repos: Arc<dyn RepositoryProvider>,
    clock: Arc<dyn Clock>,
}

impl BookingService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, clock: Arc<dyn Clock>) -> Self {
        Self { repos, clock }
    }

    /// Create a booking for `user_id` in one atomic unit of work.
    ///
    /// Validation and pricing run before any lock is taken. The overlap
    /// check then runs under exclusive row locks, so concurrent attempts
    /// on the same room and window serialize: exactly one commits, the
    /// rest observe the winner's row and fail with `Conflict`.
    pub async fn create_booking(
        &self,
        user_id: &str,
        room_id: i32,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        kind: BookingKind,
    ) -> DomainResult<Booking> {
        let now = self.clock.now();

        Booking::validate_window(kind, start, end, now)?;

        let room = self.active_room(room_id).await?;
        let total_price = pricing::calculate_price(&room, start, end, kind)?;

        let uow = self.repos.bookings().begin().await?;

        let overlaps = match uow.lock_active_overlaps(room_id, start, end).await {
            Ok(overlaps) => overlaps,
            Err(e) => return Self::abort(uow, e).await,
        };
        if !overlaps.is_empty() {
            return Self::abort(
                uow,
                DomainError::Conflict(
                    "room is already booked for the selected time range".to_string(),
                ),
            )
            .await;
        }

        let new_booking = NewBooking {
            user_id: user_id.to_string(),
            room_id,
            kind,
            start_time: start,
            end_time: end,
            // No approval flow: bookings are confirmed on creation
            status: BookingStatus::Confirmed,
            total_price,
            created_at: now,
        };
        let booking = match uow.insert(new_booking).await {
            Ok(booking) => booking,
            Err(e) => return Self::abort(uow, e).await,
        };
        uow.commit().await?;

        info!(
            booking_id = booking.id,
            room_id,
            user_id,
            kind = %booking.kind,
            total_price = %booking.total_price,
            "booking created"
        );
        Ok(booking)
    }

    /// Owner-scoped fetch; foreign bookings answer as missing so their
    /// existence is not leaked.
    pub async fn get_for_user(&self, user_id: &str, booking_id: i32) -> DomainResult<Booking> {
        self.repos
            .bookings()
            .find_by_id(booking_id)
            .await?
            .filter(|b| b.user_id == user_id)
            .ok_or_else(|| DomainError::not_found("Booking", "id", booking_id.to_string()))
    }

    /// All bookings of one user, newest start time first
    pub async fn list_for_user(&self, user_id: &str) -> DomainResult<Vec<Booking>> {
        self.repos.bookings().list_by_user(user_id).await
    }

    pub async fn check_in(&self, user_id: &str, booking_id: i32) -> DomainResult<Booking> {
        self.transition(user_id, booking_id, Booking::check_in).await
    }

    pub async fn check_out(&self, user_id: &str, booking_id: i32) -> DomainResult<Booking> {
        self.transition(user_id, booking_id, Booking::check_out).await
    }

    pub async fn cancel(&self, user_id: &str, booking_id: i32) -> DomainResult<Booking> {
        self.transition(user_id, booking_id, Booking::cancel).await
    }

    /// Run one lifecycle transition as an atomic row-locked
    /// read-modify-write, isolated from concurrent transitions on the
    /// same row.
    async fn transition<F>(
        &self,
        user_id: &str,
        booking_id: i32,
        apply: F,
    ) -> DomainResult<Booking>
    where
        F: FnOnce(&mut Booking, DateTime<Utc>) -> DomainResult<()>,
    {
        let now = self.clock.now();
        let uow = self.repos.bookings().begin().await?;

        let booking = match uow.lock_by_id(booking_id).await {
            Ok(booking) => booking,
            Err(e) => return Self::abort(uow, e).await,
        };
        let Some(mut booking) = booking.filter(|b| b.user_id == user_id) else {
            return Self::abort(
                uow,
                DomainError::not_found("Booking", "id", booking_id.to_string()),
            )
            .await;
        };

        if let Err(e) = apply(&mut booking, now) {
            return Self::abort(uow, e).await;
        }
        if let Err(e) = uow
            .update_status(booking.id, booking.status, booking.updated_at)
            .await
        {
            return Self::abort(uow, e).await;
        }
        uow.commit().await?;

        info!(booking_id, status = %booking.status, "booking status changed");
        Ok(booking)
    }

    async fn active_room(&self, room_id: i32) -> DomainResult<Room> {
        self.repos
            .rooms()
            .find_by_id(room_id)
            .await?
            .filter(|r| r.is_active)
            .ok_or_else(|| DomainError::not_found("Room", "id", room_id.to_string()))
    }

    /// Roll back and surface the original error; a rollback failure is
    /// logged but never masks the cause.
    async fn abort<T>(uow: Box<dyn BookingUnitOfWork>, err: DomainError) -> DomainResult<T> {
        if let Err(rollback_err) = uow.rollback().await {
            warn!(error = %rollback_err, "unit of work rollback failed");
        }
        Err(err)
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use rust_decimal::Decimal;

    use crate::infrastructure::storage::InMemoryRepositoryProvider;
    use crate::shared::FixedClock;

    fn t(day: u32, hour: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, day, hour, min, 0).unwrap()
    }

    fn room(id: i32, active: bool) -> Room {
        Room {
            id,
            name: format!("Room {id}"),
            description: None,
            capacity: 2,
            hourly_rate: Decimal::new(10_000, 2), // 100.00
            daily_rate: Decimal::new(50_000, 2),  // 500.00
            is_active: active,
            created_at: t(1, 0, 0),
            updated_at: t(1, 0, 0),
        }
    }

    fn setup() -> (Arc<InMemoryRepositoryProvider>, Arc<FixedClock>, BookingService) {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        repos.seed_room(room(1, true));
        repos.seed_room(room(2, true));
        repos.seed_room(room(3, false));
        let clock = Arc::new(FixedClock::at(t(1, 8, 0)));
        let service = BookingService::new(repos.clone(), clock.clone());
        (repos, clock, service)
    }

    #[tokio::test]
    async fn create_booking_confirms_and_prices() {
        let (_, _, service) = setup();
        let booking = service
            .create_booking("user-1", 1, t(1, 10, 0), t(1, 12, 0), BookingKind::Hourly)
            .await
            .unwrap();

        assert_eq!(booking.status, BookingStatus::Confirmed);
        assert_eq!(booking.total_price, Decimal::new(20_000, 2)); // 2h * 100.00
        assert_eq!(booking.user_id, "user-1");
        assert_eq!(booking.room_id, 1);
    }

    #[tokio::test]
    async fn create_rejects_end_in_the_past() {
        let (_, clock, service) = setup();
        clock.set(t(1, 13, 0));
        let err = service
            .create_booking("user-1", 1, t(1, 10, 0), t(1, 12, 0), BookingKind::Hourly)
            .await;
        assert!(matches!(err, Err(DomainError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn create_rejects_below_minimum_duration() {
        let (_, _, service) = setup();
        let err = service
            .create_booking("user-1", 1, t(1, 10, 0), t(1, 10, 30), BookingKind::Hourly)
            .await;
        assert!(matches!(err, Err(DomainError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn create_rejects_unknown_and_inactive_rooms() {
        let (_, _, service) = setup();
        let err = service
            .create_booking("user-1", 99, t(1, 10, 0), t(1, 12, 0), BookingKind::Hourly)
            .await;
        assert!(matches!(err, Err(DomainError::NotFound { .. })));

        // room 3 exists but is inactive
        let err = service
            .create_booking("user-1", 3, t(1, 10, 0), t(1, 12, 0), BookingKind::Hourly)
            .await;
        assert!(matches!(err, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn overlapping_booking_is_rejected() {
        let (_, _, service) = setup();
        service
            .create_booking("user-1", 1, t(1, 10, 0), t(1, 13, 0), BookingKind::Hourly)
            .await
            .unwrap();

        let err = service
            .create_booking("user-2", 1, t(1, 10, 30), t(1, 14, 0), BookingKind::Hourly)
            .await;
        assert!(matches!(err, Err(DomainError::Conflict(_))));
    }

    #[tokio::test]
    async fn back_to_back_bookings_are_legal() {
        let (_, _, service) = setup();
        service
            .create_booking("user-1", 1, t(1, 10, 0), t(1, 11, 0), BookingKind::Hourly)
            .await
            .unwrap();
        service
            .create_booking("user-2", 1, t(1, 11, 0), t(1, 12, 0), BookingKind::Hourly)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn canceled_booking_frees_the_room() {
        let (_, _, service) = setup();
        let booking = service
            .create_booking("user-1", 1, t(1, 10, 0), t(1, 12, 0), BookingKind::Hourly)
            .await
            .unwrap();
        service.cancel("user-1", booking.id).await.unwrap();

        // same window books again now that the holder is canceled
        service
            .create_booking("user-2", 1, t(1, 10, 0), t(1, 12, 0), BookingKind::Hourly)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn concurrent_creates_admit_exactly_one_winner() {
        let (_, _, service) = setup();
        let service = Arc::new(service);

        let mut handles = Vec::new();
        for i in 0..8 {
            let service = service.clone();
            handles.push(tokio::spawn(async move {
                service
                    .create_booking(
                        &format!("user-{i}"),
                        1,
                        t(1, 10, 0),
                        t(1, 12, 0),
                        BookingKind::Hourly,
                    )
                    .await
            }));
        }

        let mut successes = 0;
        let mut conflicts = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => successes += 1,
                Err(DomainError::Conflict(_)) => conflicts += 1,
                Err(other) => panic!("unexpected error: {other}"),
            }
        }
        assert_eq!(successes, 1);
        assert_eq!(conflicts, 7);
    }

    #[tokio::test]
    async fn disjoint_rooms_do_not_contend() {
        let (_, _, service) = setup();
        let service = Arc::new(service);

        let a = {
            let service = service.clone();
            tokio::spawn(async move {
                service
                    .create_booking("user-1", 1, t(1, 10, 0), t(1, 12, 0), BookingKind::Hourly)
                    .await
            })
        };
        let b = {
            let service = service.clone();
            tokio::spawn(async move {
                service
                    .create_booking("user-2", 2, t(1, 10, 0), t(1, 12, 0), BookingKind::Hourly)
                    .await
            })
        };

        a.await.unwrap().unwrap();
        b.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn lifecycle_happy_path() {
        let (repos, clock, service) = setup();
        let booking = service
            .create_booking("user-1", 1, t(1, 10, 0), t(1, 12, 0), BookingKind::Hourly)
            .await
            .unwrap();

        clock.set(t(1, 10, 15));
        let checked_in = service.check_in("user-1", booking.id).await.unwrap();
        assert_eq!(checked_in.status, BookingStatus::CheckedIn);

        // repeating the check-in is rejected
        let err = service.check_in("user-1", booking.id).await;
        assert!(matches!(err, Err(DomainError::InvalidState(_))));

        clock.set(t(1, 11, 45));
        let completed = service.check_out("user-1", booking.id).await.unwrap();
        assert_eq!(completed.status, BookingStatus::Completed);

        // the stored row reflects the final status
        let stored = repos
            .bookings()
            .find_by_id(booking.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, BookingStatus::Completed);
    }

    #[tokio::test]
    async fn check_in_respects_the_time_window() {
        let (_, clock, service) = setup();
        let booking = service
            .create_booking("user-1", 1, t(1, 10, 0), t(1, 12, 0), BookingKind::Hourly)
            .await
            .unwrap();

        // still 08:00 — too early
        let err = service.check_in("user-1", booking.id).await;
        assert!(matches!(err, Err(DomainError::TooEarly(_))));

        clock.set(t(1, 12, 0));
        let err = service.check_in("user-1", booking.id).await;
        assert!(matches!(err, Err(DomainError::TooLate(_))));
    }

    #[tokio::test]
    async fn cancel_boundary_is_exclusive_of_start() {
        let (_, clock, service) = setup();
        let booking = service
            .create_booking("user-1", 1, t(1, 10, 0), t(1, 12, 0), BookingKind::Hourly)
            .await
            .unwrap();

        clock.set(t(1, 10, 0));
        let err = service.cancel("user-1", booking.id).await;
        assert!(matches!(err, Err(DomainError::TooLate(_))));

        let booking2 = service
            .create_booking("user-1", 2, t(1, 11, 0), t(1, 12, 0), BookingKind::Hourly)
            .await
            .unwrap();
        clock.set(t(1, 11, 0) - Duration::seconds(1));
        let canceled = service.cancel("user-1", booking2.id).await.unwrap();
        assert_eq!(canceled.status, BookingStatus::Canceled);
    }

    #[tokio::test]
    async fn foreign_bookings_answer_as_missing() {
        let (_, _, service) = setup();
        let booking = service
            .create_booking("user-1", 1, t(1, 10, 0), t(1, 12, 0), BookingKind::Hourly)
            .await
            .unwrap();

        let err = service.get_for_user("user-2", booking.id).await;
        assert!(matches!(err, Err(DomainError::NotFound { .. })));

        let err = service.cancel("user-2", booking.id).await;
        assert!(matches!(err, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn list_for_user_is_newest_start_first() {
        let (_, _, service) = setup();
        service
            .create_booking("user-1", 1, t(1, 10, 0), t(1, 12, 0), BookingKind::Hourly)
            .await
            .unwrap();
        service
            .create_booking("user-1", 2, t(2, 10, 0), t(2, 12, 0), BookingKind::Hourly)
            .await
            .unwrap();
        service
            .create_booking("user-2", 1, t(1, 14, 0), t(1, 15, 0), BookingKind::Hourly)
            .await
            .unwrap();

        let bookings = service.list_for_user("user-1").await.unwrap();
        assert_eq!(bookings.len(), 2);
        assert_eq!(bookings[0].start_time, t(2, 10, 0));
        assert_eq!(bookings[1].start_time, t(1, 10, 0));
    }

    #[tokio::test]
    async fn no_overlap_invariant_holds_after_a_burst() {
        let (repos, _, service) = setup();
        let service = Arc::new(service);

        // overlapping and back-to-back windows interleaved
        let windows = [
            (t(1, 10, 0), t(1, 12, 0)),
            (t(1, 11, 0), t(1, 13, 0)),
            (t(1, 12, 0), t(1, 14, 0)),
            (t(1, 13, 30), t(1, 15, 0)),
            (t(1, 9, 0), t(1, 11, 0)),
        ];
        let mut handles = Vec::new();
        for (i, (start, end)) in windows.into_iter().enumerate() {
            let service = service.clone();
            handles.push(tokio::spawn(async move {
                service
                    .create_booking(&format!("user-{i}"), 1, start, end, BookingKind::Hourly)
                    .await
            }));
        }
        for handle in handles {
            let _ = handle.await.unwrap();
        }

        let survivors = repos
            .bookings()
            .list_active_overlaps(1, t(1, 0, 0), t(2, 0, 0))
            .await
            .unwrap();
        for a in &survivors {
            for b in &survivors {
                if a.id != b.id {
                    assert!(
                        !(a.start_time < b.end_time && a.end_time > b.start_time),
                        "bookings {} and {} overlap",
                        a.id,
                        b.id
                    );
                }
            }
        }
    }
}
