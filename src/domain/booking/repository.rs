//! Booking repository interface

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::model::{Booking, BookingStatus, NewBooking};
use crate::domain::DomainResult;

/// Transaction-scoped handle for booking writes.
///
/// Obtained from [`BookingRepository::begin`]. Reads through this handle
/// take exclusive row locks, so two units of work touching the same rows
/// serialize: the second caller waits for the first transaction to commit
/// or abort, then observes its outcome. Nothing persists unless `commit`
/// is reached.
#[async_trait]
pub trait BookingUnitOfWork: Send + Sync {
    /// Lock and return the active bookings of `room_id` whose interval
    /// overlaps the half-open window `[start, end)`.
    async fn lock_active_overlaps(
        &self,
        room_id: i32,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Vec<Booking>>;

    /// Lock and return one booking row by id.
    async fn lock_by_id(&self, id: i32) -> DomainResult<Option<Booking>>;

    /// Insert a new booking and return it with its assigned id.
    async fn insert(&self, booking: NewBooking) -> DomainResult<Booking>;

    /// Persist a status change for one booking row.
    async fn update_status(
        &self,
        id: i32,
        status: BookingStatus,
        updated_at: DateTime<Utc>,
    ) -> DomainResult<()>;

    /// Commit the unit of work, releasing all locks.
    async fn commit(self: Box<Self>) -> DomainResult<()>;

    /// Abort the unit of work; all writes made through it are discarded.
    async fn rollback(self: Box<Self>) -> DomainResult<()>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Open a unit of work (one storage transaction).
    async fn begin(&self) -> DomainResult<Box<dyn BookingUnitOfWork>>;

    /// Find a booking by ID
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Booking>>;

    /// All bookings of one user, newest start time first
    async fn list_by_user(&self, user_id: &str) -> DomainResult<Vec<Booking>>;

    /// Active bookings of `room_id` overlapping `[start, end)`, without
    /// taking locks
    async fn list_active_overlaps(
        &self,
        room_id: i32,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Vec<Booking>>;

    /// Ids of rooms holding any active booking that overlaps `[start, end)`.
    ///
    /// Advisory read used by availability search; the authoritative check
    /// happens again under locks inside booking creation.
    async fn list_booked_room_ids(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Vec<i32>>;
}
