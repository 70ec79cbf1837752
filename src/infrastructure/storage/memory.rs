//! In-memory repository implementations for development and testing
//!
//! Pessimistic locking is modelled with one async mutex per room: a unit
//! of work acquires the mutex of every room whose rows it reads, holds it
//! until commit or rollback, and applies its buffered writes while still
//! holding it. Units of work on disjoint rooms run fully in parallel,
//! matching the row-scoped locking contract of the SQL implementation.

use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::{
    Booking, BookingRepository, BookingStatus, BookingUnitOfWork, DomainError, DomainResult,
    NewBooking, RepositoryProvider, Room, RoomRepository, User, UserRepository,
};

type RoomLocks = Arc<DashMap<i32, Arc<Mutex<()>>>>;

// ── Rooms ──────────────────────────────────────────────────────

pub struct InMemoryRoomRepository {
    rooms: Arc<DashMap<i32, Room>>,
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Room>> {
        Ok(self.rooms.get(&id).map(|r| r.clone()))
    }

    async fn list_active(&self) -> DomainResult<Vec<Room>> {
        let mut rooms: Vec<Room> = self
            .rooms
            .iter()
            .filter(|r| r.is_active)
            .map(|r| r.clone())
            .collect();
        rooms.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rooms)
    }
}

// ── Users ──────────────────────────────────────────────────────

pub struct InMemoryUserRepository {
    users: Arc<DashMap<String, User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: User) -> DomainResult<()> {
        let duplicate = self
            .users
            .iter()
            .any(|u| u.username == user.username || u.email == user.email);
        if duplicate {
            return Err(DomainError::Conflict(
                "username or email already exists".to_string(),
            ));
        }
        self.users.insert(user.id.clone(), user);
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<User>> {
        Ok(self.users.get(id).map(|u| u.clone()))
    }

    async fn find_by_username_or_email(&self, login: &str) -> DomainResult<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|u| u.username == login || u.email == login)
            .map(|u| u.clone()))
    }

    async fn touch_last_login(&self, id: &str, at: DateTime<Utc>) -> DomainResult<()> {
        match self.users.get_mut(id) {
            Some(mut user) => {
                user.last_login_at = Some(at);
                Ok(())
            }
            None => Err(DomainError::not_found("User", "id", id.to_string())),
        }
    }

    async fn count(&self) -> DomainResult<u64> {
        Ok(self.users.len() as u64)
    }
}

// ── Bookings ───────────────────────────────────────────────────

pub struct InMemoryBookingRepository {
    bookings: Arc<DashMap<i32, Booking>>,
    counter: Arc<AtomicI32>,
    room_locks: RoomLocks,
}

enum PendingWrite {
    Insert(Booking),
    UpdateStatus {
        id: i32,
        status: BookingStatus,
        updated_at: DateTime<Utc>,
    },
}

struct InMemoryBookingUnitOfWork {
    bookings: Arc<DashMap<i32, Booking>>,
    counter: Arc<AtomicI32>,
    room_locks: RoomLocks,
    /// Room locks held by this unit of work, released on drop
    guards: Mutex<Vec<OwnedMutexGuard<()>>>,
    /// Writes buffered until commit
    pending: Mutex<Vec<PendingWrite>>,
}

impl InMemoryBookingUnitOfWork {
    /// Take (and keep) the exclusive lock of one room.
    async fn lock_room(&self, room_id: i32) {
        let lock = self
            .room_locks
            .entry(room_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let guard = lock.lock_owned().await;
        self.guards.lock().await.push(guard);
    }
}

#[async_trait]
impl BookingUnitOfWork for InMemoryBookingUnitOfWork {
    async fn lock_active_overlaps(
        &self,
        room_id: i32,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Vec<Booking>> {
        self.lock_room(room_id).await;
        Ok(self
            .bookings
            .iter()
            .filter(|b| b.room_id == room_id && b.is_active() && b.overlaps(start, end))
            .map(|b| b.clone())
            .collect())
    }

    async fn lock_by_id(&self, id: i32) -> DomainResult<Option<Booking>> {
        let Some(room_id) = self.bookings.get(&id).map(|b| b.room_id) else {
            return Ok(None);
        };
        self.lock_room(room_id).await;
        // re-read after acquiring the lock; the row may have changed while
        // we waited
        Ok(self.bookings.get(&id).map(|b| b.clone()))
    }

    async fn insert(&self, booking: NewBooking) -> DomainResult<Booking> {
        let id = self.counter.fetch_add(1, Ordering::SeqCst);
        let booking = Booking {
            id,
            user_id: booking.user_id,
            room_id: booking.room_id,
            kind: booking.kind,
            start_time: booking.start_time,
            end_time: booking.end_time,
            status: booking.status,
            total_price: booking.total_price,
            created_at: booking.created_at,
            updated_at: booking.created_at,
        };
        self.pending
            .lock()
            .await
            .push(PendingWrite::Insert(booking.clone()));
        Ok(booking)
    }

    async fn update_status(
        &self,
        id: i32,
        status: BookingStatus,
        updated_at: DateTime<Utc>,
    ) -> DomainResult<()> {
        if !self.bookings.contains_key(&id) {
            return Err(DomainError::not_found("Booking", "id", id.to_string()));
        }
        self.pending.lock().await.push(PendingWrite::UpdateStatus {
            id,
            status,
            updated_at,
        });
        Ok(())
    }

    async fn commit(self: Box<Self>) -> DomainResult<()> {
        let this = *self;
        let pending = this.pending.into_inner();
        for write in pending {
            match write {
                PendingWrite::Insert(booking) => {
                    this.bookings.insert(booking.id, booking);
                }
                PendingWrite::UpdateStatus {
                    id,
                    status,
                    updated_at,
                } => {
                    if let Some(mut booking) = this.bookings.get_mut(&id) {
                        booking.status = status;
                        booking.updated_at = updated_at;
                    }
                }
            }
        }
        // room locks in `guards` release here, after the writes landed
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> DomainResult<()> {
        // buffered writes are discarded with self; locks release on drop
        Ok(())
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn begin(&self) -> DomainResult<Box<dyn BookingUnitOfWork>> {
        Ok(Box::new(InMemoryBookingUnitOfWork {
            bookings: self.bookings.clone(),
            counter: self.counter.clone(),
            room_locks: self.room_locks.clone(),
            guards: Mutex::new(Vec::new()),
            pending: Mutex::new(Vec::new()),
        }))
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Booking>> {
        Ok(self.bookings.get(&id).map(|b| b.clone()))
    }

    async fn list_by_user(&self, user_id: &str) -> DomainResult<Vec<Booking>> {
        let mut bookings: Vec<Booking> = self
            .bookings
            .iter()
            .filter(|b| b.user_id == user_id)
            .map(|b| b.clone())
            .collect();
        bookings.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        Ok(bookings)
    }

    async fn list_active_overlaps(
        &self,
        room_id: i32,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Vec<Booking>> {
        Ok(self
            .bookings
            .iter()
            .filter(|b| b.room_id == room_id && b.is_active() && b.overlaps(start, end))
            .map(|b| b.clone())
            .collect())
    }

    async fn list_booked_room_ids(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Vec<i32>> {
        let mut ids: Vec<i32> = self
            .bookings
            .iter()
            .filter(|b| b.is_active() && b.overlaps(start, end))
            .map(|b| b.room_id)
            .collect();
        ids.sort_unstable();
        ids.dedup();
        Ok(ids)
    }
}

// ── Provider ───────────────────────────────────────────────────

/// In-memory repository provider for tests and local development
pub struct InMemoryRepositoryProvider {
    rooms: InMemoryRoomRepository,
    bookings: InMemoryBookingRepository,
    users: InMemoryUserRepository,
}

impl InMemoryRepositoryProvider {
    pub fn new() -> Self {
        Self {
            rooms: InMemoryRoomRepository {
                rooms: Arc::new(DashMap::new()),
            },
            bookings: InMemoryBookingRepository {
                bookings: Arc::new(DashMap::new()),
                counter: Arc::new(AtomicI32::new(1)),
                room_locks: Arc::new(DashMap::new()),
            },
            users: InMemoryUserRepository {
                users: Arc::new(DashMap::new()),
            },
        }
    }

    pub fn seed_room(&self, room: Room) {
        self.rooms.rooms.insert(room.id, room);
    }

    pub fn seed_user(&self, user: User) {
        self.users.users.insert(user.id.clone(), user);
    }
}

impl Default for InMemoryRepositoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl RepositoryProvider for InMemoryRepositoryProvider {
    fn rooms(&self) -> &dyn RoomRepository {
        &self.rooms
    }

    fn bookings(&self) -> &dyn BookingRepository {
        &self.bookings
    }

    fn users(&self) -> &dyn UserRepository {
        &self.users
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal::Decimal;

    fn t(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, hour, 0, 0).unwrap()
    }

    fn new_booking(room_id: i32, start: DateTime<Utc>, end: DateTime<Utc>) -> NewBooking {
        NewBooking {
            user_id: "user-1".into(),
            room_id,
            kind: crate::domain::BookingKind::Hourly,
            start_time: start,
            end_time: end,
            status: BookingStatus::Confirmed,
            total_price: Decimal::new(10_000, 2),
            created_at: t(8),
        }
    }

    #[tokio::test]
    async fn rollback_discards_buffered_writes() {
        let provider = InMemoryRepositoryProvider::new();
        let uow = provider.bookings().begin().await.unwrap();
        let booking = uow.insert(new_booking(1, t(10), t(12))).await.unwrap();
        uow.rollback().await.unwrap();

        assert!(provider
            .bookings()
            .find_by_id(booking.id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn commit_makes_writes_visible_and_releases_locks() {
        let provider = InMemoryRepositoryProvider::new();
        let uow = provider.bookings().begin().await.unwrap();
        assert!(uow
            .lock_active_overlaps(1, t(10), t(12))
            .await
            .unwrap()
            .is_empty());
        let booking = uow.insert(new_booking(1, t(10), t(12))).await.unwrap();
        uow.commit().await.unwrap();

        // the room lock is free again and the row is visible
        let uow = provider.bookings().begin().await.unwrap();
        let overlaps = uow.lock_active_overlaps(1, t(11), t(13)).await.unwrap();
        assert_eq!(overlaps.len(), 1);
        assert_eq!(overlaps[0].id, booking.id);
        uow.rollback().await.unwrap();
    }

    #[tokio::test]
    async fn second_unit_of_work_waits_for_the_first() {
        let provider = Arc::new(InMemoryRepositoryProvider::new());

        let uow = provider.bookings().begin().await.unwrap();
        uow.lock_active_overlaps(1, t(10), t(12)).await.unwrap();
        uow.insert(new_booking(1, t(10), t(12))).await.unwrap();

        // a second worker blocks on the room lock until the first commits
        let contender = {
            let provider = provider.clone();
            tokio::spawn(async move {
                let uow = provider.bookings().begin().await.unwrap();
                let overlaps = uow.lock_active_overlaps(1, t(10), t(12)).await.unwrap();
                uow.rollback().await.unwrap();
                overlaps.len()
            })
        };

        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert!(!contender.is_finished());

        uow.commit().await.unwrap();
        assert_eq!(contender.await.unwrap(), 1);
    }
}
