//! SeaORM implementation of BookingRepository
//!
//! The unit of work wraps one database transaction; overlap and by-id
//! reads inside it use `lock_exclusive()` (`SELECT … FOR UPDATE`), which
//! serializes conflicting booking attempts at the row level while leaving
//! unrelated rooms fully concurrent.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::debug;

use crate::domain::{
    Booking, BookingKind, BookingRepository, BookingStatus, BookingUnitOfWork, DomainError,
    DomainResult, NewBooking,
};
use crate::infrastructure::database::entities::booking;

pub struct SeaOrmBookingRepository {
    db: DatabaseConnection,
}

impl SeaOrmBookingRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn kind_to_db(kind: BookingKind) -> booking::Kind {
    match kind {
        BookingKind::Hourly => booking::Kind::Hourly,
        BookingKind::Daily => booking::Kind::Daily,
    }
}

fn kind_to_domain(kind: booking::Kind) -> BookingKind {
    match kind {
        booking::Kind::Hourly => BookingKind::Hourly,
        booking::Kind::Daily => BookingKind::Daily,
    }
}

fn status_to_db(status: BookingStatus) -> booking::Status {
    match status {
        BookingStatus::Pending => booking::Status::Pending,
        BookingStatus::Confirmed => booking::Status::Confirmed,
        BookingStatus::CheckedIn => booking::Status::CheckedIn,
        BookingStatus::Completed => booking::Status::Completed,
        BookingStatus::Canceled => booking::Status::Canceled,
    }
}

fn status_to_domain(status: booking::Status) -> BookingStatus {
    match status {
        booking::Status::Pending => BookingStatus::Pending,
        booking::Status::Confirmed => BookingStatus::Confirmed,
        booking::Status::CheckedIn => BookingStatus::CheckedIn,
        booking::Status::Completed => BookingStatus::Completed,
        booking::Status::Canceled => BookingStatus::Canceled,
    }
}

fn active_statuses() -> [booking::Status; 3] {
    [
        booking::Status::Pending,
        booking::Status::Confirmed,
        booking::Status::CheckedIn,
    ]
}

fn model_to_domain(m: booking::Model) -> Booking {
    Booking {
        id: m.id,
        user_id: m.user_id,
        room_id: m.room_id,
        kind: kind_to_domain(m.kind),
        start_time: m.start_time,
        end_time: m.end_time,
        status: status_to_domain(m.status),
        total_price: m.total_price,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

/// Storage failures surface as the retryable `Unavailable` kind; callers
/// never see SeaORM error types.
fn db_err(e: DbErr) -> DomainError {
    DomainError::Unavailable(format!("database error: {e}"))
}

/// Half-open interval overlap against `[start, end)`:
/// `start_time < end AND end_time > start`.
fn overlap_query(
    room_id: i32,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> sea_orm::Select<booking::Entity> {
    booking::Entity::find()
        .filter(booking::Column::RoomId.eq(room_id))
        .filter(booking::Column::Status.is_in(active_statuses()))
        .filter(booking::Column::StartTime.lt(end))
        .filter(booking::Column::EndTime.gt(start))
}

// ── Unit of work ────────────────────────────────────────────────

struct SeaOrmBookingUnitOfWork {
    txn: DatabaseTransaction,
}

#[async_trait]
impl BookingUnitOfWork for SeaOrmBookingUnitOfWork {
    async fn lock_active_overlaps(
        &self,
        room_id: i32,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Vec<Booking>> {
        let models = overlap_query(room_id, start, end)
            .lock_exclusive()
            .all(&self.txn)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn lock_by_id(&self, id: i32) -> DomainResult<Option<Booking>> {
        let model = booking::Entity::find_by_id(id)
            .lock_exclusive()
            .one(&self.txn)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn insert(&self, b: NewBooking) -> DomainResult<Booking> {
        debug!(room_id = b.room_id, user_id = %b.user_id, "inserting booking");

        let model = booking::ActiveModel {
            user_id: Set(b.user_id),
            room_id: Set(b.room_id),
            kind: Set(kind_to_db(b.kind)),
            start_time: Set(b.start_time),
            end_time: Set(b.end_time),
            status: Set(status_to_db(b.status)),
            total_price: Set(b.total_price),
            created_at: Set(b.created_at),
            updated_at: Set(b.created_at),
            ..Default::default()
        };
        let inserted = model.insert(&self.txn).await.map_err(db_err)?;
        Ok(model_to_domain(inserted))
    }

    async fn update_status(
        &self,
        id: i32,
        status: BookingStatus,
        updated_at: DateTime<Utc>,
    ) -> DomainResult<()> {
        let model = booking::ActiveModel {
            id: Set(id),
            status: Set(status_to_db(status)),
            updated_at: Set(updated_at),
            ..Default::default()
        };
        match model.update(&self.txn).await {
            Ok(_) => Ok(()),
            Err(DbErr::RecordNotUpdated) => {
                Err(DomainError::not_found("Booking", "id", id.to_string()))
            }
            Err(e) => Err(db_err(e)),
        }
    }

    async fn commit(self: Box<Self>) -> DomainResult<()> {
        self.txn.commit().await.map_err(db_err)
    }

    async fn rollback(self: Box<Self>) -> DomainResult<()> {
        self.txn.rollback().await.map_err(db_err)
    }
}

// ── BookingRepository impl ──────────────────────────────────────

#[async_trait]
impl BookingRepository for SeaOrmBookingRepository {
    async fn begin(&self) -> DomainResult<Box<dyn BookingUnitOfWork>> {
        let txn = self.db.begin().await.map_err(db_err)?;
        Ok(Box::new(SeaOrmBookingUnitOfWork { txn }))
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Booking>> {
        let model = booking::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn list_by_user(&self, user_id: &str) -> DomainResult<Vec<Booking>> {
        let models = booking::Entity::find()
            .filter(booking::Column::UserId.eq(user_id))
            .order_by_desc(booking::Column::StartTime)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn list_active_overlaps(
        &self,
        room_id: i32,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Vec<Booking>> {
        let models = overlap_query(room_id, start, end)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn list_booked_room_ids(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Vec<i32>> {
        let ids: Vec<i32> = booking::Entity::find()
            .select_only()
            .column(booking::Column::RoomId)
            .distinct()
            .filter(booking::Column::Status.is_in(active_statuses()))
            .filter(booking::Column::StartTime.lt(end))
            .filter(booking::Column::EndTime.gt(start))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(ids)
    }
}
