//! Room repository interface

use async_trait::async_trait;

use super::model::Room;
use crate::domain::DomainResult;

/// Rooms are managed out of band; the booking core only reads them.
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Find a room by ID
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Room>>;

    /// All active rooms, ordered by name
    async fn list_active(&self) -> DomainResult<Vec<Room>>;
}
