//! SeaORM implementation of RoomRepository

use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder};

use crate::domain::{DomainError, DomainResult, Room, RoomRepository};
use crate::infrastructure::database::entities::room;

pub struct SeaOrmRoomRepository {
    db: DatabaseConnection,
}

impl SeaOrmRoomRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(m: room::Model) -> Room {
    Room {
        id: m.id,
        name: m.name,
        description: m.description,
        capacity: m.capacity.max(0) as u32,
        hourly_rate: m.hourly_rate,
        daily_rate: m.daily_rate,
        is_active: m.is_active,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

fn db_err(e: DbErr) -> DomainError {
    DomainError::Unavailable(format!("database error: {e}"))
}

#[async_trait]
impl RoomRepository for SeaOrmRoomRepository {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Room>> {
        let model = room::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn list_active(&self) -> DomainResult<Vec<Room>> {
        let models = room::Entity::find()
            .filter(room::Column::IsActive.eq(true))
            .order_by_asc(room::Column::Name)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }
}
