//! Room aggregate: model and repository interface

mod model;
mod repository;

pub use model::Room;
pub use repository::RoomRepository;
