//! SeaORM repository implementations

mod booking_repository;
mod repository_provider;
mod room_repository;
mod user_repository;

pub use booking_repository::SeaOrmBookingRepository;
pub use repository_provider::SeaOrmRepositoryProvider;
pub use room_repository::SeaOrmRoomRepository;
pub use user_repository::SeaOrmUserRepository;
