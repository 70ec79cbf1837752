pub mod booking;
pub mod error;
pub mod repositories;
pub mod room;
pub mod user;

// Re-export commonly used types
pub use booking::{
    Booking, BookingKind, BookingRepository, BookingStatus, BookingUnitOfWork, NewBooking,
};
pub use error::{DomainError, DomainResult};
pub use repositories::RepositoryProvider;
pub use room::{Room, RoomRepository};
pub use user::{User, UserRepository};
