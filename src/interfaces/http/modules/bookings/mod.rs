//! Bookings module: creation, listing and lifecycle transitions

pub mod dto;
pub mod handlers;

pub use handlers::BookingAppState;
