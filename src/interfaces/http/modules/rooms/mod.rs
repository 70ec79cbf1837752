//! Rooms module: listing, details and availability search

pub mod dto;
pub mod handlers;

pub use handlers::RoomAppState;
