//! HTTP modules, one per resource

pub mod auth;
pub mod bookings;
pub mod health;
pub mod metrics;
pub mod rooms;
