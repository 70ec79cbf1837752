//! Application layer: use cases composed from domain types and
//! repository interfaces

pub mod services;

pub use services::{AvailabilityService, BookingService};
