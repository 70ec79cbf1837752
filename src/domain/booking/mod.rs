//! Booking aggregate: model, lifecycle rules, pricing and repository
//! interface

mod model;
pub mod pricing;
mod repository;

pub use model::{Booking, BookingKind, BookingStatus, NewBooking};
pub use repository::{BookingRepository, BookingUnitOfWork};
