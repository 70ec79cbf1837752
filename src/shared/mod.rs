//! Cross-cutting helpers shared by all layers

pub mod clock;

pub use clock::{Clock, FixedClock, SystemClock};
