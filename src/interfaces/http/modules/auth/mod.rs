//! Authentication module: signup, login, profile

pub mod dto;
pub mod handlers;

pub use handlers::AuthAppState;
