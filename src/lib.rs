//! # Hotel Booking Service
//!
//! Room-booking backend: room catalogue, availability search and
//! double-booking-safe reservations with a check-in/check-out lifecycle.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Core business entities, pricing, lifecycle rules and
//!   repository traits
//! - **application**: Booking orchestration and availability services
//! - **infrastructure**: SeaORM persistence (with row-locked units of
//!   work), in-memory storage, cryptography
//! - **interfaces**: REST API (axum) with Swagger documentation
//! - **shared**: Clock abstraction and other cross-cutting helpers

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod shared;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{init_database, DatabaseConfig, SeaOrmRepositoryProvider};

// Re-export API router
pub use interfaces::http::create_api_router;
