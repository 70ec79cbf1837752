//! User domain entity
//!
//! The booking core only ever consumes the opaque `id`; the rest exists
//! for the auth endpoints.

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// UUID string, the opaque identifier recorded on bookings
    pub id: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}
