//! User repository interface

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::model::User;
use crate::domain::DomainResult;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Save a new user
    async fn insert(&self, user: User) -> DomainResult<()>;

    /// Find a user by ID
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<User>>;

    /// Find a user by username or email (login accepts either)
    async fn find_by_username_or_email(&self, login: &str) -> DomainResult<Option<User>>;

    /// Record a successful login
    async fn touch_last_login(&self, id: &str, at: DateTime<Utc>) -> DomainResult<()>;

    /// Total number of users (used for first-boot seeding)
    async fn count(&self) -> DomainResult<u64>;
}
