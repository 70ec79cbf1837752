//! Domain errors

use thiserror::Error;

/// Domain-level error taxonomy.
///
/// Every core operation fails with one of these kinds. Storage-specific
/// error types stop at the repository boundary; contention and timeouts
/// surface as [`DomainError::Unavailable`].
#[derive(Debug, Clone, Error)]
pub enum DomainError {
    /// Malformed input: bad kind, non-chronological window, below-minimum
    /// duration, end not in the future
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Referenced entity does not exist or is not visible to the caller
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    /// An overlapping active booking already holds the room
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Lifecycle transition attempted from a status that does not permit it
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Lifecycle transition attempted before its permitted time window
    #[error("Too early: {0}")]
    TooEarly(String),

    /// Lifecycle transition attempted after its permitted time window
    #[error("Too late: {0}")]
    TooLate(String),

    /// Storage contention or timeout; safe to retry
    #[error("Unavailable: {0}")]
    Unavailable(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, field: &'static str, value: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            field,
            value: value.into(),
        }
    }

    /// Whether the operation may succeed if retried.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
