//! Common API types shared by all HTTP modules

mod validated_json;

pub use validated_json::ValidatedJson;

use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::DomainError;

/// Standard API response envelope.
///
/// Every REST endpoint wraps its payload in this shape.
/// On success: `{"success": true, "data": {...}}`,
/// on failure: `{"success": false, "error": "description"}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// `true` if the request succeeded
    pub success: bool,
    /// Payload; `null` on error
    pub data: Option<T>,
    /// Error description; `null` on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Stable HTTP status for each domain error kind
pub fn error_status(err: &DomainError) -> StatusCode {
    match err {
        DomainError::InvalidArgument(_) | DomainError::TooEarly(_) | DomainError::TooLate(_) => {
            StatusCode::BAD_REQUEST
        }
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::Conflict(_) | DomainError::InvalidState(_) => StatusCode::CONFLICT,
        DomainError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Domain error → handler rejection pair
pub fn error_response<T>(err: &DomainError) -> (StatusCode, Json<ApiResponse<T>>) {
    (error_status(err), Json(ApiResponse::error(err.to_string())))
}

/// Parse an RFC 3339 timestamp, normalizing to UTC
pub fn parse_datetime(value: &str, field: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("Invalid {field}: {e}"))
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kinds_map_to_stable_statuses() {
        assert_eq!(
            error_status(&DomainError::InvalidArgument("x".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            error_status(&DomainError::TooEarly("x".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            error_status(&DomainError::not_found("Booking", "id", "1")),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            error_status(&DomainError::Conflict("x".into())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            error_status(&DomainError::InvalidState("x".into())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            error_status(&DomainError::Unavailable("x".into())),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn parse_datetime_normalizes_to_utc() {
        let dt = parse_datetime("2024-06-01T12:00:00+02:00", "start_time").unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-06-01T10:00:00+00:00");

        assert!(parse_datetime("yesterday", "start_time").is_err());
    }
}
