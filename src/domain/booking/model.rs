//! Booking domain entity and lifecycle rules

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domain::{DomainError, DomainResult};

/// Billing granularity of a booking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingKind {
    /// Billed per started hour, minimum 1 hour
    Hourly,
    /// Billed per started day, minimum 1 day
    Daily,
}

impl BookingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hourly => "HOURLY",
            Self::Daily => "DAILY",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "HOURLY" => Some(Self::Hourly),
            "DAILY" => Some(Self::Daily),
            _ => None,
        }
    }

    /// Minimum allowed duration in seconds
    pub fn min_duration_secs(&self) -> i64 {
        match self {
            Self::Hourly => 3_600,
            Self::Daily => 86_400,
        }
    }
}

impl std::fmt::Display for BookingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Booking status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingStatus {
    /// Created but not yet confirmed (no approval flow currently assigns this)
    Pending,
    /// Holds the room; the initial status of every new booking
    Confirmed,
    /// Guest is in the room
    CheckedIn,
    /// Stay finished; terminal
    Completed,
    /// Canceled before the stay started; terminal
    Canceled,
}

impl BookingStatus {
    /// Statuses that still hold the room and count toward overlap checks
    pub const ACTIVE: [BookingStatus; 3] = [Self::Pending, Self::Confirmed, Self::CheckedIn];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::CheckedIn => "CHECKED_IN",
            Self::Completed => "COMPLETED",
            Self::Canceled => "CANCELED",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(Self::Pending),
            "CONFIRMED" => Some(Self::Confirmed),
            "CHECKED_IN" => Some(Self::CheckedIn),
            "COMPLETED" => Some(Self::Completed),
            "CANCELED" => Some(Self::Canceled),
            _ => None,
        }
    }

    pub fn is_active(&self) -> bool {
        Self::ACTIVE.contains(self)
    }

    /// Terminal statuses admit no further transition
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Canceled)
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A reservation of one room for one contiguous half-open interval
/// `[start_time, end_time)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Booking {
    pub id: i32,
    /// Opaque identifier of the owning user, supplied by the auth layer
    pub user_id: String,
    pub room_id: i32,
    pub kind: BookingKind,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: BookingStatus,
    /// Fixed at creation time; later rate changes on the room never
    /// reprice an existing booking
    pub total_price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Whether this booking still holds the room
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Half-open interval overlap: `[a0, a1)` and `[b0, b1)` overlap iff
    /// `a0 < b1 && a1 > b0`. Touching boundaries do not overlap, so
    /// back-to-back bookings are legal.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start_time < end && self.end_time > start
    }

    /// Core window invariants: chronological order, end in the future,
    /// kind-specific minimum duration. The creation path re-runs this as
    /// a safety net even though the API layer validates first.
    pub fn validate_window(
        kind: BookingKind,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        if start >= end {
            return Err(DomainError::InvalidArgument(
                "start_time must be before end_time".to_string(),
            ));
        }
        if end <= now {
            return Err(DomainError::InvalidArgument(
                "booking end time must be in the future".to_string(),
            ));
        }
        let duration_secs = (end - start).num_seconds();
        if duration_secs < kind.min_duration_secs() {
            let msg = match kind {
                BookingKind::Hourly => "hourly bookings must be at least 1 hour long",
                BookingKind::Daily => "daily bookings must be at least 1 day long",
            };
            return Err(DomainError::InvalidArgument(msg.to_string()));
        }
        Ok(())
    }

    // ── Lifecycle transitions ──────────────────────────────────────

    /// PENDING/CONFIRMED → CHECKED_IN, permitted only while
    /// `start_time <= now < end_time`.
    pub fn check_in(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        match self.status {
            BookingStatus::Pending | BookingStatus::Confirmed => {}
            other => {
                return Err(DomainError::InvalidState(format!(
                    "only pending or confirmed bookings can be checked in (status: {other})"
                )));
            }
        }
        if now < self.start_time {
            return Err(DomainError::TooEarly(
                "cannot check in before the booking start time".to_string(),
            ));
        }
        if now >= self.end_time {
            return Err(DomainError::TooLate(
                "cannot check in after the booking has already ended".to_string(),
            ));
        }
        self.status = BookingStatus::CheckedIn;
        self.updated_at = now;
        Ok(())
    }

    /// CHECKED_IN → COMPLETED
    pub fn check_out(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        if self.status != BookingStatus::CheckedIn {
            return Err(DomainError::InvalidState(format!(
                "only checked-in bookings can be checked out (status: {})",
                self.status
            )));
        }
        self.status = BookingStatus::Completed;
        self.updated_at = now;
        Ok(())
    }

    /// Non-terminal → CANCELED, permitted strictly before `start_time`.
    pub fn cancel(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        if self.status.is_terminal() {
            return Err(DomainError::InvalidState(format!(
                "{} bookings cannot be modified",
                self.status
            )));
        }
        if now >= self.start_time {
            return Err(DomainError::TooLate(
                "cannot cancel a booking on or after its start time".to_string(),
            ));
        }
        self.status = BookingStatus::Canceled;
        self.updated_at = now;
        Ok(())
    }
}

/// Field set for a booking that has not been persisted yet; the row id
/// is assigned by the repository on insert.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub user_id: String,
    pub room_id: i32,
    pub kind: BookingKind,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: BookingStatus,
    pub total_price: Decimal,
    pub created_at: DateTime<Utc>,
}

// ── Tests ──────────────────────────────────────────────────────
