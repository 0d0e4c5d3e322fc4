//! Reservation records, filters, and booking rules.

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::domain::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl ReservationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::Cancelled => "cancelled",
        }
    }

    /// Inverse of [`as_str`](Self::as_str), for text-typed store columns.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(ReservationStatus::Pending),
            "confirmed" => Some(ReservationStatus::Confirmed),
            "cancelled" => Some(ReservationStatus::Cancelled),
            _ => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, ReservationStatus::Cancelled)
    }
}

/// A trip reservation as persisted by the primary store.
///
/// Reservations are owner-scoped: every service operation checks
/// `user_id` against the acting user. Deletion is physical.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservationRecord {
    pub id: String,
    pub user_id: String,
    pub trip_id: String,
    pub status: ReservationStatus,
    pub starts_on: Date,
    pub ends_on: Date,
    pub party_size: i32,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Optional narrowing of a reservation listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReservationFilter {
    pub status: Option<ReservationStatus>,
}

impl ReservationFilter {
    /// An empty filter selects every reservation of the user and is the
    /// only listing shape that is cached.
    pub fn is_empty(self) -> bool {
        self.status.is_none()
    }
}

/// Validate a booking window against the calendar.
pub fn validate_booking_window(starts_on: Date, ends_on: Date, today: Date) -> Result<(), DomainError> {
    if starts_on > ends_on {
        return Err(DomainError::validation(
            "reservation must start on or before its end date",
        ));
    }
    if starts_on < today {
        return Err(DomainError::validation(
            "reservation must not start in the past",
        ));
    }
    Ok(())
}

/// Validate the size of the travelling party.
pub fn validate_party_size(party_size: i32) -> Result<(), DomainError> {
    if party_size < 1 {
        return Err(DomainError::validation(
            "party size must be at least one traveller",
        ));
    }
    Ok(())
}

/// Check a reservation status transition.
pub fn validate_reservation_transition(
    current: ReservationStatus,
    next: ReservationStatus,
) -> Result<(), DomainError> {
    if current.is_terminal() && next != current {
        return Err(DomainError::invariant(
            "a cancelled reservation cannot change status",
        ));
    }
    Ok(())
}
