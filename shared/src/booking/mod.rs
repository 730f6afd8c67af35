//! Booking entity and lifecycle status
//!
//! A booking reserves one room for one requester over a half-open interval
//! `[start_time, end_time)`. Terminal bookings are retained, never deleted.

use crate::money::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a booking
///
/// `Completed`, `Cancelled` and `Expired` are terminal; no event leads out of
/// them. Transition rules live in `booking-engine::lifecycle`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    #[default]
    Created,
    CheckedIn,
    Completed,
    Cancelled,
    Expired,
}

impl BookingStatus {
    /// Terminal states admit no further lifecycle events
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            BookingStatus::Completed | BookingStatus::Cancelled | BookingStatus::Expired
        )
    }

    /// Canonical name, matching the serialized form
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Created => "CREATED",
            BookingStatus::CheckedIn => "CHECKED_IN",
            BookingStatus::Completed => "COMPLETED",
            BookingStatus::Cancelled => "CANCELLED",
            BookingStatus::Expired => "EXPIRED",
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Booking entity
///
/// References its room and requester by id; prices are attached separately by
/// the payment orchestrator after creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Booking {
    pub id: i64,
    pub room_id: i64,
    pub requester_id: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: BookingStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deposit_amount: Option<Money>,
}

impl Booking {
    pub fn new(
        id: i64,
        room_id: i64,
        requester_id: i64,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            room_id,
            requester_id,
            start_time,
            end_time,
            status: BookingStatus::Created,
            total_amount: None,
            deposit_amount: None,
        }
    }

    /// Half-open interval overlap: touching endpoints do not conflict
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start_time < end && self.end_time > start
    }

    /// A booking still holds its room while non-terminal
    pub fn holds_room(&self) -> bool {
        !self.status.is_terminal()
    }
}

impl std::fmt::Display for Booking {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Booking[{}] room: {}, requester: {}, status: {}, time: {} - {}",
            self.id, self.room_id, self.requester_id, self.status, self.start_time, self.end_time
        )
    }
}
