//! Booking lifecycle state machine
//!
//! A pure transition table: `transition` inspects the current status, the
//! event and the clock, and returns either the outcome or an
//! `IllegalTransition` error. It never mutates anything, which keeps every
//! guard directly testable.
//!
//! ```text
//! CREATED ──checkIn (within window)──► CHECKED_IN ──complete──► COMPLETED
//!    │  │
//!    │  ├──checkIn (too late) / expire──► EXPIRED
//!    │  └──checkIn (too early): no state change, inform only
//!    └──cancel──► CANCELLED
//! ```
//!
//! COMPLETED, CANCELLED and EXPIRED are terminal; every event fails there.

use crate::common::error::{BookingError, BookingResult};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use shared::booking::BookingStatus;

/// Lifecycle events a caller can drive a booking through
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LifecycleEvent {
    CheckIn,
    Cancel,
    Complete,
    Expire,
}

impl std::fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LifecycleEvent::CheckIn => "check-in",
            LifecycleEvent::Cancel => "cancel",
            LifecycleEvent::Complete => "complete",
            LifecycleEvent::Expire => "expire",
        };
        f.write_str(name)
    }
}

/// Outcome of an accepted event
///
/// `next: None` means the event was accepted but leaves the state unchanged
/// (the early check-in case, which purely informs).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub next: Option<BookingStatus>,
    pub message: String,
}

impl Transition {
    fn to(status: BookingStatus, message: impl Into<String>) -> Self {
        Self {
            next: Some(status),
            message: message.into(),
        }
    }

    fn stay(message: impl Into<String>) -> Self {
        Self {
            next: None,
            message: message.into(),
        }
    }
}

/// Evaluate one lifecycle event against the current state
///
/// `start` is the booking's start time; `window` is the grace period after
/// `start` during which check-in is still accepted. A rejected event returns
/// an error and implies no mutation anywhere.
pub fn transition(
    current: BookingStatus,
    event: LifecycleEvent,
    now: DateTime<Utc>,
    start: DateTime<Utc>,
    window: Duration,
) -> BookingResult<Transition> {
    match (current, event) {
        (BookingStatus::Created, LifecycleEvent::CheckIn) => {
            let cutoff = start + window;
            if now < start {
                let minutes_remaining = (start - now).num_minutes();
                Ok(Transition::stay(format!(
                    "Too early to check in, {minutes_remaining} minutes remain"
                )))
            } else if now > cutoff {
                Ok(Transition::to(
                    BookingStatus::Expired,
                    "Booking expired, check-in too late",
                ))
            } else {
                Ok(Transition::to(
                    BookingStatus::CheckedIn,
                    "Booking checked in",
                ))
            }
        }
        (BookingStatus::Created, LifecycleEvent::Cancel) => {
            Ok(Transition::to(BookingStatus::Cancelled, "Booking cancelled"))
        }
        (BookingStatus::Created, LifecycleEvent::Expire) => Ok(Transition::to(
            BookingStatus::Expired,
            "Booking expired, no check-in",
        )),
        (BookingStatus::Created, LifecycleEvent::Complete) => Err(BookingError::IllegalTransition(
            "cannot complete a booking that has not been checked in".to_string(),
        )),

        (BookingStatus::CheckedIn, LifecycleEvent::Complete) => {
            Ok(Transition::to(BookingStatus::Completed, "Booking completed"))
        }
        (BookingStatus::CheckedIn, event) => Err(BookingError::IllegalTransition(format!(
            "cannot {event} a checked-in booking"
        ))),

        (terminal, event) => Err(BookingError::IllegalTransition(format!(
            "cannot {event} a booking in terminal state {terminal}"
        ))),
    }
}
