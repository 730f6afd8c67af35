//! Engine error taxonomy
//!
//! All failures are local and synchronous; nothing is retried internally.

use shared::money::MoneyError;
use thiserror::Error;

/// Engine errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookingError {
    /// Malformed input: empty interval, non-positive capacity or amount
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Unknown room, requester or booking id
    #[error("not found: {0}")]
    NotFound(String),

    /// Requested interval unavailable, or an id is already registered
    #[error("conflict: {0}")]
    Conflict(String),

    /// Lifecycle guard violated; the booking state is left untouched
    #[error("illegal transition: {0}")]
    IllegalTransition(String),

    /// Operation requires a field (e.g. a price) that is unset
    #[error("invalid state: {0}")]
    InvalidState(String),
}

impl From<MoneyError> for BookingError {
    fn from(err: MoneyError) -> Self {
        BookingError::InvalidArgument(err.to_string())
    }
}

pub type BookingResult<T> = Result<T, BookingError>;
