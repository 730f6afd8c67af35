//! Shared types for the room reservation system
//!
//! Pure domain data: rooms, requesters, bookings and money. Behavior
//! (availability, lifecycle, pricing, payment) lives in `booking-engine`.

pub mod booking;
pub mod models;
pub mod money;

// Re-exports
pub use booking::{Booking, BookingStatus};
pub use models::{Requester, RequesterCategory, Room, RoomStatus};
pub use money::{Money, MoneyError};
