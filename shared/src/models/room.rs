//! Room Model

use serde::{Deserialize, Serialize};

/// Operability status of a room
///
/// A room is only offered for new bookings while `Operable`. Disabled and
/// Maintenance rooms stay registered so existing bookings keep resolving.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoomStatus {
    #[default]
    Operable,
    Disabled,
    Maintenance,
}

/// Bookable room entity
///
/// Created once by an administrative action and never deleted, only disabled.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Room {
    pub id: i64,
    pub building: String,
    pub room_number: String,
    pub capacity: i32,
    pub status: RoomStatus,
}

impl Room {
    pub fn new(
        id: i64,
        building: impl Into<String>,
        room_number: impl Into<String>,
        capacity: i32,
        status: RoomStatus,
    ) -> Self {
        Self {
            id,
            building: building.into(),
            room_number: room_number.into(),
            capacity,
            status,
        }
    }

    pub fn is_operable(&self) -> bool {
        self.status == RoomStatus::Operable
    }
}

impl std::fmt::Display for Room {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Room[{}] {}-{} (cap: {}, status: {:?})",
            self.id, self.building, self.room_number, self.capacity, self.status
        )
    }
}
