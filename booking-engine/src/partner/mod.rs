//! External room inventory
//!
//! The manager extends its availability results with rooms sourced from an
//! `AvailabilityProvider`. The partner subsystem here is the reference
//! provider: a record store plus an adapter that translates partner records
//! into `Room`s, namespacing their ids away from internal ones.

use chrono::{DateTime, Utc};
use shared::models::{Room, RoomStatus};

/// Offset added to partner room ids so they never collide with internal ids
pub const PARTNER_ID_OFFSET: i64 = 1000;

/// Externally sourced availability
///
/// Implementations answer the same query shape as the manager's own
/// availability computation. The core does not validate or deduplicate the
/// returned rooms beyond the id namespacing the provider applies.
pub trait AvailabilityProvider: Send + Sync {
    fn find_available(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        min_capacity: i32,
    ) -> Vec<Room>;
}

/// Inventory record as the partner system reports it
#[derive(Debug, Clone)]
pub struct PartnerRoomRecord {
    pub external_id: String,
    /// "Building-Number" formatted location
    pub location: String,
    pub max_people: i32,
    pub is_active: bool,
    /// Interval already blocked on the partner side, if any
    pub booked_from: Option<DateTime<Utc>>,
    pub booked_until: Option<DateTime<Utc>>,
}

impl PartnerRoomRecord {
    fn conflicts_with(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        match (self.booked_from, self.booked_until) {
            (Some(from), Some(until)) => start < until && from < end,
            _ => false,
        }
    }
}

/// Partner-side inventory store
#[derive(Debug, Default)]
pub struct PartnerRoomSystem {
    rooms: Vec<PartnerRoomRecord>,
}

impl PartnerRoomSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_room(&mut self, record: PartnerRoomRecord) {
        self.rooms.push(record);
    }

    /// Active records whose blocked interval does not touch the query span
    pub fn query_rooms(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> Vec<&PartnerRoomRecord> {
        self.rooms
            .iter()
            .filter(|room| room.is_active && !room.conflicts_with(from, to))
            .collect()
    }
}

/// Adapter exposing the partner inventory through `AvailabilityProvider`
pub struct PartnerSystemAdapter {
    inner: PartnerRoomSystem,
}

impl PartnerSystemAdapter {
    pub fn new(inner: PartnerRoomSystem) -> Self {
        Self { inner }
    }

    /// Translate a partner record into a bookable room
    ///
    /// Ids are the digits of the external id, offset by `PARTNER_ID_OFFSET`;
    /// a location of "West-101" splits into building "West", number "101".
    fn convert(record: &PartnerRoomRecord) -> Room {
        let mut parts = record.location.splitn(2, '-');
        let building = match parts.next().filter(|p| !p.is_empty()) {
            Some(building) => building.to_string(),
            None => "Partner".to_string(),
        };
        let room_number = match parts.next() {
            Some(number) => number.to_string(),
            None => record.external_id.clone(),
        };

        let digits: String = record
            .external_id
            .chars()
            .filter(|c| c.is_ascii_digit())
            .collect();
        let id = digits.parse::<i64>().unwrap_or(0) + PARTNER_ID_OFFSET;

        Room::new(id, building, room_number, record.max_people, RoomStatus::Operable)
    }
}

impl AvailabilityProvider for PartnerSystemAdapter {
    fn find_available(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        min_capacity: i32,
    ) -> Vec<Room> {
        self.inner
            .query_rooms(start, end)
            .into_iter()
            .filter(|record| record.max_people >= min_capacity)
            .map(Self::convert)
            .collect()
    }
}
