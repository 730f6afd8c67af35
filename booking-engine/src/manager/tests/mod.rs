use super::*;
use crate::notify::BookingObserver;
use crate::partner::AvailabilityProvider;
use crate::storage::{MemoryStore, StoreError};
use chrono::{Duration, TimeZone};
use parking_lot::Mutex;
use shared::booking::BookingStatus;
use shared::models::RequesterCategory;

mod test_flows;

fn create_test_manager() -> ReservationManager {
    let manager = ReservationManager::with_defaults();
    manager
        .add_room(Room::new(1, "Main", "101", 4, RoomStatus::Operable))
        .unwrap();
    manager
        .register_requester(Requester::new(1, RequesterCategory::Student))
        .unwrap();
    manager
}

/// 10:00 on a fixed day, offset by whole hours
fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 10, hour, 0, 0).unwrap()
}

fn at_minutes(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 10, hour, minute, 0).unwrap()
}

/// Observer double that records delivered messages
#[derive(Default)]
struct Recorder {
    seen: Mutex<Vec<(i64, String)>>,
}

impl Recorder {
    fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn messages(&self) -> Vec<String> {
        self.seen.lock().iter().map(|(_, m)| m.clone()).collect()
    }

    fn last_message(&self) -> Option<String> {
        self.seen.lock().last().map(|(_, m)| m.clone())
    }
}

impl BookingObserver for Recorder {
    fn update(&self, booking: &Booking, message: &str) {
        self.seen.lock().push((booking.id, message.to_string()));
    }
}

/// Provider double returning a fixed room list
struct FixedProvider {
    rooms: Vec<Room>,
}

impl AvailabilityProvider for FixedProvider {
    fn find_available(&self, _start: DateTime<Utc>, _end: DateTime<Utc>, _min: i32) -> Vec<Room> {
        self.rooms.clone()
    }
}

/// Store double whose every call fails
struct FailingStore;

impl Store for FailingStore {
    fn initialize(&self) -> StoreResult<()> {
        Err(StoreError::Backend("store offline".into()))
    }

    fn save_room(&self, _: &Room) -> StoreResult<()> {
        Err(StoreError::Backend("store offline".into()))
    }

    fn load_all_rooms(&self) -> StoreResult<Vec<Room>> {
        Err(StoreError::Backend("store offline".into()))
    }

    fn update_room(&self, _: &Room) -> StoreResult<()> {
        Err(StoreError::Backend("store offline".into()))
    }

    fn delete_room(&self, _: i64) -> StoreResult<()> {
        Err(StoreError::Backend("store offline".into()))
    }

    fn save_booking(&self, _: &Booking) -> StoreResult<()> {
        Err(StoreError::Backend("store offline".into()))
    }

    fn load_all_bookings(&self) -> StoreResult<Vec<Booking>> {
        Err(StoreError::Backend("store offline".into()))
    }

    fn update_booking(&self, _: &Booking) -> StoreResult<()> {
        Err(StoreError::Backend("store offline".into()))
    }

    fn delete_booking(&self, _: i64) -> StoreResult<()> {
        Err(StoreError::Backend("store offline".into()))
    }

    fn save_requester(&self, _: &Requester) -> StoreResult<()> {
        Err(StoreError::Backend("store offline".into()))
    }

    fn load_all_requesters(&self) -> StoreResult<Vec<Requester>> {
        Err(StoreError::Backend("store offline".into()))
    }

    fn update_requester(&self, _: &Requester) -> StoreResult<()> {
        Err(StoreError::Backend("store offline".into()))
    }

    fn delete_requester(&self, _: i64) -> StoreResult<()> {
        Err(StoreError::Backend("store offline".into()))
    }

    fn clear_all(&self) -> StoreResult<()> {
        Err(StoreError::Backend("store offline".into()))
    }
}
