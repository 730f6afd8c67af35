//! Store collaborator contract
//!
//! Persistence lives outside the core. The manager calls a configured store
//! best-effort after each mutation: a failing store call is logged and never
//! unwinds the in-memory operation, because in-memory state is the source of
//! truth for the running process.

use parking_lot::Mutex;
use shared::booking::Booking;
use shared::models::{Requester, Room};
use std::collections::HashMap;
use thiserror::Error;

/// Storage errors
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("record not found: {0}")]
    NotFound(String),

    #[error("backend error: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence capability for the manager's three entity collections
pub trait Store: Send + Sync {
    fn initialize(&self) -> StoreResult<()>;

    fn save_room(&self, room: &Room) -> StoreResult<()>;
    fn load_all_rooms(&self) -> StoreResult<Vec<Room>>;
    fn update_room(&self, room: &Room) -> StoreResult<()>;
    fn delete_room(&self, room_id: i64) -> StoreResult<()>;

    fn save_booking(&self, booking: &Booking) -> StoreResult<()>;
    fn load_all_bookings(&self) -> StoreResult<Vec<Booking>>;
    fn update_booking(&self, booking: &Booking) -> StoreResult<()>;
    fn delete_booking(&self, booking_id: i64) -> StoreResult<()>;

    fn save_requester(&self, requester: &Requester) -> StoreResult<()>;
    fn load_all_requesters(&self) -> StoreResult<Vec<Requester>>;
    fn update_requester(&self, requester: &Requester) -> StoreResult<()>;
    fn delete_requester(&self, requester_id: i64) -> StoreResult<()>;

    fn clear_all(&self) -> StoreResult<()>;
}

/// In-memory store
///
/// Backs tests and simple embedders; a durable implementation is expected to
/// live in the embedding application.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rooms: Mutex<HashMap<i64, Room>>,
    bookings: Mutex<HashMap<i64, Booking>>,
    requesters: Mutex<HashMap<i64, Requester>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn initialize(&self) -> StoreResult<()> {
        Ok(())
    }

    fn save_room(&self, room: &Room) -> StoreResult<()> {
        self.rooms.lock().insert(room.id, room.clone());
        Ok(())
    }

    fn load_all_rooms(&self) -> StoreResult<Vec<Room>> {
        Ok(self.rooms.lock().values().cloned().collect())
    }

    fn update_room(&self, room: &Room) -> StoreResult<()> {
        let mut rooms = self.rooms.lock();
        if !rooms.contains_key(&room.id) {
            return Err(StoreError::NotFound(format!("room {}", room.id)));
        }
        rooms.insert(room.id, room.clone());
        Ok(())
    }

    fn delete_room(&self, room_id: i64) -> StoreResult<()> {
        self.rooms.lock().remove(&room_id);
        Ok(())
    }

    fn save_booking(&self, booking: &Booking) -> StoreResult<()> {
        self.bookings.lock().insert(booking.id, booking.clone());
        Ok(())
    }

    fn load_all_bookings(&self) -> StoreResult<Vec<Booking>> {
        Ok(self.bookings.lock().values().cloned().collect())
    }

    fn update_booking(&self, booking: &Booking) -> StoreResult<()> {
        let mut bookings = self.bookings.lock();
        if !bookings.contains_key(&booking.id) {
            return Err(StoreError::NotFound(format!("booking {}", booking.id)));
        }
        bookings.insert(booking.id, booking.clone());
        Ok(())
    }

    fn delete_booking(&self, booking_id: i64) -> StoreResult<()> {
        self.bookings.lock().remove(&booking_id);
        Ok(())
    }

    fn save_requester(&self, requester: &Requester) -> StoreResult<()> {
        self.requesters.lock().insert(requester.id, *requester);
        Ok(())
    }

    fn load_all_requesters(&self) -> StoreResult<Vec<Requester>> {
        Ok(self.requesters.lock().values().copied().collect())
    }

    fn update_requester(&self, requester: &Requester) -> StoreResult<()> {
        let mut requesters = self.requesters.lock();
        if !requesters.contains_key(&requester.id) {
            return Err(StoreError::NotFound(format!("requester {}", requester.id)));
        }
        requesters.insert(requester.id, *requester);
        Ok(())
    }

    fn delete_requester(&self, requester_id: i64) -> StoreResult<()> {
        self.requesters.lock().remove(&requester_id);
        Ok(())
    }

    fn clear_all(&self) -> StoreResult<()> {
        self.rooms.lock().clear();
        self.bookings.lock().clear();
        self.requesters.lock().clear();
        Ok(())
    }
}
