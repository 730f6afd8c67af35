//! ReservationManager - single source of truth for rooms, bookings, requesters
//!
//! The manager owns the authoritative in-memory collections and serializes
//! every mutation behind one `RwLock`, so the availability check and the
//! booking insert of `create_booking`/`extend_booking` are atomic with
//! respect to each other - two racing creations for the same room and
//! interval cannot both succeed.
//!
//! # Operation flow
//!
//! ```text
//! create_booking(requester, room, [start, end))
//!     ├─ 1. Validate arguments
//!     ├─ 2. Take the write lock
//!     ├─ 3. Resolve requester and room (NotFound)
//!     ├─ 4. Conflict-check the interval against live bookings
//!     ├─ 5. Insert the booking, register default observers
//!     ├─ 6. Release the lock
//!     ├─ 7. Persist best-effort (failure is logged, not propagated)
//!     └─ 8. Return the booking
//! ```
//!
//! Collaborator calls (store, availability provider) and observer delivery
//! always happen outside the lock, so a slow collaborator cannot stall
//! writers and subscribers may safely call back into the manager.

use crate::common::error::{BookingError, BookingResult};
use crate::config::EngineConfig;
use crate::lifecycle::{self, LifecycleEvent};
use crate::notify::{BookingObserver, ObserverSet};
use crate::partner::AvailabilityProvider;
use crate::storage::{Store, StoreResult};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use shared::booking::Booking;
use shared::models::{Requester, Room, RoomStatus};
use shared::money::Money;
use std::collections::HashMap;
use std::sync::Arc;

/// Authoritative collections, guarded by the manager's lock
#[derive(Default)]
struct ManagerState {
    rooms: HashMap<i64, Room>,
    bookings: HashMap<i64, Booking>,
    requesters: HashMap<i64, Requester>,
    /// Subscriber handles per booking; the booking does not own its observers
    observers: HashMap<i64, ObserverSet>,
    next_booking_id: i64,
}

/// Reservation orchestrator
///
/// Explicitly constructed and explicitly passed - there is no global
/// instance. Configure collaborators with the `set_*` methods before
/// sharing the manager.
pub struct ReservationManager {
    config: EngineConfig,
    state: RwLock<ManagerState>,
    store: Option<Arc<dyn Store>>,
    availability_provider: Option<Arc<dyn AvailabilityProvider>>,
    /// Observers attached to every new booking at creation
    default_observers: ObserverSet,
}

impl ReservationManager {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            state: RwLock::new(ManagerState {
                next_booking_id: 1,
                ..ManagerState::default()
            }),
            store: None,
            availability_provider: None,
            default_observers: ObserverSet::new(),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(EngineConfig::default())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Configure the persistence collaborator
    ///
    /// `initialize` is invoked immediately, best-effort.
    pub fn set_store(&mut self, store: Arc<dyn Store>) {
        if let Err(e) = store.initialize() {
            tracing::error!(error = %e, "store initialization failed");
        }
        self.store = Some(store);
    }

    /// Configure the external availability provider
    pub fn set_availability_provider(&mut self, provider: Arc<dyn AvailabilityProvider>) {
        self.availability_provider = Some(provider);
    }

    /// Attach an observer that every future booking starts with
    pub fn add_default_observer(&mut self, observer: Arc<dyn BookingObserver>) {
        self.default_observers.attach(observer);
    }

    // ========== Rooms ==========

    /// Register a room (administrative action; rooms are never deleted)
    pub fn add_room(&self, room: Room) -> BookingResult<()> {
        if room.id < 0 {
            return Err(BookingError::InvalidArgument(
                "room id cannot be negative".to_string(),
            ));
        }
        if room.building.trim().is_empty() || room.room_number.trim().is_empty() {
            return Err(BookingError::InvalidArgument(
                "building and room number are required".to_string(),
            ));
        }
        if room.capacity <= 0 {
            return Err(BookingError::InvalidArgument(
                "capacity must be positive".to_string(),
            ));
        }

        {
            let mut state = self.state.write();
            if state.rooms.contains_key(&room.id) {
                return Err(BookingError::Conflict(format!(
                    "room {} already exists",
                    room.id
                )));
            }
            state.rooms.insert(room.id, room.clone());
        }

        tracing::info!(room_id = room.id, capacity = room.capacity, "room added");
        self.persist("save_room", self.store.as_ref().map(|s| s.save_room(&room)));
        Ok(())
    }

    /// Change a room's operability status
    pub fn update_room_status(&self, room_id: i64, status: RoomStatus) -> BookingResult<()> {
        let room = {
            let mut state = self.state.write();
            let room = state
                .rooms
                .get_mut(&room_id)
                .ok_or_else(|| BookingError::NotFound(format!("room {room_id}")))?;
            room.status = status;
            room.clone()
        };

        tracing::info!(room_id, status = ?status, "room status updated");
        self.persist(
            "update_room",
            self.store.as_ref().map(|s| s.update_room(&room)),
        );
        Ok(())
    }

    // ========== Requesters ==========

    /// Register a requester provided by the external account system
    pub fn register_requester(&self, requester: Requester) -> BookingResult<()> {
        {
            let mut state = self.state.write();
            if state.requesters.contains_key(&requester.id) {
                return Err(BookingError::Conflict(format!(
                    "requester {} already exists",
                    requester.id
                )));
            }
            state.requesters.insert(requester.id, requester);
        }

        tracing::info!(requester_id = requester.id, category = ?requester.category, "requester registered");
        self.persist(
            "save_requester",
            self.store.as_ref().map(|s| s.save_requester(&requester)),
        );
        Ok(())
    }

    // ========== Availability ==========

    /// Rooms free over `[start, end)` with at least `min_capacity` seats
    ///
    /// Internal rooms are merged with whatever the availability provider
    /// returns; the provider namespaces its ids, so no deduplication happens
    /// here. Read-only.
    pub fn find_available(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        min_capacity: i32,
    ) -> BookingResult<Vec<Room>> {
        validate_interval(start, end)?;
        if min_capacity <= 0 {
            return Err(BookingError::InvalidArgument(
                "capacity must be positive".to_string(),
            ));
        }

        let mut available = {
            let state = self.state.read();
            let mut rooms: Vec<Room> = state
                .rooms
                .values()
                .filter(|room| {
                    room.capacity >= min_capacity
                        && room.is_operable()
                        && room_is_free(&state, room.id, start, end, None)
                })
                .cloned()
                .collect();
            rooms.sort_by_key(|room| room.id);
            rooms
        };

        // Partner rooms are appended outside the lock; their ids are
        // namespaced by the provider
        if let Some(provider) = &self.availability_provider {
            available.extend(provider.find_available(start, end, min_capacity));
        }

        Ok(available)
    }

    // ========== Bookings ==========

    /// Create a booking for `[start, end)` on the given room
    ///
    /// The conflict check and the insert run under one write lock: racing
    /// creations for the same room cannot both observe "available".
    pub fn create_booking(
        &self,
        requester_id: i64,
        room_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> BookingResult<Booking> {
        validate_interval(start, end)?;

        let booking = {
            let mut state = self.state.write();
            if !state.requesters.contains_key(&requester_id) {
                return Err(BookingError::NotFound(format!("requester {requester_id}")));
            }
            let room = state
                .rooms
                .get(&room_id)
                .ok_or_else(|| BookingError::NotFound(format!("room {room_id}")))?;

            if !room.is_operable() || !room_is_free(&state, room_id, start, end, None) {
                return Err(BookingError::Conflict(format!(
                    "room {room_id} is not available for the requested time period"
                )));
            }

            let id = state.next_booking_id;
            state.next_booking_id += 1;

            let booking = Booking::new(id, room_id, requester_id, start, end);
            state.bookings.insert(id, booking.clone());
            state.observers.insert(id, self.default_observers.clone());
            booking
        };

        tracing::info!(
            booking_id = booking.id,
            room_id,
            requester_id,
            "booking created"
        );
        self.persist(
            "save_booking",
            self.store.as_ref().map(|s| s.save_booking(&booking)),
        );
        Ok(booking)
    }

    /// Move a booking's end forward, conflict-checking only the delta
    /// interval `[old_end, new_end)`
    pub fn extend_booking(&self, booking_id: i64, new_end: DateTime<Utc>) -> BookingResult<()> {
        let (booking, handles) = {
            let mut state = self.state.write();
            let current = state
                .bookings
                .get(&booking_id)
                .ok_or_else(|| BookingError::NotFound(format!("booking {booking_id}")))?;

            let old_end = current.end_time;
            if new_end <= old_end {
                return Err(BookingError::InvalidArgument(
                    "new end time must be after current end time".to_string(),
                ));
            }

            let room_id = current.room_id;
            let room = state
                .rooms
                .get(&room_id)
                .ok_or_else(|| BookingError::NotFound(format!("room {room_id}")))?;
            if !room.is_operable()
                || !room_is_free(&state, room_id, old_end, new_end, Some(booking_id))
            {
                return Err(BookingError::Conflict(format!(
                    "room {room_id} is not available for the extension period"
                )));
            }

            let booking = state
                .bookings
                .get_mut(&booking_id)
                .ok_or_else(|| BookingError::NotFound(format!("booking {booking_id}")))?;
            booking.end_time = new_end;
            let booking = booking.clone();
            let handles = self.handles_for(&state, booking_id);
            (booking, handles)
        };

        tracing::info!(booking_id, new_end = %new_end, "booking extended");
        self.persist(
            "update_booking",
            self.store.as_ref().map(|s| s.update_booking(&booking)),
        );
        deliver(&handles, &booking, &format!("Booking extended until {new_end}"));
        Ok(())
    }

    /// Attach the total computed by the payment orchestrator
    pub fn set_booking_total(&self, booking_id: i64, total: Money) -> BookingResult<()> {
        self.set_amount(booking_id, |booking| booking.total_amount = Some(total))
    }

    /// Attach the deposit computed by the payment orchestrator
    pub fn set_booking_deposit(&self, booking_id: i64, deposit: Money) -> BookingResult<()> {
        self.set_amount(booking_id, |booking| booking.deposit_amount = Some(deposit))
    }

    fn set_amount(
        &self,
        booking_id: i64,
        apply: impl FnOnce(&mut Booking),
    ) -> BookingResult<()> {
        let booking = {
            let mut state = self.state.write();
            let booking = state
                .bookings
                .get_mut(&booking_id)
                .ok_or_else(|| BookingError::NotFound(format!("booking {booking_id}")))?;
            apply(booking);
            booking.clone()
        };

        self.persist(
            "update_booking",
            self.store.as_ref().map(|s| s.update_booking(&booking)),
        );
        Ok(())
    }

    // ========== Lifecycle ==========

    /// Drive the check-in event; may expire a too-late booking
    pub fn check_in(&self, booking_id: i64) -> BookingResult<()> {
        self.apply_event(booking_id, LifecycleEvent::CheckIn)
    }

    /// Cancel a booking (only legal before check-in)
    pub fn cancel_booking(&self, booking_id: i64) -> BookingResult<()> {
        self.apply_event(booking_id, LifecycleEvent::Cancel)
    }

    /// Complete a checked-in booking
    pub fn complete_booking(&self, booking_id: i64) -> BookingResult<()> {
        self.apply_event(booking_id, LifecycleEvent::Complete)
    }

    /// Expire a booking that was never checked in
    ///
    /// Expiry is caller-driven; nothing in the engine sweeps on a timer.
    pub fn expire_booking(&self, booking_id: i64) -> BookingResult<()> {
        self.apply_event(booking_id, LifecycleEvent::Expire)
    }

    fn apply_event(&self, booking_id: i64, event: LifecycleEvent) -> BookingResult<()> {
        let now = Utc::now();

        let (booking, handles, message, changed) = {
            let mut state = self.state.write();
            let booking = state
                .bookings
                .get_mut(&booking_id)
                .ok_or_else(|| BookingError::NotFound(format!("booking {booking_id}")))?;

            let outcome = lifecycle::transition(
                booking.status,
                event,
                now,
                booking.start_time,
                self.config.check_in_window(),
            )?;

            let changed = outcome.next.is_some();
            if let Some(next) = outcome.next {
                booking.status = next;
            }
            let booking = booking.clone();
            let handles = self.handles_for(&state, booking_id);
            (booking, handles, outcome.message, changed)
        };

        tracing::info!(
            booking_id,
            event = %event,
            status = %booking.status,
            changed,
            "lifecycle event applied"
        );
        if changed {
            self.persist(
                "update_booking",
                self.store.as_ref().map(|s| s.update_booking(&booking)),
            );
        }
        deliver(&handles, &booking, &message);
        Ok(())
    }

    // ========== Observers ==========

    /// Subscribe an observer to one booking's lifecycle messages
    pub fn attach_observer(
        &self,
        booking_id: i64,
        observer: Arc<dyn BookingObserver>,
    ) -> BookingResult<()> {
        let mut state = self.state.write();
        if !state.bookings.contains_key(&booking_id) {
            return Err(BookingError::NotFound(format!("booking {booking_id}")));
        }
        state.observers.entry(booking_id).or_default().attach(observer);
        Ok(())
    }

    /// Unsubscribe an observer; absent handles are ignored
    pub fn detach_observer(
        &self,
        booking_id: i64,
        observer: &Arc<dyn BookingObserver>,
    ) -> BookingResult<()> {
        let mut state = self.state.write();
        if !state.bookings.contains_key(&booking_id) {
            return Err(BookingError::NotFound(format!("booking {booking_id}")));
        }
        if let Some(set) = state.observers.get_mut(&booking_id) {
            set.detach(observer);
        }
        Ok(())
    }

    /// Number of observers currently attached to a booking
    pub fn observer_count(&self, booking_id: i64) -> BookingResult<usize> {
        let state = self.state.read();
        if !state.bookings.contains_key(&booking_id) {
            return Err(BookingError::NotFound(format!("booking {booking_id}")));
        }
        Ok(state.observers.get(&booking_id).map_or(0, ObserverSet::len))
    }

    // ========== Queries ==========

    pub fn room(&self, room_id: i64) -> Option<Room> {
        self.state.read().rooms.get(&room_id).cloned()
    }

    pub fn booking(&self, booking_id: i64) -> Option<Booking> {
        self.state.read().bookings.get(&booking_id).cloned()
    }

    pub fn requester(&self, requester_id: i64) -> Option<Requester> {
        self.state.read().requesters.get(&requester_id).copied()
    }

    pub fn rooms(&self) -> Vec<Room> {
        let state = self.state.read();
        let mut rooms: Vec<Room> = state.rooms.values().cloned().collect();
        rooms.sort_by_key(|room| room.id);
        rooms
    }

    pub fn bookings(&self) -> Vec<Booking> {
        let state = self.state.read();
        let mut bookings: Vec<Booking> = state.bookings.values().cloned().collect();
        bookings.sort_by_key(|booking| booking.id);
        bookings
    }

    pub fn requesters(&self) -> Vec<Requester> {
        let state = self.state.read();
        let mut requesters: Vec<Requester> = state.requesters.values().copied().collect();
        requesters.sort_by_key(|requester| requester.id);
        requesters
    }

    pub fn bookings_for_requester(&self, requester_id: i64) -> Vec<Booking> {
        let state = self.state.read();
        let mut bookings: Vec<Booking> = state
            .bookings
            .values()
            .filter(|booking| booking.requester_id == requester_id)
            .cloned()
            .collect();
        bookings.sort_by_key(|booking| booking.id);
        bookings
    }

    // ========== Internals ==========

    fn handles_for(&self, state: &ManagerState, booking_id: i64) -> Vec<Arc<dyn BookingObserver>> {
        state
            .observers
            .get(&booking_id)
            .map(ObserverSet::handles)
            .unwrap_or_default()
    }

    /// Log a failed store write; in-memory state stays authoritative
    fn persist(&self, op: &str, result: Option<StoreResult<()>>) {
        if let Some(Err(e)) = result {
            tracing::error!(error = %e, op, "store write failed, in-memory state remains authoritative");
        }
    }
}

impl std::fmt::Debug for ReservationManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReservationManager")
            .field("config", &self.config)
            .field("has_store", &self.store.is_some())
            .field("has_provider", &self.availability_provider.is_some())
            .finish()
    }
}

/// `start < end` on a half-open interval
fn validate_interval(start: DateTime<Utc>, end: DateTime<Utc>) -> BookingResult<()> {
    if start >= end {
        return Err(BookingError::InvalidArgument(
            "start time must be before end time".to_string(),
        ));
    }
    Ok(())
}

/// No non-terminal booking on `room_id` overlaps `[start, end)`
///
/// `exclude` skips the booking being extended so it cannot conflict with
/// itself.
fn room_is_free(
    state: &ManagerState,
    room_id: i64,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    exclude: Option<i64>,
) -> bool {
    !state.bookings.values().any(|booking| {
        booking.room_id == room_id
            && Some(booking.id) != exclude
            && booking.holds_room()
            && booking.overlaps(start, end)
    })
}

/// Synchronous best-effort fanout, in registration order
fn deliver(handles: &[Arc<dyn BookingObserver>], booking: &Booking, message: &str) {
    for observer in handles {
        observer.update(booking, message);
    }
}

#[cfg(test)]
mod tests;
