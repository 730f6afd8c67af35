//! Notification fanout
//!
//! Bookings are notification sources; subscribers register callback-style
//! handles and receive every lifecycle message synchronously, in
//! registration order. Delivery is best-effort: attempted once per active
//! subscriber, no retry.

use shared::booking::Booking;
use std::sync::Arc;

/// Lifecycle subscriber
///
/// `update` must not assume the booking is fully populated (prices may be
/// unset); a subscriber that cannot use a message skips it rather than
/// disrupting delivery to the rest.
pub trait BookingObserver: Send + Sync {
    fn update(&self, booking: &Booking, message: &str);
}

/// Ordered, duplicate-free set of subscriber handles for one booking
#[derive(Clone, Default)]
pub struct ObserverSet {
    observers: Vec<Arc<dyn BookingObserver>>,
}

impl ObserverSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber; re-attaching the same handle is a no-op
    pub fn attach(&mut self, observer: Arc<dyn BookingObserver>) {
        let already = self
            .observers
            .iter()
            .any(|existing| Arc::ptr_eq(existing, &observer));
        if !already {
            self.observers.push(observer);
        }
    }

    /// Remove a subscriber; detaching an absent handle is a no-op
    pub fn detach(&mut self, observer: &Arc<dyn BookingObserver>) {
        self.observers
            .retain(|existing| !Arc::ptr_eq(existing, observer));
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Snapshot of the current handles, in registration order
    ///
    /// The manager delivers from a snapshot after releasing its lock, so
    /// subscribers may call back into the manager without deadlocking.
    pub fn handles(&self) -> Vec<Arc<dyn BookingObserver>> {
        self.observers.clone()
    }

    /// Deliver a message to every subscriber, in registration order
    pub fn notify_all(&self, booking: &Booking, message: &str) {
        for observer in &self.observers {
            observer.update(booking, message);
        }
    }
}

impl std::fmt::Debug for ObserverSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverSet")
            .field("len", &self.observers.len())
            .finish()
    }
}

// ============================================================================
// Reference subscribers
// ============================================================================

/// Emails the requester about lifecycle changes (log-backed stand-in)
#[derive(Debug, Default)]
pub struct EmailNotifier;

impl BookingObserver for EmailNotifier {
    fn update(&self, booking: &Booking, message: &str) {
        tracing::info!(
            target: "notify",
            booking_id = booking.id,
            requester_id = booking.requester_id,
            status = %booking.status,
            message,
            "email notification"
        );
    }
}

/// Feeds the administrative dashboard
#[derive(Debug, Default)]
pub struct AdminDashboard;

impl BookingObserver for AdminDashboard {
    fn update(&self, booking: &Booking, message: &str) {
        tracing::info!(
            target: "notify",
            booking_id = booking.id,
            room_id = booking.room_id,
            status = %booking.status,
            message,
            "admin dashboard update"
        );
    }
}

/// Mirrors lifecycle changes to the partner portal
///
/// Only bookings that have been priced are interesting to the portal;
/// unpriced ones are skipped.
#[derive(Debug, Default)]
pub struct PartnerPortal;

impl BookingObserver for PartnerPortal {
    fn update(&self, booking: &Booking, message: &str) {
        let Some(total) = &booking.total_amount else {
            tracing::debug!(
                target: "notify",
                booking_id = booking.id,
                "partner portal skipped unpriced booking"
            );
            return;
        };
        tracing::info!(
            target: "notify",
            booking_id = booking.id,
            total = %total,
            message,
            "partner portal update"
        );
    }
}
