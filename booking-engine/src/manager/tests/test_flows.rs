use super::*;
use crate::payment::{PaymentGateway, PaymentMethod, PaymentService};
use rust_decimal::Decimal;

// ========================================================================
// Extension
// ========================================================================

#[test]
fn test_extend_booking_moves_end_and_notifies() {
    let manager = create_test_manager();
    let booking = manager.create_booking(1, 1, at(10), at(11)).unwrap();

    let recorder = Recorder::new();
    manager.attach_observer(booking.id, recorder.clone()).unwrap();

    manager.extend_booking(booking.id, at(12)).unwrap();
    assert_eq!(manager.booking(booking.id).unwrap().end_time, at(12));

    let message = recorder.last_message().unwrap();
    assert!(message.starts_with("Booking extended until"), "{message}");
}

#[test]
fn test_extend_into_booked_interval_conflicts() {
    let manager = create_test_manager();
    manager
        .register_requester(Requester::new(2, RequesterCategory::Staff))
        .unwrap();

    let mine = manager.create_booking(1, 1, at(10), at(11)).unwrap();
    manager.create_booking(2, 1, at(11), at(13)).unwrap();

    let err = manager.extend_booking(mine.id, at(13)).unwrap_err();
    assert!(matches!(err, BookingError::Conflict(_)));

    // The original end is untouched
    assert_eq!(manager.booking(mine.id).unwrap().end_time, at(11));
}

#[test]
fn test_extend_checks_only_the_delta_interval() {
    let manager = create_test_manager();
    // [8,9) is booked by someone else, but the delta [11,12) is free
    manager
        .register_requester(Requester::new(2, RequesterCategory::Staff))
        .unwrap();
    manager.create_booking(2, 1, at(8), at(9)).unwrap();

    let mine = manager.create_booking(1, 1, at(10), at(11)).unwrap();
    manager.extend_booking(mine.id, at(12)).unwrap();
    assert_eq!(manager.booking(mine.id).unwrap().end_time, at(12));
}

#[test]
fn test_extend_rejects_non_forward_end() {
    let manager = create_test_manager();
    let booking = manager.create_booking(1, 1, at(10), at(12)).unwrap();

    let err = manager.extend_booking(booking.id, at(11)).unwrap_err();
    assert!(matches!(err, BookingError::InvalidArgument(_)));

    let err = manager.extend_booking(booking.id, at(12)).unwrap_err();
    assert!(matches!(err, BookingError::InvalidArgument(_)));
}

#[test]
fn test_extend_unknown_booking() {
    let manager = create_test_manager();
    let err = manager.extend_booking(42, at(12)).unwrap_err();
    assert!(matches!(err, BookingError::NotFound(_)));
}

// ========================================================================
// Observer registration
// ========================================================================

#[test]
fn test_attach_detach_round_trip() {
    let manager = create_test_manager();
    let booking = manager.create_booking(1, 1, at(10), at(11)).unwrap();

    let recorder = Recorder::new();
    let handle: Arc<dyn BookingObserver> = recorder;

    manager.attach_observer(booking.id, handle.clone()).unwrap();
    assert_eq!(manager.observer_count(booking.id).unwrap(), 1);

    manager.detach_observer(booking.id, &handle).unwrap();
    assert_eq!(manager.observer_count(booking.id).unwrap(), 0);
}

#[test]
fn test_duplicate_attach_keeps_one_entry() {
    let manager = create_test_manager();
    let booking = manager.create_booking(1, 1, at(10), at(11)).unwrap();

    let handle: Arc<dyn BookingObserver> = Recorder::new();
    manager.attach_observer(booking.id, handle.clone()).unwrap();
    manager.attach_observer(booking.id, handle).unwrap();
    assert_eq!(manager.observer_count(booking.id).unwrap(), 1);
}

#[test]
fn test_observer_calls_on_unknown_booking() {
    let manager = create_test_manager();
    let handle: Arc<dyn BookingObserver> = Recorder::new();

    assert!(matches!(
        manager.attach_observer(9, handle.clone()).unwrap_err(),
        BookingError::NotFound(_)
    ));
    assert!(matches!(
        manager.detach_observer(9, &handle).unwrap_err(),
        BookingError::NotFound(_)
    ));
}

#[test]
fn test_default_observers_cover_new_bookings() {
    let recorder = Recorder::new();
    let mut manager = ReservationManager::with_defaults();
    manager.add_default_observer(recorder.clone());
    manager
        .add_room(Room::new(1, "Main", "101", 4, RoomStatus::Operable))
        .unwrap();
    manager
        .register_requester(Requester::new(1, RequesterCategory::Student))
        .unwrap();

    let booking = manager.create_booking(1, 1, at(10), at(11)).unwrap();
    manager.cancel_booking(booking.id).unwrap();

    assert_eq!(recorder.messages(), vec!["Booking cancelled"]);
}

// ========================================================================
// Store integration
// ========================================================================

#[test]
fn test_mutations_reach_the_store() {
    let store = Arc::new(MemoryStore::new());
    let mut manager = ReservationManager::with_defaults();
    manager.set_store(store.clone());

    manager
        .add_room(Room::new(1, "Main", "101", 4, RoomStatus::Operable))
        .unwrap();
    manager
        .register_requester(Requester::new(1, RequesterCategory::Student))
        .unwrap();
    let booking = manager.create_booking(1, 1, at(10), at(11)).unwrap();
    manager.cancel_booking(booking.id).unwrap();

    assert_eq!(store.load_all_rooms().unwrap().len(), 1);
    assert_eq!(store.load_all_requesters().unwrap().len(), 1);
    let stored = store.load_all_bookings().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].status, BookingStatus::Cancelled);
}

#[test]
fn test_store_failures_do_not_unwind_operations() {
    let mut manager = ReservationManager::with_defaults();
    manager.set_store(Arc::new(FailingStore));

    manager
        .add_room(Room::new(1, "Main", "101", 4, RoomStatus::Operable))
        .unwrap();
    manager
        .register_requester(Requester::new(1, RequesterCategory::Student))
        .unwrap();
    let booking = manager.create_booking(1, 1, at(10), at(11)).unwrap();

    // In-memory state is authoritative despite the dead store
    assert!(manager.booking(booking.id).is_some());
    manager.cancel_booking(booking.id).unwrap();
    assert_eq!(manager.booking(booking.id).unwrap().status, BookingStatus::Cancelled);
}

// ========================================================================
// Pricing and payment flow
// ========================================================================

/// Gateway double that counts charges
#[derive(Default)]
struct CountingGateway {
    charges: Mutex<Vec<Money>>,
}

impl PaymentGateway for CountingGateway {
    fn process(&self, _method: PaymentMethod, amount: &Money) -> bool {
        self.charges.lock().push(amount.clone());
        true
    }
}

#[test]
fn test_full_booking_payment_flow() {
    let manager = create_test_manager();
    let gateway = Arc::new(CountingGateway::default());
    let payments = PaymentService::new(gateway.clone(), "CAD");

    let booking = manager.create_booking(1, 1, at(10), at(13)).unwrap();
    let category = manager.requester(booking.requester_id).unwrap().category;

    let total = payments.calculate_price(&booking, category).unwrap();
    let deposit = payments.calculate_deposit(category).unwrap();
    manager.set_booking_total(booking.id, total).unwrap();
    manager.set_booking_deposit(booking.id, deposit).unwrap();

    let booking = manager.booking(booking.id).unwrap();
    // Student: 3 hours at 20/h, one hour deposit
    assert_eq!(
        booking.total_amount.as_ref().unwrap().amount(),
        Decimal::from(60)
    );
    assert_eq!(
        booking.deposit_amount.as_ref().unwrap().amount(),
        Decimal::from(20)
    );

    assert!(payments.pay_deposit(&booking, PaymentMethod::Credit).unwrap());
    assert!(
        payments
            .pay_remaining_balance(&booking, PaymentMethod::Credit)
            .unwrap()
    );

    let charges = gateway.charges.lock();
    assert_eq!(charges.len(), 2);
    assert_eq!(charges[0].amount(), Decimal::from(20));
    assert_eq!(charges[1].amount(), Decimal::from(40));
}

#[test]
fn test_payment_before_pricing_is_invalid_state() {
    let manager = create_test_manager();
    let payments = PaymentService::new(Arc::new(CountingGateway::default()), "CAD");

    let booking = manager.create_booking(1, 1, at(10), at(11)).unwrap();
    let err = payments
        .pay_deposit(&booking, PaymentMethod::Credit)
        .unwrap_err();
    assert!(matches!(err, BookingError::InvalidState(_)));
}
