//! Payment orchestration
//!
//! `PaymentService` picks the rate for the requester's category, computes
//! total and deposit quotes, and drives an injected `PaymentGateway`. The
//! gateway is a single-method capability; concrete processors live outside
//! the core.

use crate::common::error::{BookingError, BookingResult};
use crate::pricing;
use serde::{Deserialize, Serialize};
use shared::booking::Booking;
use shared::models::RequesterCategory;
use shared::money::Money;
use std::sync::Arc;

/// Payment method tag forwarded to the gateway
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Credit,
    Debit,
    Institutional,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PaymentMethod::Credit => "CREDIT",
            PaymentMethod::Debit => "DEBIT",
            PaymentMethod::Institutional => "INSTITUTIONAL",
        };
        f.write_str(name)
    }
}

/// Payment gateway capability
///
/// Implementations must settle synchronously and answer whether the charge
/// went through. Amounts handed over are always strictly positive.
pub trait PaymentGateway: Send + Sync {
    fn process(&self, method: PaymentMethod, amount: &Money) -> bool;
}

/// Reference gateway that records charges in the log and approves them
///
/// Useful for development and tests; production wiring injects a real
/// processor instead.
#[derive(Debug, Default)]
pub struct LoggingGateway;

impl PaymentGateway for LoggingGateway {
    fn process(&self, method: PaymentMethod, amount: &Money) -> bool {
        if amount.is_zero() {
            tracing::warn!(%method, "payment rejected: amount must be positive");
            return false;
        }
        tracing::info!(%method, amount = %amount, "payment processed");
        true
    }
}

/// Per-category pricing and payment orchestrator
pub struct PaymentService {
    gateway: Arc<dyn PaymentGateway>,
    currency: String,
}

impl PaymentService {
    pub fn new(gateway: Arc<dyn PaymentGateway>, currency: impl Into<String>) -> Self {
        Self {
            gateway,
            currency: currency.into(),
        }
    }

    /// Total price for the booking's span at the category rate
    pub fn calculate_price(
        &self,
        booking: &Booking,
        category: RequesterCategory,
    ) -> BookingResult<Money> {
        pricing::quote_total(category, booking.start_time, booking.end_time, &self.currency)
    }

    /// Flat per-category deposit, independent of booking length
    pub fn calculate_deposit(&self, category: RequesterCategory) -> BookingResult<Money> {
        pricing::quote_deposit(category, &self.currency)
    }

    /// Charge the deposit through the gateway
    pub fn pay_deposit(&self, booking: &Booking, method: PaymentMethod) -> BookingResult<bool> {
        let deposit = booking.deposit_amount.as_ref().ok_or_else(|| {
            BookingError::InvalidState("booking deposit amount not set".to_string())
        })?;
        tracing::debug!(booking_id = booking.id, amount = %deposit, "processing deposit");
        Ok(self.gateway.process(method, deposit))
    }

    /// Charge `total - deposit` through the gateway
    ///
    /// A remaining balance of zero or less is trivially successful and never
    /// reaches the gateway.
    pub fn pay_remaining_balance(
        &self,
        booking: &Booking,
        method: PaymentMethod,
    ) -> BookingResult<bool> {
        let total = booking
            .total_amount
            .as_ref()
            .ok_or_else(|| BookingError::InvalidState("booking total amount not set".to_string()))?;
        let deposit = booking.deposit_amount.as_ref().ok_or_else(|| {
            BookingError::InvalidState("booking deposit amount not set".to_string())
        })?;

        if total.currency() != deposit.currency() {
            return Err(BookingError::InvalidArgument(format!(
                "cannot mix currencies: {} vs {}",
                total.currency(),
                deposit.currency()
            )));
        }
        if total.amount() <= deposit.amount() {
            tracing::debug!(booking_id = booking.id, "no remaining balance to charge");
            return Ok(true);
        }

        let remaining = total.subtract(deposit)?;
        tracing::debug!(booking_id = booking.id, amount = %remaining, "processing remaining balance");
        Ok(self.gateway.process(method, &remaining))
    }
}
