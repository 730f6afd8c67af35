//! Category pricing
//!
//! A static hourly rate table keyed by requester category. Billing rounds
//! the booked duration up to whole hours with a floor of one billed hour,
//! so a ten-minute booking still pays for one full hour.

use crate::common::error::{BookingError, BookingResult};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shared::models::RequesterCategory;
use shared::money::Money;

/// Seconds per billed hour
const HOUR_SECONDS: i64 = 3600;

/// Hourly rate for categories without their own entry (Admin included)
const FALLBACK_RATE: i64 = 50;

/// Hourly rate table
///
/// Admin deliberately shares the fallback rate rather than carrying its own
/// entry; adding a category without a rate keeps the system priceable.
pub fn hourly_rate(category: RequesterCategory) -> Decimal {
    let rate = match category {
        RequesterCategory::Student => 20,
        RequesterCategory::Faculty => 30,
        RequesterCategory::Staff => 40,
        RequesterCategory::Partner => 50,
        RequesterCategory::Admin => FALLBACK_RATE,
    };
    Decimal::from(rate)
}

/// Whole billed hours for a span: ceiling, with a one-hour floor
pub fn billed_hours(start: DateTime<Utc>, end: DateTime<Utc>) -> BookingResult<i64> {
    if start >= end {
        return Err(BookingError::InvalidArgument(
            "start time must be before end time".to_string(),
        ));
    }
    let seconds = (end - start).num_seconds();
    let hours = (seconds + HOUR_SECONDS - 1) / HOUR_SECONDS;
    Ok(hours.max(1))
}

/// Total price for a span at the category's hourly rate
pub fn quote_total(
    category: RequesterCategory,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    currency: &str,
) -> BookingResult<Money> {
    let hours = billed_hours(start, end)?;
    let amount = hourly_rate(category) * Decimal::from(hours);
    Ok(Money::new(amount, currency)?)
}

/// Deposit: a single hour at the category rate, independent of span length
pub fn quote_deposit(category: RequesterCategory, currency: &str) -> BookingResult<Money> {
    Ok(Money::new(hourly_rate(category), currency)?)
}
