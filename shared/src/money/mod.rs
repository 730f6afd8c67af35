//! Money value type using rust_decimal for precision
//!
//! Amounts are non-negative decimals tagged with a currency code. Arithmetic
//! between mismatched currencies fails instead of converting.

use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rounding for display (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Money arithmetic errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    #[error("cannot mix currencies: {left} vs {right}")]
    CurrencyMismatch { left: String, right: String },

    #[error("amount cannot be negative")]
    NegativeAmount,

    #[error("currency must be specified")]
    MissingCurrency,
}

/// Immutable amount + currency pair
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Money {
    amount: Decimal,
    currency: String,
}

impl Money {
    /// Build a money value; rejects negative amounts and empty currencies
    pub fn new(amount: Decimal, currency: impl Into<String>) -> Result<Self, MoneyError> {
        let currency = currency.into();
        if amount < Decimal::ZERO {
            return Err(MoneyError::NegativeAmount);
        }
        if currency.trim().is_empty() {
            return Err(MoneyError::MissingCurrency);
        }
        Ok(Self { amount, currency })
    }

    /// Zero in the given currency
    pub fn zero(currency: impl Into<String>) -> Result<Self, MoneyError> {
        Self::new(Decimal::ZERO, currency)
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Sum of two amounts in the same currency
    pub fn add(&self, other: &Money) -> Result<Money, MoneyError> {
        self.require_same_currency(other)?;
        Ok(Self {
            amount: self.amount + other.amount,
            currency: self.currency.clone(),
        })
    }

    /// Difference of two amounts in the same currency
    ///
    /// Fails with `NegativeAmount` when `other` exceeds `self`; callers that
    /// need the signed difference compare amounts first.
    pub fn subtract(&self, other: &Money) -> Result<Money, MoneyError> {
        self.require_same_currency(other)?;
        let amount = self.amount - other.amount;
        if amount < Decimal::ZERO {
            return Err(MoneyError::NegativeAmount);
        }
        Ok(Self {
            amount,
            currency: self.currency.clone(),
        })
    }

    fn require_same_currency(&self, other: &Money) -> Result<(), MoneyError> {
        if self.currency != other.currency {
            return Err(MoneyError::CurrencyMismatch {
                left: self.currency.clone(),
                right: other.currency.clone(),
            });
        }
        Ok(())
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rounded = self
            .amount
            .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
        write!(f, "{:.2} {}", rounded, self.currency)
    }
}
