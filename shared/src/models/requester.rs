//! Requester Model
//!
//! Identity creation and validation belong to an external account provider;
//! the core only reads the category for pricing decisions.

use serde::{Deserialize, Serialize};

/// Pricing/authorization category of a requester
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequesterCategory {
    Student,
    Faculty,
    Staff,
    Partner,
    Admin,
}

/// Requester entity, referenced by bookings through its id
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Requester {
    pub id: i64,
    pub category: RequesterCategory,
}

impl Requester {
    pub fn new(id: i64, category: RequesterCategory) -> Self {
        Self { id, category }
    }
}
