//! Data models
//!
//! Entities owned by the reservation manager. All IDs are `i64`.

pub mod requester;
pub mod room;

// Re-exports
pub use requester::*;
pub use room::*;
