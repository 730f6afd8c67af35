//! Engine configuration
//!
//! All knobs can be overridden through environment variables:
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | BOOKING_CURRENCY | CAD | currency for every quote |
//! | BOOKING_CHECK_IN_WINDOW_MINUTES | 30 | late check-in grace window |

/// Engine configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Currency used for all computed prices
    pub currency: String,
    /// Minutes after `start_time` during which check-in is still accepted
    pub check_in_window_minutes: i64,
}

impl EngineConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self {
            currency: std::env::var("BOOKING_CURRENCY").unwrap_or_else(|_| "CAD".into()),
            check_in_window_minutes: std::env::var("BOOKING_CHECK_IN_WINDOW_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
        }
    }

    /// Check-in window as a chrono duration
    pub fn check_in_window(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.check_in_window_minutes)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            currency: "CAD".into(),
            check_in_window_minutes: 30,
        }
    }
}
