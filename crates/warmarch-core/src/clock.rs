//! Clock abstraction.
//!
//! Entity mutators stamp an `updated` timestamp and battle/intrigue logs
//! record when each event happened, so time is injected rather than read
//! from the system inside domain code.

use chrono::{DateTime, Utc};

/// Abstraction over system time.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock backed by the system clock.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
