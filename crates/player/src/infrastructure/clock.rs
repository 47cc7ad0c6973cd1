//! Wall-clock time for stamping `updated_at` on saved records.

use chrono::{DateTime, Utc};

use crate::ports::outbound::ClockPort;

/// Real UTC time; tests substitute a fixed `ClockPort`.
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockPort for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
