//! Time provider abstraction
//!
//! Message timestamps, contact activity and relative labels all read the
//! time through a [`Clock`] so tests can pin "now" and move it forward in
//! lockstep with a [`crate::scheduler::ManualScheduler`].
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use dealsdive::{Clock, FixedClock};
//!
//! let clock = FixedClock::new(1_704_067_200_000);
//! let before = clock.now();
//! clock.advance(Duration::from_millis(1500));
//! assert_eq!((clock.now() - before).num_milliseconds(), 1500);
//! ```

use std::fmt::Debug;
use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};

/// A time provider for getting the current instant.
pub trait Clock: Send + Sync + Debug {
    /// Returns the current instant.
    fn now(&self) -> DateTime<Utc>;

    /// Returns the current time as milliseconds since Unix epoch.
    fn now_millis(&self) -> i64 {
        self.now().timestamp_millis()
    }
}

/// Production clock backed by [`chrono::Utc::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock.
///
/// Time only moves when [`FixedClock::advance`] or [`FixedClock::set`] is
/// called, which makes message ordering and "minutes ago" labels
/// reproducible.
pub struct FixedClock {
    millis: Mutex<i64>,
}

impl FixedClock {
    /// Create a clock frozen at the given milliseconds since Unix epoch.
    pub fn new(millis: i64) -> Self {
        Self {
            millis: Mutex::new(millis),
        }
    }

    /// Create a clock frozen at the given instant.
    pub fn at(instant: DateTime<Utc>) -> Self {
        Self::new(instant.timestamp_millis())
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        let mut millis = self.millis.lock().unwrap_or_else(|e| e.into_inner());
        *millis += i64::try_from(by.as_millis()).unwrap_or(i64::MAX);
    }

    /// Set the clock to a specific time in milliseconds.
    pub fn set(&self, millis: i64) {
        *self.millis.lock().unwrap_or_else(|e| e.into_inner()) = millis;
    }

    /// Current value in milliseconds.
    pub fn get(&self) -> i64 {
        *self.millis.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(self.get())
            .single()
            .unwrap_or_default()
    }
}

impl Default for FixedClock {
    fn default() -> Self {
        // 2024-01-01 10:30:00 UTC
        Self::new(1_704_105_000_000)
    }
}

impl Debug for FixedClock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FixedClock")
            .field("millis", &self.get())
            .finish()
    }
}
