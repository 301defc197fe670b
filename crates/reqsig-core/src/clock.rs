//! Wall-clock capability used for signing and verifying timestamps.
//!
//! Signing stamps requests with the current Unix time and verification compares
//! against it. Both go through [`Clock`] so callers (and tests) can pin time
//! instead of reading the process clock.

use chrono::Utc;

/// Source of the current Unix time in whole seconds.
pub trait Clock: Send + Sync {
    /// Current time as seconds since the Unix epoch.
    fn now_unix_secs(&self) -> i64;
}

/// The process wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unix_secs(&self) -> i64 {
        Utc::now().timestamp()
    }
}

/// A clock frozen at a fixed instant.
///
/// # Examples
///
/// ```
/// use reqsig_core::{Clock, FixedClock};
///
/// let clock = FixedClock::new(1_700_000_000);
/// assert_eq!(clock.now_unix_secs(), 1_700_000_000);
/// assert_eq!(clock.advanced_by(5).now_unix_secs(), 1_700_000_005);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(i64);

impl FixedClock {
    /// Create a clock that always reports `unix_secs`.
    #[must_use]
    pub const fn new(unix_secs: i64) -> Self {
        Self(unix_secs)
    }

    /// A copy of this clock moved `secs` seconds forward (or back, if negative).
    #[must_use]
    pub const fn advanced_by(self, secs: i64) -> Self {
        Self(self.0 + secs)
    }
}

impl Clock for FixedClock {
    fn now_unix_secs(&self) -> i64 {
        self.0
    }
}
