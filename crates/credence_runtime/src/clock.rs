//! Time sources for audit stamps.
//!
//! The kernel never reads the wall clock itself; the session façade stamps
//! every mutation through a [`Clock`], so tests and replays can run with a
//! deterministic source.

use std::time::{SystemTime, UNIX_EPOCH};

use credence_foundation::Timestamp;

/// A source of timestamps for audit stamps.
pub trait Clock {
    /// Returns the current time.
    fn now(&self) -> Timestamp;
}

/// The wall clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_nanos());
        Timestamp::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
    }
}

/// A clock frozen at one instant. Deterministic sessions and tests use this.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(Timestamp);

impl FixedClock {
    /// Creates a clock that always reports `at`.
    #[must_use]
    pub const fn new(at: Timestamp) -> Self {
        Self(at)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.0
    }
}
