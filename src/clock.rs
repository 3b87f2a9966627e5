//! Whole-second time base for the control loop.
//!
//! The controller never reads the clock itself. Callers pass a [`Timestamp`]
//! into every update, either from their own scheduler or from a [`Clock`].

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A point in time, counted in whole seconds from an arbitrary origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timestamp(u64);

impl Timestamp {
    /// Tick zero of the time base
    pub const ZERO: Timestamp = Timestamp(0);

    /// Create a timestamp from whole seconds
    pub const fn from_secs(secs: u64) -> Self {
        Timestamp(secs)
    }

    /// Whole seconds since the origin
    pub const fn as_secs(self) -> u64 {
        self.0
    }

    /// Seconds elapsed since `earlier`, or `None` if the clock did not move forward.
    pub fn seconds_since(self, earlier: Timestamp) -> Option<u64> {
        match self.0.checked_sub(earlier.0) {
            Some(0) | None => None,
            Some(dt) => Some(dt),
        }
    }

    /// Saturating forward step.
    pub fn advanced_by(self, secs: u64) -> Self {
        Timestamp(self.0.saturating_add(secs))
    }
}

impl From<u64> for Timestamp {
    fn from(secs: u64) -> Self {
        Timestamp(secs)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

/// Source of the current time for [`HeaterPid::update_with`](crate::HeaterPid::update_with).
pub trait Clock {
    /// Current time
    fn now(&self) -> Timestamp;
}

impl<F> Clock for F
where
    F: Fn() -> Timestamp,
{
    fn now(&self) -> Timestamp {
        self()
    }
}

/// Wall clock in seconds since the Unix epoch.
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[cfg(feature = "std")]
impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        // A clock set before 1970 reads as tick zero.
        let secs = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Timestamp(secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seconds_since() {
        let t = Timestamp::from_secs(10);
        assert_eq!(t.seconds_since(Timestamp::from_secs(7)), Some(3));
        assert_eq!(t.seconds_since(t), None);
        assert_eq!(t.seconds_since(Timestamp::from_secs(11)), None);
    }

    #[test]
    fn test_closure_clock() {
        let clock = || Timestamp::from_secs(42);
        assert_eq!(clock.now().as_secs(), 42);
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_system_clock_is_past_epoch() {
        assert!(SystemClock.now() > Timestamp::ZERO);
    }
}
