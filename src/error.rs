#[cfg(not(feature = "std"))]
use core::fmt;

#[cfg(feature = "std")]
use thiserror::Error;

use crate::clock::Timestamp;

/// Errors reported by the heater controller.
///
/// `update` only ever fails with [`PidError::NonPositiveInterval`]; the other
/// variants come from [`PidConfig::validate`](crate::PidConfig::validate) and
/// [`PidBuilder::try_build`](crate::PidBuilder::try_build).
#[cfg_attr(feature = "std", derive(Error))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub enum PidError {
    /// The clock did not advance since the previous update.
    #[cfg_attr(
        feature = "std",
        error("sample time did not advance (last {last}, now {now})")
    )]
    NonPositiveInterval {
        /// Time of the last accepted update
        last: Timestamp,
        /// Time passed to the rejected update
        now: Timestamp,
    },

    /// Output bounds are flipped, equal, or not finite.
    #[cfg_attr(feature = "std", error("output limits are flipped or not finite"))]
    InvalidOutputLimits,

    /// One of the gains is NaN or infinite.
    #[cfg_attr(feature = "std", error("gain is not finite"))]
    NonFiniteGain,
}

#[cfg(not(feature = "std"))]
impl fmt::Display for PidError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PidError::NonPositiveInterval { last, now } => write!(
                f,
                "sample time did not advance (last {}, now {})",
                last, now
            ),
            PidError::InvalidOutputLimits => f.write_str("output limits are flipped or not finite"),
            PidError::NonFiniteGain => f.write_str("gain is not finite"),
        }
    }
}
