//! Gains and output bounds of the heater controller.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use num_traits::Float;

use crate::controller::HeaterPid;
use crate::error::PidError;

/// Tunable parameters of a [`HeaterPid`]
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PidConfig<T: Float> {
    /// Proportional gain
    pub kp: T,
    /// Integral gain
    pub ki: T,
    /// Derivative gain
    pub kd: T,

    /// Minimum allowed output
    pub output_min: T,
    /// Maximum allowed output
    pub output_max: T,
}

impl<T: Float> Default for PidConfig<T> {
    /// Proportional-only, output as a 0-100 % duty cycle.
    fn default() -> Self {
        Self {
            kp: T::one(),
            ki: T::zero(),
            kd: T::zero(),
            output_min: T::zero(),
            output_max: T::from(100.0).unwrap_or_else(T::one),
        }
    }
}

impl<T: Float> PidConfig<T> {
    /// Create a configuration from gains and output bounds
    pub fn new(kp: T, ki: T, kd: T, output_min: T, output_max: T) -> Self {
        Self {
            kp,
            ki,
            kd,
            output_min,
            output_max,
        }
    }

    /// Check that all values are finite and that `output_min < output_max`.
    ///
    /// The controller itself accepts any configuration; a degenerate range
    /// just pins the output. Call this before handing user-supplied values
    /// to [`HeaterPid::configure`].
    pub fn validate(&self) -> Result<(), PidError> {
        if !(self.kp.is_finite() && self.ki.is_finite() && self.kd.is_finite()) {
            return Err(PidError::NonFiniteGain);
        }
        if !(self.output_min.is_finite() && self.output_max.is_finite())
            || self.output_min >= self.output_max
        {
            return Err(PidError::InvalidOutputLimits);
        }
        Ok(())
    }

    /// Clamp `value` into `[output_min, output_max]`.
    ///
    /// Upper bound wins when the range is inverted.
    pub(crate) fn clamp_output(&self, value: T) -> T {
        self.output_max.min(value.max(self.output_min))
    }

    /// True when `value` lies strictly between the bounds.
    pub(crate) fn strictly_within(&self, value: T) -> bool {
        value > self.output_min && value < self.output_max
    }
}

// ============================================================================
// Builder Pattern for Easier Configuration
// ============================================================================

/// Step-by-step construction of a [`HeaterPid`]
#[derive(Debug, Clone, Copy)]
pub struct PidBuilder<T: Float> {
    config: PidConfig<T>,
}

impl<T: Float> PidBuilder<T> {
    /// Start from the default configuration
    pub fn new() -> Self {
        Self {
            config: PidConfig::default(),
        }
    }

    /// Set proportional, integral and derivative gains
    pub fn gains(mut self, kp: T, ki: T, kd: T) -> Self {
        self.config.kp = kp;
        self.config.ki = ki;
        self.config.kd = kd;
        self
    }

    /// Set the output bounds
    pub fn output_limits(mut self, min: T, max: T) -> Self {
        self.config.output_min = min;
        self.config.output_max = max;
        self
    }

    /// Get the configuration built so far
    pub fn config(&self) -> &PidConfig<T> {
        &self.config
    }

    /// Build the controller without validating the configuration
    pub fn build(self) -> HeaterPid<T> {
        HeaterPid::from_config(self.config)
    }

    /// Like [`build`](Self::build) but rejects non-finite or inverted parameters.
    pub fn try_build(self) -> Result<HeaterPid<T>, PidError> {
        self.config.validate()?;
        Ok(self.build())
    }
}

impl<T: Float> Default for PidBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_duty_cycle() {
        let config = PidConfig::<f64>::default();
        assert_eq!(config.output_min, 0.0);
        assert_eq!(config.output_max, 100.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_inverted_limits() {
        let config = PidConfig::new(1.0, 0.0, 0.0, 10.0, 10.0);
        assert_eq!(config.validate(), Err(PidError::InvalidOutputLimits));

        let config = PidConfig::new(1.0, 0.0, 0.0, 10.0, f64::NAN);
        assert_eq!(config.validate(), Err(PidError::InvalidOutputLimits));
    }

    #[test]
    fn test_validate_rejects_nan_gain() {
        let config = PidConfig::new(1.0, f64::NAN, 0.0, 0.0, 100.0);
        assert_eq!(config.validate(), Err(PidError::NonFiniteGain));
    }

    #[test]
    fn test_clamp_output() {
        let config = PidConfig::new(1.0_f32, 0.0, 0.0, 0.0, 10.0);
        assert_eq!(config.clamp_output(-3.0), 0.0);
        assert_eq!(config.clamp_output(4.5), 4.5);
        assert_eq!(config.clamp_output(12.0), 10.0);
        assert_eq!(config.clamp_output(f32::NAN), 0.0);
        assert!(!config.strictly_within(f32::NAN));
        assert!(!config.strictly_within(0.0));
        assert!(!config.strictly_within(10.0));
        assert!(config.strictly_within(9.99));
    }

    #[test]
    fn test_try_build() {
        assert!(PidBuilder::<f64>::new()
            .output_limits(5.0, -5.0)
            .try_build()
            .is_err());
        let pid = PidBuilder::<f64>::new()
            .gains(2.0, 0.5, 0.0)
            .output_limits(0.0, 50.0)
            .try_build()
            .unwrap();
        assert_eq!(pid.config().kp, 2.0);
        assert_eq!(pid.output_max(), 50.0);
    }
}
