//! The heater PID regulator.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use core::fmt;
use num_traits::Float;

#[cfg(feature = "std")]
use crate::clock::SystemClock;
use crate::clock::{Clock, Timestamp};
use crate::config::PidConfig;
use crate::error::PidError;

/// Whether the controller has seen its first sample yet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// No sample recorded; the next update only latches the time
    #[default]
    Uninitialized,
    /// At least one sample recorded
    Running {
        /// Time of the last accepted update
        last_time: Timestamp,
    },
}

/// Per-term contributions of the most recent update
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Corrections<T: Float> {
    /// Proportional term contribution
    pub p: T,
    /// Integral term contribution
    pub i: T,
    /// Derivative term contribution
    pub d: T,
}

impl<T: Float> Corrections<T> {
    fn zero() -> Self {
        Self {
            p: T::zero(),
            i: T::zero(),
            d: T::zero(),
        }
    }

    /// Sum of the three terms, the step added to the previous output
    pub fn total(&self) -> T {
        self.p + self.i + self.d
    }
}

impl<T: Float + fmt::Display> fmt::Display for Corrections<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P: {} I: {} D: {}", self.p, self.i, self.d)
    }
}

/// Incremental PID regulator for heater duty cycles.
///
/// Each update adds the P, I and D corrections to the previous output
/// instead of recomputing it from scratch, so the output carries history
/// beyond the integral term. The error integral uses the trapezoidal rule
/// and only grows while both the previous and the freshly computed output
/// sit strictly inside the bounds.
///
/// ```
/// use heater_pid::{HeaterPid, Timestamp};
///
/// let mut pid = HeaterPid::new(1.0, 0.1, 0.0, 0.0, 100.0);
///
/// // First sample only latches the time.
/// assert_eq!(pid.update(20.0, 10.0, Timestamp::from_secs(0)).unwrap(), 0.0);
/// assert_eq!(pid.update(20.0, 10.0, Timestamp::from_secs(1)).unwrap(), 10.5);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct HeaterPid<T: Float> {
    config: PidConfig<T>,

    // Running state
    /// Trapezoidal integral of the error
    sum_error: T,
    last_error: T,
    last_output: T,
    phase: Phase,

    // Diagnostics
    last_corrections: Corrections<T>,
}

impl<T: Float> HeaterPid<T> {
    /// Create a controller from gains and output bounds
    pub fn new(kp: T, ki: T, kd: T, output_min: T, output_max: T) -> Self {
        Self::from_config(PidConfig::new(kp, ki, kd, output_min, output_max))
    }

    /// Create a controller with the given configuration
    pub fn from_config(config: PidConfig<T>) -> Self {
        Self {
            config,
            sum_error: T::zero(),
            last_error: T::zero(),
            last_output: T::zero(),
            phase: Phase::Uninitialized,
            last_corrections: Corrections::zero(),
        }
    }

    /// Replace gains and bounds. Running state is kept, so new gains act on
    /// the existing error and output history from the next update on.
    pub fn configure(&mut self, kp: T, ki: T, kd: T, output_min: T, output_max: T) {
        self.set_config(PidConfig::new(kp, ki, kd, output_min, output_max));
    }

    /// Replace the whole configuration, keeping running state
    pub fn set_config(&mut self, config: PidConfig<T>) {
        self.config = config;
    }

    /// Get current configuration
    pub fn config(&self) -> &PidConfig<T> {
        &self.config
    }

    /// Run one control tick and return the clamped output.
    ///
    /// The first call only records `now` and returns the current output.
    /// A `now` that is not strictly later than the previous accepted tick is
    /// rejected with [`PidError::NonPositiveInterval`] and leaves the
    /// controller untouched.
    pub fn update(&mut self, setpoint: T, measurement: T, now: Timestamp) -> Result<T, PidError> {
        let curr_error = setpoint - measurement;

        let last_time = match self.phase {
            Phase::Uninitialized => {
                self.phase = Phase::Running { last_time: now };
                self.last_error = T::zero();
                #[cfg(feature = "defmt")]
                defmt::debug!("heater pid: first sample at {}", now);
                return Ok(self.last_output);
            }
            Phase::Running { last_time } => last_time,
        };

        let dt = match now.seconds_since(last_time) {
            Some(dt) => T::from(dt).unwrap_or_else(T::max_value),
            None => {
                #[cfg(feature = "defmt")]
                defmt::warn!("heater pid: rejected tick at {} (last {})", now, last_time);
                return Err(PidError::NonPositiveInterval {
                    last: last_time,
                    now,
                });
            }
        };

        let two = T::one() + T::one();
        let new_sum_error = self.sum_error + dt * (self.last_error + curr_error) / two;

        let corrections = Corrections {
            p: self.config.kp * curr_error,
            i: self.config.ki * new_sum_error,
            d: self.config.kd * (curr_error - self.last_error) / dt,
        };

        let output = self.last_output + corrections.total();

        // Anti-windup: hold the integral while either output touches a bound.
        if self.config.strictly_within(output) && self.config.strictly_within(self.last_output) {
            self.sum_error = new_sum_error;
        } else {
            #[cfg(feature = "defmt")]
            defmt::debug!("heater pid: output saturated, integral held");
        }

        let output = self.config.clamp_output(output);

        #[cfg(feature = "defmt")]
        defmt::trace!(
            "heater pid: error={=f64} P={=f64} I={=f64} D={=f64} output={=f64}",
            curr_error.to_f64().unwrap_or(f64::NAN),
            corrections.p.to_f64().unwrap_or(f64::NAN),
            corrections.i.to_f64().unwrap_or(f64::NAN),
            corrections.d.to_f64().unwrap_or(f64::NAN),
            output.to_f64().unwrap_or(f64::NAN)
        );

        self.last_corrections = corrections;
        self.last_output = output;
        self.last_error = curr_error;
        self.phase = Phase::Running { last_time: now };

        Ok(output)
    }

    /// Run one tick `dt_secs` after the previous one.
    ///
    /// For loops that count their own period instead of keeping absolute
    /// time. Before the first sample the time base starts at tick zero.
    pub fn update_elapsed(&mut self, setpoint: T, measurement: T, dt_secs: u64) -> Result<T, PidError> {
        let now = match self.phase {
            Phase::Uninitialized => Timestamp::ZERO,
            Phase::Running { last_time } => last_time.advanced_by(dt_secs),
        };
        self.update(setpoint, measurement, now)
    }

    /// Run one tick stamped by `clock`.
    pub fn update_with<C: Clock + ?Sized>(&mut self, setpoint: T, measurement: T, clock: &C) -> Result<T, PidError> {
        self.update(setpoint, measurement, clock.now())
    }

    /// Run one tick stamped with the wall clock in whole seconds.
    ///
    /// Two calls within the same second are rejected, so poll at least one
    /// second apart.
    #[cfg(feature = "std")]
    pub fn update_now(&mut self, setpoint: T, measurement: T) -> Result<T, PidError> {
        self.update_with(setpoint, measurement, &SystemClock)
    }

    /// Forget all history; gains and bounds are kept.
    pub fn reset(&mut self) {
        self.sum_error = T::zero();
        self.last_error = T::zero();
        self.last_output = T::zero();
        self.phase = Phase::Uninitialized;
        self.last_corrections = Corrections::zero();
    }

    /// Seed the previous output, clamped to the bounds.
    ///
    /// Lets the regulator take over from the duty cycle the heater is
    /// already running at instead of ramping up from zero.
    pub fn preload_output(&mut self, value: T) {
        self.last_output = self.config.clamp_output(value);
    }

    /// Proportional term of the last update
    pub fn last_correction_p(&self) -> T {
        self.last_corrections.p
    }

    /// Integral term of the last update
    pub fn last_correction_i(&self) -> T {
        self.last_corrections.i
    }

    /// Derivative term of the last update
    pub fn last_correction_d(&self) -> T {
        self.last_corrections.d
    }

    /// All three terms of the last update
    pub fn corrections(&self) -> Corrections<T> {
        self.last_corrections
    }

    /// Accumulated error integral
    pub fn sum_error(&self) -> T {
        self.sum_error
    }

    /// Error of the last accepted sample
    pub fn last_error(&self) -> T {
        self.last_error
    }

    /// Output of the last update
    pub fn last_output(&self) -> T {
        self.last_output
    }

    /// Lower output bound
    pub fn output_min(&self) -> T {
        self.config.output_min
    }

    /// Upper output bound
    pub fn output_max(&self) -> T {
        self.config.output_max
    }

    /// Bootstrap state and time of the last accepted sample
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// True once the first sample has been recorded
    pub fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Running { .. })
    }
}

impl<T: Float + fmt::Display> fmt::Display for HeaterPid<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Heater PID:\n\
             Output: {} [{}, {}]\n\
             Sum Error: {}\n\
             Last Error: {}\n\
             Corrections: {}",
            self.last_output,
            self.config.output_min,
            self.config.output_max,
            self.sum_error,
            self.last_error,
            self.last_corrections
        )
    }
}
