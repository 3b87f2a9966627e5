//! # Heater PID Controller
//!
//! A discrete PID regulator for dew and frost heaters, driven from a
//! temperature reading once per control tick and producing a bounded duty
//! cycle for the heater.
//!
//! ## Key Features
//! - **Incremental form**: each tick adds its corrections to the previous output
//! - **Trapezoidal integration** of the error over irregular whole-second intervals
//! - **Anti-windup**: the integral only grows while the output is inside its bounds
//! - **Output clamping** to `[output_min, output_max]`
//! - **Injected time**: every update carries its own [`Timestamp`], so the
//!   loop is testable without a live clock
//! - **Online tuning** that keeps the running state
//!
//! ## Example
//!
//! ```
//! use heater_pid::{PidBuilder, Timestamp};
//!
//! let mut pid = PidBuilder::<f64>::new()
//!     .gains(1.0, 0.1, 0.0)
//!     .output_limits(0.0, 100.0)
//!     .build();
//!
//! let mut now = Timestamp::from_secs(0);
//! for reading in [10.0, 10.0, 12.0] {
//!     let duty = pid.update(20.0, reading, now).unwrap();
//!     assert!((0.0..=100.0).contains(&duty));
//!     now = now.advanced_by(1);
//! }
//! assert!((pid.last_output() - 19.4).abs() < 1e-9);
//! ```
//!
//! ## Features
//! - `std` (default): `thiserror` errors, [`SystemClock`] and `HeaterPid::update_now`
//! - `serde`: serialize configuration and controller state
//! - `defmt`: `defmt::Format` for public types and per-tick trace logging

#![cfg_attr(not(feature = "std"), no_std)]

pub mod clock;
pub mod config;
pub mod controller;
pub mod error;

#[cfg(feature = "std")]
pub use clock::SystemClock;
pub use clock::{Clock, Timestamp};
pub use config::{PidBuilder, PidConfig};
pub use controller::{Corrections, HeaterPid, Phase};
pub use error::PidError;
