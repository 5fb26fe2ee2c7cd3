//! # PID controller
//!
//! A discrete PID controller which assumes it is evaluated exactly once per
//! simulation cycle. The derivative term is the raw change in error between
//! two evaluations and the integral is the raw sum of errors, neither is
//! scaled by the cycle period.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Gains for a [`PidController`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PidGains {
    /// Proportional gain
    pub k_p: f64,

    /// Integral gain
    pub k_i: f64,

    /// Derivative gain
    pub k_d: f64,
}

/// A PID controller
#[derive(Debug, Clone, Serialize)]
pub struct PidController {
    gains: PidGains,

    /// Sum of all errors since creation or the last reset. There is no
    /// anti-windup limit on this.
    error_sum: f64,

    /// Error from the previous evaluation
    last_error: f64,

    /// True if the error at the last evaluation was within tolerance
    at_target: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl PidController {

    /// Create a new controller with the given gains.
    pub fn new(gains: PidGains) -> Self {
        Self {
            gains,
            error_sum: 0f64,
            last_error: 0f64,
            at_target: false,
        }
    }

    /// Get the output of the controller for the given setpoint and current
    /// value.
    ///
    /// `tolerance` is the absolute error at or below which the controller
    /// reports it is at its target.
    pub fn evaluate(&mut self, setpoint: f64, current: f64, tolerance: f64) -> f64 {
        let error = setpoint - current;

        self.at_target = error.abs() <= tolerance;

        self.error_sum += error;
        let d_error = error - self.last_error;
        self.last_error = error;

        self.gains.k_p * error
            + self.gains.k_i * self.error_sum
            + self.gains.k_d * d_error
    }

    /// True if the error was within tolerance at the last evaluation.
    pub fn is_at_target(&self) -> bool {
        self.at_target
    }

    /// Forget the at-target flag so that the next evaluation decides it afresh.
    pub fn clear_at_target(&mut self) {
        self.at_target = false;
    }

    /// Clear the integral and derivative memory.
    pub fn reset(&mut self) {
        self.error_sum = 0f64;
        self.last_error = 0f64;
        self.at_target = false;
    }

    pub fn gains(&self) -> PidGains {
        self.gains
    }

    pub fn error_sum(&self) -> f64 {
        self.error_sum
    }

    pub fn last_error(&self) -> f64 {
        self.last_error
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
