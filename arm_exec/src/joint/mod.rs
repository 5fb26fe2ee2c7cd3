//! Single joint module
//!
//! A joint is one rigid rotating link driven by one or more DC motors through
//! a gearbox, with its own PID controller. The link is modelled as a uniform
//! rod pivoting about one end.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod dynamics;
mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use params::*;
pub use state::*;

use crate::motor::MotorError;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Acceleration due to gravity.
///
/// Units: meters/second^2
pub const GRAVITY_MS2: f64 = 9.81;

/// Fraction of the maximum angular velocity below which a joint that is at
/// its target is considered to have stopped.
pub const STOP_VEL_FRACTION: f64 = 0.1;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur when building a joint.
#[derive(Debug, thiserror::Error)]
pub enum JointError {
    #[error("Invalid motor for joint: {0}")]
    InvalidMotor(MotorError),

    #[error("Joint {0} must be positive, found {1}")]
    NonPositiveParam(&'static str, f64),

    #[error("Cycle period must be positive, found {0} s")]
    InvalidCyclePeriod(f64),
}
