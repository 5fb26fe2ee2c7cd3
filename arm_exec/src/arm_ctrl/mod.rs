//! Arm control module
//!
//! A two joint planar arm made from two [`Joint`](crate::joint::Joint)s in
//! series. The shoulder pivots about the origin and the elbow pivots about the
//! tip of the shoulder link, with the elbow angle measured relative to the
//! shoulder link.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod arm_config;
mod inverse_kinematics;
mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use arm_config::*;
pub use inverse_kinematics::*;
pub use params::*;
pub use state::*;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// The number of rotational axes on the arm.
pub const NUM_ROT_AXES: usize = 2;

/// Scale applied to the inner radius of the reachable space when clamping a
/// point onto it, keeping the point just inside.
pub const INNER_CLAMP_SCALE: f64 = 1.001;

/// Scale applied to the outer radius of the reachable space when clamping a
/// point onto it, keeping the point just inside.
pub const OUTER_CLAMP_SCALE: f64 = 0.999;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during ArmCtrl operation.
#[derive(Debug, thiserror::Error)]
pub enum ArmCtrlError {
    #[error("Could not build the {0} joint: {1}")]
    JointError(&'static str, crate::joint::JointError),

    #[error(
        "Goal {goal} at distance {distance_m:.4} m is outside the reachable space \
        [{min_m:.4}, {max_m:.4}] m"
    )]
    Unreachable {
        goal: crate::point::Point,
        distance_m: f64,
        min_m: f64,
        max_m: f64,
    },
}
