//! Parameters structure for a single joint

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use crate::pid::PidGains;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for a single joint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JointParams {
    // ---- GEOMETRY ----

    /// Length of the link from pivot to tip.
    ///
    /// Units: meters
    pub length_m: f64,

    /// Mass of the link, assumed evenly distributed along its length.
    ///
    /// Units: kilograms
    pub mass_kg: f64,

    /// Angle of the joint at startup, counterclockwise from the horizontal
    /// (shoulder) or from the parent link (elbow).
    ///
    /// Units: radians
    #[serde(default)]
    pub initial_angle_rad: f64,

    // ---- DRIVE ----

    /// Gearbox reduction, motor revolutions per link revolution.
    pub gear_ratio: f64,

    /// Number of motors driving the gearbox.
    pub num_motors: u32,

    /// Catalog name of the motor type, e.g. `"cim"`.
    pub motor: String,

    // ---- CONTROL ----

    /// Position controller gains.
    pub pid: PidGains,

    /// What happens to the joint's motion once it has stopped at a target.
    #[serde(default)]
    pub stop_policy: StopPolicy,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Behaviour of a joint once it reports being stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopPolicy {
    /// Velocity and acceleration are held at their values when the joint
    /// stopped, so the joint keeps drifting slowly.
    Coast,

    /// Velocity and acceleration are zeroed, the joint holds its angle.
    Lock,
}

impl Default for StopPolicy {
    fn default() -> Self {
        StopPolicy::Coast
    }
}
